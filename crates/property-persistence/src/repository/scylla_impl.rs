//! ScyllaDB repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::{Session, SessionBuilder};

use super::traits::PropertyRepository;
use crate::error::{PersistenceError, Result};
use property_domain::{Price, Property};

// =============================================================================
// SCYLLA CONFIGURATION
// =============================================================================

/// ScyllaDB connection configuration.
#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["localhost:9042".to_string()],
            keyspace: "property_listings".to_string(),
            username: None,
            password: None,
        }
    }
}

// =============================================================================
// SCYLLA CLIENT
// =============================================================================

/// ScyllaDB client wrapper.
pub struct ScyllaClient {
    session: Arc<Session>,
    pub config: ScyllaConfig,
}

impl ScyllaClient {
    /// Create a new ScyllaDB client.
    ///
    /// # Errors
    ///
    /// Returns an error if no node is reachable or the keyspace is missing.
    pub async fn new(config: ScyllaConfig) -> Result<Self> {
        let mut builder = SessionBuilder::new().known_nodes(&config.hosts);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.user(user, pass);
        }

        let session = builder.build().await?;

        // Use keyspace
        session
            .query_unpaged(format!("USE {}", config.keyspace), ())
            .await?;

        Ok(Self {
            session: Arc::new(session),
            config,
        })
    }

    /// Get session reference.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

// =============================================================================
// PROPERTY REPOSITORY
// =============================================================================

const CREATE_PROPERTIES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS properties (
        id bigint PRIMARY KEY,
        title text,
        description text,
        price_cents bigint,
        location text,
        created_at timestamp
    )
";

const SELECT_ALL_PROPERTIES: &str = r"
    SELECT id, title, description, price_cents, location, created_at
    FROM properties
";

type PropertyRow = (
    i64,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<DateTime<Utc>>,
);

/// Repository for property listings stored in ScyllaDB.
pub struct ScyllaPropertyRepository {
    client: Arc<ScyllaClient>,
}

impl ScyllaPropertyRepository {
    /// Create a new property repository.
    #[must_use]
    pub const fn new(client: Arc<ScyllaClient>) -> Self {
        Self { client }
    }

    /// Create the `properties` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client
            .session()
            .query_unpaged(CREATE_PROPERTIES_TABLE, ())
            .await?;

        tracing::info!(keyspace = %self.client.config.keyspace, "properties table ready");
        Ok(())
    }
}

#[async_trait]
impl PropertyRepository for ScyllaPropertyRepository {
    async fn fetch_all(&self) -> Result<Vec<Property>> {
        let result = self
            .client
            .session()
            .query_unpaged(SELECT_ALL_PROPERTIES, ())
            .await?
            .into_rows_result()
            .map_err(|e| PersistenceError::InvalidQuery(e.to_string()))?;

        let rows = result
            .rows::<PropertyRow>()
            .map_err(|e| PersistenceError::InvalidQuery(e.to_string()))?;

        let mut properties = Vec::new();
        for row in rows {
            let row = row.map_err(|e| PersistenceError::InvalidQuery(e.to_string()))?;
            properties.push(property_from_row(row));
        }

        // Full scans come back in token order.
        properties.sort_by_key(|p| p.id);

        tracing::debug!(count = properties.len(), "Loaded properties from ScyllaDB");
        Ok(properties)
    }
}

fn property_from_row(
    (id, title, description, price_cents, location, created_at): PropertyRow,
) -> Property {
    Property {
        id,
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        price: Price::from_cents(price_cents.unwrap_or(0)),
        location: location.unwrap_or_default(),
        created_at: created_at.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_property_from_full_row() {
        let created = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        let property = property_from_row((
            12,
            Some("Cottage".to_string()),
            Some("Stone walls".to_string()),
            Some(31_500_000),
            Some("Cotswolds".to_string()),
            Some(created),
        ));

        assert_eq!(property.id, 12);
        assert_eq!(property.title, "Cottage");
        assert_eq!(property.price.to_string(), "315000.00");
        assert_eq!(property.created_at, created);
    }

    #[test]
    fn test_property_from_sparse_row() {
        let property = property_from_row((3, None, None, None, None, None));

        assert_eq!(property.id, 3);
        assert!(property.title.is_empty());
        assert!(property.description.is_empty());
        assert_eq!(property.price, Price::from_cents(0));
        assert_eq!(property.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_default_config() {
        let config = ScyllaConfig::default();
        assert_eq!(config.keyspace, "property_listings");
        assert!(config.username.is_none());
    }
}
