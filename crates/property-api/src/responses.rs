//! JSON response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use property_domain::Property;

/// Wire shape of a single property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyView {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Decimal string, e.g. `"250000.00"`
    pub price: String,
    pub location: String,
    /// ISO-8601 with explicit offset, e.g. `"2024-01-15T10:30:00+00:00"`
    pub created_at: String,
}

impl From<&Property> for PropertyView {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id,
            title: property.title.clone(),
            description: property.description.clone(),
            price: property.price.to_string(),
            location: property.location.clone(),
            created_at: iso_format(&property.created_at),
        }
    }
}

/// Whole seconds render without a fraction, anything finer as microseconds.
fn iso_format(ts: &DateTime<Utc>) -> String {
    let format = if ts.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(format, false)
}

/// Body of `GET /properties/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListResponse {
    pub properties: Vec<PropertyView>,
    pub count: usize,
}

impl PropertyListResponse {
    #[must_use]
    pub fn from_properties(properties: &[Property]) -> Self {
        let properties: Vec<PropertyView> = properties.iter().map(PropertyView::from).collect();
        Self {
            count: properties.len(),
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use property_domain::Price;

    fn property(id: i64, cents: i64) -> Property {
        Property {
            id,
            title: format!("Listing {id}"),
            description: "Two bedrooms".to_string(),
            price: Price::from_cents(cents),
            location: "Porto".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_view_formats_price_and_timestamp() {
        let view = PropertyView::from(&property(1, 25_000_000));

        assert_eq!(view.price, "250000.00");
        assert_eq!(view.created_at, "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_view_keeps_subsecond_precision() {
        let mut p = property(1, 100);
        p.created_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
            + chrono::Duration::microseconds(250_000);

        assert_eq!(
            PropertyView::from(&p).created_at,
            "2024-01-15T10:30:00.250000+00:00"
        );
    }

    #[test]
    fn test_count_matches_properties() {
        let response = PropertyListResponse::from_properties(&[property(1, 100), property(2, 250)]);
        assert_eq!(response.count, 2);
        assert_eq!(response.properties.len(), 2);

        let empty = PropertyListResponse::from_properties(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.properties.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(PropertyListResponse::from_properties(&[property(9, 5)])).unwrap();

        assert_eq!(json["count"], 1);
        let item = &json["properties"][0];
        assert_eq!(item["id"], 9);
        assert!(item["price"].is_string());
        assert_eq!(item["price"], "0.05");
        for field in ["id", "title", "description", "price", "location", "created_at"] {
            assert!(item.get(field).is_some(), "missing {field}");
        }
    }
}
