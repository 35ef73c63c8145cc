//! # Property Listings - Domain Model
//!
//! Core entities and value objects for the property listings service.
//! These types are shared by the persistence layer (cache payloads,
//! database rows) and the HTTP API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Fixed-point money amount with two decimal places, held as cents.
///
/// Rendered as `"<units>.<cc>"`, e.g. `250000.00` or `-3.05`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Build a price from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (units, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if units.is_empty() && frac.is_empty() {
            return Err(PriceParseError::Empty);
        }
        if frac.len() > 2 {
            return Err(PriceParseError::TooPrecise(s.to_string()));
        }
        if !units.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(PriceParseError::InvalidDigit(s.to_string()));
        }

        // Only ASCII digits remain, so a parse failure means overflow.
        let units: i64 = if units.is_empty() {
            0
        } else {
            units
                .parse()
                .map_err(|_| PriceParseError::Overflow(s.to_string()))?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => frac
                .parse()
                .map_err(|_| PriceParseError::InvalidDigit(s.to_string()))?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(|| PriceParseError::Overflow(s.to_string()))?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// Property listing - read-only from this service's perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// CACHE METRICS
// =============================================================================

/// Point-in-time view of the cache server's keyspace counters.
///
/// Recomputed on every read; never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CacheMetrics {
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    pub total_requests: u64,
    /// hits / total, rounded to 4 decimals. Zero when there were no lookups.
    pub hit_ratio: f64,
    /// `hit_ratio` as a percentage, rounded to 2 decimals.
    pub hit_ratio_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheMetrics {
    /// Derive the snapshot from raw hit and miss counters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counters(hits: u64, misses: u64) -> Self {
        let total = hits.saturating_add(misses);
        let hit_ratio = if total == 0 {
            0.0
        } else {
            round_to(hits as f64 / total as f64, 4)
        };

        Self {
            keyspace_hits: hits,
            keyspace_misses: misses,
            total_requests: total,
            hit_ratio,
            hit_ratio_percent: round_to(hit_ratio * 100.0, 2),
            error: None,
        }
    }

    /// Zero-filled snapshot carrying the reason the counters could not be read.
    #[must_use]
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// =============================================================================
// ERRORS
// =============================================================================

/// Price parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceParseError {
    #[error("empty price")]
    Empty,

    #[error("price has more than two decimal places: {0}")]
    TooPrecise(String),

    #[error("invalid character in price: {0}")]
    InvalidDigit(String),

    #[error("price out of range: {0}")]
    Overflow(String),
}
