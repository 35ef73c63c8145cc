//! # Repository Module
//!
//! Repository pattern implementations for property persistence.

pub mod cached;
pub mod memory;
#[cfg(feature = "scylla")]
pub mod scylla_impl;
pub mod traits;

pub use cached::{CachedPropertyRepository, ALL_PROPERTIES_KEY, DEFAULT_PROPERTIES_TTL};
pub use memory::InMemoryPropertyRepository;
#[cfg(feature = "scylla")]
pub use scylla_impl::{ScyllaClient, ScyllaConfig, ScyllaPropertyRepository};
pub use traits::PropertyRepository;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::{Duration, TimeZone, Utc};
    use fake::faker::address::en::CityName;
    use fake::faker::lorem::en::{Paragraph, Sentence};
    use fake::Fake;

    use property_domain::{Price, Property};

    /// `count` generated properties with ids `1..=count`.
    pub fn properties(count: usize) -> Vec<Property> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (1..=count as i64)
            .map(|id| Property {
                id,
                title: Sentence(2..5).fake(),
                description: Paragraph(1..3).fake(),
                price: Price::from_cents((5_000_000..90_000_000).fake::<i64>()),
                location: CityName().fake(),
                created_at: base + Duration::hours(id),
            })
            .collect()
    }
}
