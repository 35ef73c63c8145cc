//! # Strategy Module
//!
//! Enum-based cache/database access strategies using dispatch pattern.
//!
//! ## Read Strategies
//! - `CacheAside` - Check cache, fall back to DB on miss and populate (default)
//! - `CacheAsideTolerant` - Same, but a failing cache degrades to a DB read
//! - `DbOnly` - Skip cache entirely
//!
//! ## Example
//!
//! ```rust,ignore
//! use property_persistence::strategy::ReadStrategy;
//!
//! let (value, source) = ReadStrategy::CacheAside
//!     .read(
//!         || cache.get_json(key),
//!         || db.fetch_all(),
//!         |v| async move { cache.set_json(key, &v, ttl).await },
//!     )
//!     .await?;
//! ```

pub mod read_strategy;

pub use read_strategy::{ReadSource, ReadStrategy};
