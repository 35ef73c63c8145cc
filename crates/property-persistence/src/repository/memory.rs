//! In-memory property repository.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::PropertyRepository;
use crate::error::{PersistenceError, Result};
use property_domain::Property;

/// Fixed set of properties held in memory.
///
/// Counts every `fetch_all` call so callers can observe how often the
/// backing store is actually hit.
#[derive(Debug, Default)]
pub struct InMemoryPropertyRepository {
    properties: Mutex<Vec<Property>>,
    loads: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl InMemoryPropertyRepository {
    #[must_use]
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: Mutex::new(properties),
            ..Self::default()
        }
    }

    /// Number of `fetch_all` calls served so far, failed ones included
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Replace the stored properties
    pub fn replace(&self, properties: Vec<Property>) {
        *lock(&self.properties) = properties;
    }

    /// Make subsequent loads fail with `message`, or succeed again with `None`
    pub fn fail_with(&self, message: Option<&str>) {
        *lock(&self.failure) = message.map(str::to_string);
    }
}

// Poisoning is ignored: the guarded data is plain values.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn fetch_all(&self) -> Result<Vec<Property>> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = lock(&self.failure).clone() {
            return Err(PersistenceError::Scylla(message));
        }
        Ok(lock(&self.properties).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_fixtures::properties;

    #[tokio::test]
    async fn test_fetch_all_counts_loads() {
        let repo = InMemoryPropertyRepository::new(properties(3));

        assert_eq!(repo.fetch_all().await.unwrap().len(), 3);
        assert_eq!(repo.fetch_all().await.unwrap().len(), 3);
        assert_eq!(repo.load_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let repo = InMemoryPropertyRepository::new(properties(1));
        repo.fail_with(Some("node down"));

        let err = repo.fetch_all().await.unwrap_err();
        assert_eq!(err.to_string(), "ScyllaDB error: node down");

        repo.fail_with(None);
        assert_eq!(repo.fetch_all().await.unwrap().len(), 1);
        assert_eq!(repo.load_count(), 2);
    }

    #[tokio::test]
    async fn test_replace() {
        let repo = InMemoryPropertyRepository::new(properties(2));
        repo.replace(properties(5));
        assert_eq!(repo.fetch_all().await.unwrap().len(), 5);
    }
}
