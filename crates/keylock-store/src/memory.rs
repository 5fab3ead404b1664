//! In-memory credential store for testing and ephemeral deployments.

use crate::error::StorageResult;
use crate::traits::CredentialStore;
use std::collections::HashMap;

/// In-memory [`CredentialStore`] implementation.
///
/// Keeps the committed and staged sets separate so tests can verify the
/// staging contract: a staged value is invisible to `get` until `commit`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: HashMap<String, String>,
    staged: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with committed values.
    ///
    /// Useful for tests that start from a persisted state rather than a
    /// factory-fresh one.
    pub fn with_committed<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            committed: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            staged: HashMap::new(),
        }
    }

    /// Number of values staged but not yet committed.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

impl CredentialStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.committed.get(key).cloned())
    }

    async fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.staged.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn commit(&mut self) -> StorageResult<()> {
        self.committed.extend(self.staged.drain());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_staged_value_invisible_until_commit() {
        let mut store = MemoryStore::new();

        store.put("master_code", "1234").await.unwrap();
        assert_eq!(store.get("master_code").await.unwrap(), None);
        assert_eq!(store.staged_len(), 1);

        store.commit().await.unwrap();
        assert_eq!(
            store.get("master_code").await.unwrap(),
            Some("1234".to_string())
        );
        assert_eq!(store.staged_len(), 0);
    }

    #[tokio::test]
    async fn test_commit_applies_all_staged_keys() {
        let mut store = MemoryStore::new();

        store.put("master_code", "4321").await.unwrap();
        store.put("guest_code", "8765").await.unwrap();
        store.put("guest_used", "1").await.unwrap();
        store.commit().await.unwrap();

        assert_eq!(
            store.get("guest_code").await.unwrap(),
            Some("8765".to_string())
        );
        assert_eq!(
            store.get("guest_used").await.unwrap(),
            Some("1".to_string())
        );
    }

    #[tokio::test]
    async fn test_with_committed_seed() {
        let store = MemoryStore::with_committed([("guest_used", "1")]);
        assert_eq!(
            store.get("guest_used").await.unwrap(),
            Some("1".to_string())
        );
        assert_eq!(store.get("master_code").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_restage_overwrites_previous_stage() {
        let mut store = MemoryStore::new();

        store.put("master_code", "1111").await.unwrap();
        store.put("master_code", "2222").await.unwrap();
        store.commit().await.unwrap();

        assert_eq!(
            store.get("master_code").await.unwrap(),
            Some("2222".to_string())
        );
    }
}
