//! Per-browser key-value storage backed by the tower-sessions session.
//!
//! The cart store expects a synchronous store, like a browser's local storage.
//! [`SessionStorage`] snapshots the keys a request needs up front, serves
//! reads and writes from that snapshot, and writes dirty keys back to the
//! session on [`SessionStorage::flush`].

use std::collections::HashSet;

use garden_records_core::{KeyValueStore, MemoryStorage};
use serde_json::Value;
use thiserror::Error;
use tower_sessions::Session;

/// Error persisting storage back to the session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Snapshot of selected session keys implementing [`KeyValueStore`].
#[derive(Debug)]
pub struct SessionStorage {
    session: Session,
    snapshot: MemoryStorage,
    dirty: HashSet<String>,
}

impl SessionStorage {
    /// Snapshot `keys` from the session.
    ///
    /// Read failures are logged and treated as a missing key. A value that
    /// is not a string is kept as its JSON text.
    pub async fn load(session: Session, keys: &[&str]) -> Self {
        let mut snapshot = MemoryStorage::new();

        for &key in keys {
            match session.get::<Value>(key).await {
                Ok(Some(Value::String(raw))) => snapshot.set_item(key, raw),
                Ok(Some(other)) => {
                    tracing::warn!(key, "session value is not a string, keeping its JSON text");
                    snapshot.set_item(key, other.to_string());
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(key, error = %e, "failed to read session value"),
            }
        }

        Self {
            session,
            snapshot,
            dirty: HashSet::new(),
        }
    }

    /// Write every changed key back to the session.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the session store rejects a write.
    pub async fn flush(self) -> Result<(), StorageError> {
        for key in &self.dirty {
            match self.snapshot.get_item(key) {
                Some(value) => self.session.insert(key, value).await?,
                None => {
                    self.session.remove::<Value>(key).await?;
                }
            }
        }
        Ok(())
    }
}

impl KeyValueStore for SessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.snapshot.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.snapshot.set_item(key, value);
        self.dirty.insert(key.to_owned());
    }

    fn remove_item(&mut self, key: &str) {
        self.snapshot.remove_item(key);
        self.dirty.insert(key.to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use garden_records_core::{CartCandidate, CartStore};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_missing_key_is_absent() {
        let storage = SessionStorage::load(session(), &["cart"]).await;
        assert_eq!(storage.get_item("cart"), None);
    }

    #[tokio::test]
    async fn test_writes_reach_session_only_after_flush() {
        let session = session();

        let mut storage = SessionStorage::load(session.clone(), &["cart"]).await;
        storage.set_item("cart", "[]".to_string());
        assert_eq!(session.get::<String>("cart").await.unwrap(), None);

        storage.flush().await.unwrap();
        assert_eq!(
            session.get::<String>("cart").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_remove_is_flushed() {
        let session = session();
        session.insert("cart", "[]").await.unwrap();

        let mut storage = SessionStorage::load(session.clone(), &["cart"]).await;
        storage.remove_item("cart");
        storage.flush().await.unwrap();

        assert_eq!(session.get::<String>("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_string_value_is_kept_as_json_text() {
        let session = session();
        session
            .insert("cart", serde_json::json!([{"id": 1, "price": 10}]))
            .await
            .unwrap();

        let storage = SessionStorage::load(session, &["cart"]).await;
        let cart = CartStore::new(storage).get_cart();
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_cart_store_over_session_storage() {
        let session = session();

        let storage = SessionStorage::load(session.clone(), &["cart"]).await;
        let mut store = CartStore::new(storage);
        store
            .add_to_cart(&CartCandidate::new(1, 139.99).with_name("Abbey Road"))
            .unwrap();
        store.into_backend().flush().await.unwrap();

        let reloaded = SessionStorage::load(session, &["cart"]).await;
        let cart = CartStore::new(reloaded).get_cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines().first().unwrap().name, "Abbey Road");
    }
}
