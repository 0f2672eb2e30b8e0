use super::KeyValueStore;
use anyhow::Result;
use std::collections::HashMap;

/// In-process store. One instance per server; every handler shares it.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    inner: tokio::sync::Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.inner.lock().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.inner.lock().await;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<String>> {
        let mut guard = self.inner.lock().await;
        Ok(guard.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_and_removes() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.put("k", "v1").await.unwrap();
        store.put("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        assert_eq!(store.remove("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.remove("k").await.unwrap(), None);
    }
}
