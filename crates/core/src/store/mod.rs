pub mod memory;

use anyhow::Result;

pub use memory::MemoryKeyValueStore;

/// Session state the original client kept in ambient browser storage. The
/// store is injected so everything above it stays side-effect-free and
/// testable.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<Option<String>>;
}

pub mod keys {
    /// Bearer token for the upstream market API.
    pub const ACCESS_TOKEN: &str = "auth.access_token";

    /// Chat text handed off from the news page to the assistant page.
    pub const CHAT_DRAFT: &str = "chat.draft";
}

pub async fn stash_chat_draft(store: &dyn KeyValueStore, text: &str) -> Result<()> {
    store.put(keys::CHAT_DRAFT, text).await
}

/// Read-once hand-off: the draft is consumed by the first reader.
pub async fn take_chat_draft(store: &dyn KeyValueStore) -> Result<Option<String>> {
    store.remove(keys::CHAT_DRAFT).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chat_draft_is_read_once() {
        let store = MemoryKeyValueStore::new();
        stash_chat_draft(&store, "삼성전자 실적 요약해줘").await.unwrap();

        let first = take_chat_draft(&store).await.unwrap();
        assert_eq!(first.as_deref(), Some("삼성전자 실적 요약해줘"));

        let second = take_chat_draft(&store).await.unwrap();
        assert_eq!(second, None);
    }
}
