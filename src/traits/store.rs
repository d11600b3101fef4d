use crate::models::bundle::Bundle;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait BundleStore: Send + Sync {
    /// Store `bundle` under `id`, replacing whatever was there.
    async fn put(&self, id: String, bundle: Bundle);
    async fn get(&self, id: &str) -> Option<Arc<Bundle>>;
    async fn count(&self) -> u64;
}
