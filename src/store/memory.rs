use crate::models::bundle::Bundle;
use crate::traits::BundleStore;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

/// Process-local bundle store. Entries are never evicted or expired.
#[derive(Clone)]
pub struct MemoryBundleStore {
    bundles: Cache<String, Arc<Bundle>>,
}

impl MemoryBundleStore {
    pub fn new() -> Self {
        Self {
            bundles: Cache::builder().build(),
        }
    }
}

impl Default for MemoryBundleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BundleStore for MemoryBundleStore {
    async fn put(&self, id: String, bundle: Bundle) {
        self.bundles.insert(id, Arc::new(bundle)).await;
    }

    async fn get(&self, id: &str) -> Option<Arc<Bundle>> {
        self.bundles.get(id).await
    }

    async fn count(&self) -> u64 {
        self.bundles.run_pending_tasks().await;
        self.bundles.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::BundleFile;
    use serde_json::json;

    fn bundle(name: &str) -> Bundle {
        Bundle {
            files: vec![BundleFile {
                name: name.to_string(),
                geojson: json!({"type": "FeatureCollection", "features": []}),
            }],
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn get_returns_what_was_put() {
        let store = MemoryBundleStore::new();
        store.put("abc".into(), bundle("a.geojson")).await;
        let got = store.get("abc").await.expect("stored");
        assert_eq!(got.files[0].name, "a.geojson");
        assert!(store.get("nope").await.is_none());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn put_overwrites_on_collision() {
        let store = MemoryBundleStore::new();
        store.put("abc".into(), bundle("first.json")).await;
        store.put("abc".into(), bundle("second.json")).await;
        assert_eq!(store.get("abc").await.unwrap().files[0].name, "second.json");
        assert_eq!(store.count().await, 1);
    }
}
