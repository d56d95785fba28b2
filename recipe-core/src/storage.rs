use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;

#[derive(Debug, Clone)]
enum Backend {
    Dir(PathBuf),
    Memory(Arc<RwLock<HashMap<String, Vec<u8>>>>),
}

/// Flat namespace of JSON documents, one `<key>.json` file per key.
///
/// Saves replace the whole document. Missing or unreadable documents load as
/// the caller's default.
#[derive(Debug, Clone)]
pub struct JsonStore {
    backend: Backend,
}

impl JsonStore {
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::default()),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            backend: Backend::Dir(dir.as_ref().to_path_buf()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Dir(dir) => Some(dir),
            Backend::Memory(_) => None,
        }
    }

    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        self.dir().map(|dir| dir.join(format!("{key}.json")))
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match &self.backend {
            Backend::Memory(docs) => {
                let docs = docs.read().await;
                docs.get(key)
                    .and_then(|bytes| serde_json::from_slice(bytes).ok())
                    .unwrap_or(default)
            }
            Backend::Dir(dir) => {
                let path = dir.join(format!("{key}.json"));
                read_json_with_tmp_fallback(&path).await.unwrap_or(default)
            }
        }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        match &self.backend {
            Backend::Memory(docs) => {
                docs.write().await.insert(key.to_owned(), bytes);
            }
            Backend::Dir(dir) => {
                tokio::fs::create_dir_all(dir).await?;
                let path = dir.join(format!("{key}.json"));
                // atomic replace
                let tmp = path.with_extension("json.tmp");
                tokio::fs::write(&tmp, &bytes).await?;
                tokio::fs::rename(&tmp, &path).await?;
                debug!(path = %path.display(), "document saved");
            }
        }
        Ok(())
    }
}

async fn read_json_with_tmp_fallback<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice::<T>(&bytes) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to parse JSON, trying tmp fallback");
            let tmp = path.with_extension("json.tmp");
            let tmp_bytes = tokio::fs::read(&tmp).await.ok()?;
            serde_json::from_slice::<T>(&tmp_bytes).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn missing_key_returns_default() {
        let store = JsonStore::in_memory();
        let ratings: HashMap<String, u8> = store.load("ratings", HashMap::new()).await;
        assert!(ratings.is_empty());
    }

    #[tokio::test]
    async fn in_memory_round_trip() {
        let store = JsonStore::in_memory();
        let doc = json!({ "52977": 4 });
        store.save("ratings", &doc).await.unwrap();
        let loaded: Value = store.load("ratings", json!({})).await;
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn save_overwrites_without_merging() {
        let store = JsonStore::in_memory();
        store.save("favorites", &json!({ "a": 1, "b": 2 })).await.unwrap();
        store.save("favorites", &json!({ "c": 3 })).await.unwrap();
        let loaded: Value = store.load("favorites", json!({})).await;
        assert_eq!(loaded, json!({ "c": 3 }));
    }
}
