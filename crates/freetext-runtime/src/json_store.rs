//! JSON-file field store.
//!
//! All fields live in one JSON object keyed by `FieldKey::storage_key`.
//! Every write rewrites the file through a temporary sibling and a rename,
//! so a crash never leaves a half-written store behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use freetext_core::traits::{FieldKey, FieldStore};

use crate::error::StoreError;

type Fields = BTreeMap<String, serde_json::Value>;

/// A field store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Fields, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Fields::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Fields::new()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    async fn write_all(&self, fields: &Fields) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(fields).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[async_trait]
impl FieldStore for JsonFileStore {
    async fn get(&self, key: &FieldKey) -> anyhow::Result<Option<serde_json::Value>> {
        let _guard = self.lock.lock().await;
        let fields = self.read_all().await?;
        Ok(fields.get(&key.storage_key()).cloned())
    }

    async fn set(&self, key: &FieldKey, value: serde_json::Value) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut fields = self.read_all().await?;
        fields.insert(key.storage_key(), value);
        self.write_all(&fields).await?;
        tracing::debug!("wrote {} to {}", key.storage_key(), self.path.display());
        Ok(())
    }
}
