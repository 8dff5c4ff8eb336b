//! In-memory collaborators for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use freetext_core::traits::{FieldKey, FieldStore, GradeEvent, GradePublisher};

/// A field store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<FieldKey, serde_json::Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FieldStore for InMemoryStore {
    async fn get(&self, key: &FieldKey) -> anyhow::Result<Option<serde_json::Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &FieldKey, value: serde_json::Value) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory store lock poisoned"))?;
        values.insert(key.clone(), value);
        Ok(())
    }
}

/// A publisher that keeps every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<GradeEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, oldest first.
    pub fn events(&self) -> Vec<GradeEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GradePublisher for RecordingPublisher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()> {
        self.events
            .lock()
            .map_err(|_| anyhow::anyhow!("recording publisher lock poisoned"))?
            .push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freetext_core::block::Grade;
    use freetext_core::BlockContext;

    #[tokio::test]
    async fn store_roundtrip_and_scoping() {
        let store = InMemoryStore::new();
        let alice = BlockContext::learner("c", "b", "alice");
        let bob = BlockContext::learner("c", "b", "bob");

        store
            .set(&FieldKey::user_state(&alice), serde_json::json!({"score": 1.0}))
            .await
            .unwrap();

        assert!(store.get(&FieldKey::user_state(&alice)).await.unwrap().is_some());
        assert!(store.get(&FieldKey::user_state(&bob)).await.unwrap().is_none());
        assert!(store.get(&FieldKey::settings(&alice)).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn recording_publisher_keeps_order() {
        let publisher = RecordingPublisher::new();
        let ctx = BlockContext::learner("c", "b", "s");
        for value in [1.0, 2.0] {
            publisher
                .publish(&GradeEvent::new(
                    ctx.clone(),
                    Grade {
                        value,
                        max_value: 2,
                    },
                ))
                .await
                .unwrap();
        }
        let values: Vec<f64> = publisher.events().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }
}
