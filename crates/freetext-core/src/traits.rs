//! Collaborator traits supplied by the host runtime.
//!
//! The grading core never persists, publishes or resolves URLs on its own;
//! `freetext-runtime` implements these for standalone use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::block::Grade;
use crate::model::BlockContext;

// ---------------------------------------------------------------------------
// Field storage
// ---------------------------------------------------------------------------

/// Which family of fields a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Author settings, shared by all learners of a block.
    Settings,
    /// One learner's state for a block.
    UserState,
}

/// Address of a stored value: scope plus (course, block, student).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldKey {
    pub scope: Scope,
    pub context: BlockContext,
}

impl FieldKey {
    pub fn settings(context: &BlockContext) -> Self {
        Self {
            scope: Scope::Settings,
            context: context.without_student(),
        }
    }

    pub fn user_state(context: &BlockContext) -> Self {
        Self {
            scope: Scope::UserState,
            context: context.clone(),
        }
    }

    /// Flat string form, stable across runs; used by file-backed stores.
    pub fn storage_key(&self) -> String {
        let scope = match self.scope {
            Scope::Settings => "settings",
            Scope::UserState => "user_state",
        };
        match &self.context.student_id {
            Some(student) => format!(
                "{scope}:{}:{}:{}",
                self.context.course_id, self.context.block_id, student
            ),
            None => format!(
                "{scope}:{}:{}",
                self.context.course_id, self.context.block_id
            ),
        }
    }
}

/// Scoped key-value persistence.
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Read a value; `None` if nothing was ever written.
    async fn get(&self, key: &FieldKey) -> anyhow::Result<Option<serde_json::Value>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &FieldKey, value: serde_json::Value) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Grade publication
// ---------------------------------------------------------------------------

/// A grade notification sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEvent {
    pub id: Uuid,
    pub context: BlockContext,
    pub value: f64,
    pub max_value: i64,
    pub published_at: DateTime<Utc>,
}

impl GradeEvent {
    pub fn new(context: BlockContext, grade: Grade) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            value: grade.value,
            max_value: grade.max_value,
            published_at: Utc::now(),
        }
    }
}

/// Sink for grade events.
#[async_trait]
pub trait GradePublisher: Send + Sync {
    /// Human-readable publisher name (e.g. "log").
    fn name(&self) -> &str;

    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Static assets
// ---------------------------------------------------------------------------

/// Resolves public URLs for the block's static assets.
pub trait AssetResolver: Send + Sync {
    fn resource_url(&self, context: &BlockContext, path: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_key_drops_student() {
        let ctx = BlockContext::learner("c", "b", "s");
        let key = FieldKey::settings(&ctx);
        assert_eq!(key.scope, Scope::Settings);
        assert!(key.context.student_id.is_none());
        assert_eq!(key.storage_key(), "settings:c:b");
    }

    #[test]
    fn user_state_key_keeps_student() {
        let ctx = BlockContext::learner("c", "b", "s");
        assert_eq!(FieldKey::user_state(&ctx).storage_key(), "user_state:c:b:s");
    }

    #[test]
    fn grade_event_copies_grade() {
        let event = GradeEvent::new(
            BlockContext::learner("c", "b", "s"),
            Grade {
                value: 2.5,
                max_value: 5,
            },
        );
        assert_eq!(event.value, 2.5);
        assert_eq!(event.max_value, 5);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["max_value"], 5);
    }
}
