//! Request orchestration.
//!
//! Loads settings and learner state from the [`FieldStore`], runs the
//! [`ResponseBlock`] state machine, persists the result and publishes
//! grades. Errors are `anyhow::Error`; grading refusals can be recovered
//! with `downcast_ref::<GradingError>()`.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::block::{Feedback, ResponseBlock, SubmitRequest};
use crate::error::GradingError;
use crate::messages::Catalog;
use crate::model::{AttemptState, BlockContext, Settings};
use crate::traits::{AssetResolver, FieldKey, FieldStore, GradeEvent, GradePublisher};
use crate::validation::{validate_settings, ValidationMessage};
use crate::view::{student_view, Fragment};

/// Grades submissions against host-provided collaborators.
pub struct GradingEngine {
    store: Arc<dyn FieldStore>,
    publisher: Arc<dyn GradePublisher>,
    assets: Arc<dyn AssetResolver>,
    catalog: Arc<dyn Catalog>,
}

impl GradingEngine {
    pub fn new(
        store: Arc<dyn FieldStore>,
        publisher: Arc<dyn GradePublisher>,
        assets: Arc<dyn AssetResolver>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            store,
            publisher,
            assets,
            catalog,
        }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Settings for the block, or defaults if none were saved.
    pub async fn load_settings(&self, context: &BlockContext) -> Result<Settings> {
        let key = FieldKey::settings(context);
        match self.store.get(&key).await? {
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("corrupt settings for {}", key.context)),
            None => Ok(Settings::default()),
        }
    }

    /// The learner's state, or an empty state on first view.
    pub async fn load_state(&self, context: &BlockContext) -> Result<AttemptState> {
        if context.student_id.is_none() {
            return Err(GradingError::MissingStudent(context.to_string()).into());
        }
        let key = FieldKey::user_state(context);
        match self.store.get(&key).await? {
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("corrupt learner state for {}", key.context)),
            None => Ok(AttemptState::default()),
        }
    }

    pub async fn load_block(&self, context: &BlockContext) -> Result<ResponseBlock> {
        let settings = self.load_settings(context).await?;
        let state = self.load_state(context).await?;
        Ok(ResponseBlock::new(settings, state))
    }

    /// Validate proposed settings without saving them.
    pub fn validate(&self, settings: &Settings) -> Vec<ValidationMessage> {
        validate_settings(settings, self.catalog())
    }

    /// Validate and save settings; rejects the whole set if anything is wrong.
    pub async fn save_settings(&self, context: &BlockContext, settings: &Settings) -> Result<()> {
        let messages = self.validate(settings);
        if !messages.is_empty() {
            return Err(GradingError::InvalidSettings(
                messages.into_iter().map(|m| m.text).collect(),
            )
            .into());
        }

        let key = FieldKey::settings(context);
        let value = serde_json::to_value(settings).context("failed to serialize settings")?;
        self.store.set(&key, value).await?;
        tracing::info!("saved settings for {}", key.context);
        Ok(())
    }

    /// Render the learner's current view.
    pub async fn student_view(&self, context: &BlockContext) -> Result<Fragment> {
        let block = self.load_block(context).await?;
        Ok(student_view(
            &block,
            context,
            self.catalog(),
            self.assets.as_ref(),
        ))
    }

    /// Submission handler: accepts `{"student_answer": "..."}`.
    pub async fn handle_submit(
        &self,
        context: &BlockContext,
        payload: serde_json::Value,
    ) -> Result<Feedback> {
        let request: SubmitRequest = serde_json::from_value(payload)
            .map_err(|e| GradingError::BadRequest(e.to_string()))?;
        self.submit(context, &request.student_answer).await
    }

    /// Grade an answer, persist the new state and publish any grade.
    pub async fn submit(&self, context: &BlockContext, answer: &str) -> Result<Feedback> {
        let mut block = self.load_block(context).await?;

        tracing::debug!(
            "submission for {context}: {} words, {} prior attempts",
            crate::credit::word_count(answer),
            block.state.count_attempts
        );

        let submission = match block.submit(answer, self.catalog()) {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!("rejected submission for {context}: {e}");
                return Err(e.into());
            }
        };

        let value = serde_json::to_value(&block.state).context("failed to serialize state")?;
        self.store
            .set(&FieldKey::user_state(context), value)
            .await
            .with_context(|| format!("failed to save learner state for {context}"))?;

        if let Some(grade) = submission.grade {
            let event = GradeEvent::new(context.clone(), grade);
            self.publisher
                .publish(&event)
                .await
                .with_context(|| format!("publisher '{}' failed", self.publisher.name()))?;
            tracing::info!(
                "published grade {}/{} for {context}",
                event.value,
                event.max_value
            );
        }

        Ok(submission.feedback)
    }
}
