//! The `freetext submit` command.

use anyhow::Result;

use freetext_core::messages::Message;
use freetext_core::GradingError;

use super::engine_from;
use crate::LearnerArgs;

pub async fn execute(learner: LearnerArgs, answer: String) -> Result<()> {
    let engine = engine_from(learner.config.as_deref())?;
    let context = learner.context();

    let feedback = match engine
        .handle_submit(&context, serde_json::json!({ "student_answer": answer }))
        .await
    {
        Ok(feedback) => feedback,
        Err(e) => {
            if let Some(GradingError::AttemptsExhausted { .. }) = e.downcast_ref::<GradingError>() {
                anyhow::bail!("{}", engine.catalog().render(&Message::AttemptsExhausted));
            }
            return Err(e);
        }
    };

    println!("{}", serde_json::to_string_pretty(&feedback)?);
    Ok(())
}
