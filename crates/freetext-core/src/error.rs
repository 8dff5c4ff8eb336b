//! Grading error types.
//!
//! Invalid word counts are not errors; they are reported through the
//! feedback payload. These variants are the conditions that abort a request.

use thiserror::Error;

/// Errors that abort a grading request without mutating learner state.
#[derive(Debug, Error)]
pub enum GradingError {
    /// The learner already used every allowed attempt.
    #[error("user has already exceeded the maximum number of allowed attempts ({used} of {max})")]
    AttemptsExhausted { used: u32, max: i64 },

    /// Proposed settings failed validation.
    #[error("invalid settings: {}", .0.join("; "))]
    InvalidSettings(Vec<String>),

    /// The submission payload could not be understood.
    #[error("bad submission: {0}")]
    BadRequest(String),

    /// A learner-scoped operation was given a context without a student.
    #[error("no student in context {0}")]
    MissingStudent(String),
}

impl GradingError {
    /// Returns `true` if retrying the same request can never succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GradingError::AttemptsExhausted { .. } | GradingError::MissingStudent(_)
        )
    }
}
