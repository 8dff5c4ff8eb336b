//! Core data model types for freetext.
//!
//! Settings are authored by the instructor and shared by every learner;
//! attempt state is per learner and mutated only by submissions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instructor-configured settings for one free-text question.
///
/// Integer fields are signed so that bad authoring input survives
/// deserialization and can be reported by [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Title shown in the course navigation.
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Question text shown above the answer box.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Maximum achievable score.
    #[serde(default = "default_weight")]
    pub weight: i64,
    /// Allowed scored submissions; 0 means unlimited.
    #[serde(default)]
    pub max_attempts: i64,
    /// Show the correctness indicator after answering.
    #[serde(default = "default_true")]
    pub display_correctness: bool,
    #[serde(default = "default_min_word_count")]
    pub min_word_count: i64,
    #[serde(default = "default_max_word_count")]
    pub max_word_count: i64,
    /// Phrases that earn full credit when found in the answer.
    #[serde(default)]
    pub fullcredit_keyphrases: Vec<String>,
    /// Phrases that earn half credit when found in the answer.
    #[serde(default)]
    pub halfcredit_keyphrases: Vec<String>,
    /// Acknowledgement shown after a valid submission.
    #[serde(default = "default_submitted_message")]
    pub submitted_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            prompt: default_prompt(),
            weight: default_weight(),
            max_attempts: 0,
            display_correctness: true,
            min_word_count: default_min_word_count(),
            max_word_count: default_max_word_count(),
            fullcredit_keyphrases: Vec::new(),
            halfcredit_keyphrases: Vec::new(),
            submitted_message: default_submitted_message(),
        }
    }
}

impl Settings {
    /// Fields an author may change from the editing UI, in display order.
    pub const EDITABLE_FIELDS: [&'static str; 10] = [
        "display_name",
        "prompt",
        "weight",
        "max_attempts",
        "display_correctness",
        "min_word_count",
        "max_word_count",
        "fullcredit_keyphrases",
        "halfcredit_keyphrases",
        "submitted_message",
    ];

    /// Whether at least one full- or half-credit phrase is configured.
    pub fn has_keyphrases(&self) -> bool {
        !self.fullcredit_keyphrases.is_empty() || !self.halfcredit_keyphrases.is_empty()
    }

    /// Whether a learner with `count_attempts` scored submissions is locked out.
    pub fn attempts_exhausted(&self, count_attempts: u32) -> bool {
        self.max_attempts > 0 && i64::from(count_attempts) >= self.max_attempts
    }
}

fn default_display_name() -> String {
    "Free-text Response".to_string()
}

fn default_prompt() -> String {
    "Enter a prompt or question here".to_string()
}

fn default_weight() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_min_word_count() -> i64 {
    1
}

fn default_max_word_count() -> i64 {
    10000
}

fn default_submitted_message() -> String {
    "Your submission has been received".to_string()
}

/// Per-learner mutable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptState {
    #[serde(default)]
    pub student_answer: String,
    /// Number of scored (valid-length) submissions.
    #[serde(default)]
    pub count_attempts: u32,
    #[serde(default)]
    pub score: f64,
}

/// Qualitative outcome of a submission before conversion to points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credit {
    Zero,
    Half,
    Full,
}

impl Credit {
    /// Convert this credit tier into points out of `weight`.
    pub fn score(self, weight: i64) -> f64 {
        match self {
            Credit::Zero => 0.0,
            Credit::Half => weight as f64 / 2.0,
            Credit::Full => weight as f64,
        }
    }
}

impl fmt::Display for Credit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credit::Zero => write!(f, "zero"),
            Credit::Half => write!(f, "half"),
            Credit::Full => write!(f, "full"),
        }
    }
}

impl FromStr for Credit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" | "none" => Ok(Credit::Zero),
            "half" => Ok(Credit::Half),
            "full" => Ok(Credit::Full),
            other => Err(format!("unknown credit tier: {other}")),
        }
    }
}

/// Identifies one block instance, optionally for one learner.
///
/// Settings live under a context without a student; attempt state always
/// carries one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockContext {
    pub course_id: String,
    pub block_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
}

impl BlockContext {
    /// Context addressing the block's shared settings.
    pub fn block(course_id: impl Into<String>, block_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            block_id: block_id.into(),
            student_id: None,
        }
    }

    /// Context addressing one learner's view of the block.
    pub fn learner(
        course_id: impl Into<String>,
        block_id: impl Into<String>,
        student_id: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            block_id: block_id.into(),
            student_id: Some(student_id.into()),
        }
    }

    /// The same block without the learner.
    pub fn without_student(&self) -> Self {
        Self {
            course_id: self.course_id.clone(),
            block_id: self.block_id.clone(),
            student_id: None,
        }
    }
}

impl fmt::Display for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.student_id {
            Some(student) => write!(f, "{}/{}@{}", self.course_id, self.block_id, student),
            None => write!(f, "{}/{}", self.course_id, self.block_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.weight, 1);
        assert_eq!(settings.max_attempts, 0);
        assert_eq!(settings.min_word_count, 1);
        assert_eq!(settings.max_word_count, 10000);
        assert!(settings.display_correctness);
        assert!(!settings.has_keyphrases());
    }

    #[test]
    fn settings_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"weight": 10}"#).unwrap();
        assert_eq!(settings.weight, 10);
        assert_eq!(settings.submitted_message, "Your submission has been received");
        assert_eq!(settings.max_word_count, 10000);
    }

    #[test]
    fn attempts_exhausted_only_when_limited() {
        let mut settings = Settings::default();
        assert!(!settings.attempts_exhausted(100));
        settings.max_attempts = 2;
        assert!(!settings.attempts_exhausted(1));
        assert!(settings.attempts_exhausted(2));
        assert!(settings.attempts_exhausted(3));
    }

    #[test]
    fn credit_score_mapping() {
        assert_eq!(Credit::Zero.score(10), 0.0);
        assert_eq!(Credit::Half.score(10), 5.0);
        assert_eq!(Credit::Half.score(3), 1.5);
        assert_eq!(Credit::Full.score(10), 10.0);
    }

    #[test]
    fn credit_display_and_parse() {
        assert_eq!(Credit::Half.to_string(), "half");
        assert_eq!("FULL".parse::<Credit>().unwrap(), Credit::Full);
        assert!("double".parse::<Credit>().is_err());
    }

    #[test]
    fn block_context_display() {
        let ctx = BlockContext::learner("bio101", "q1", "alice");
        assert_eq!(ctx.to_string(), "bio101/q1@alice");
        assert_eq!(ctx.without_student().to_string(), "bio101/q1");
    }
}
