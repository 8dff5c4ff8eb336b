//! The per-learner question state machine.
//!
//! `Unanswered → Answered → Locked`. Only valid-length submissions advance
//! the attempt counter; invalid ones are stored but leave the learner free
//! to resubmit.

use serde::{Deserialize, Serialize};

use crate::credit::{determine_credit, word_count_valid};
use crate::error::GradingError;
use crate::messages::{Catalog, Message};
use crate::model::{AttemptState, Credit, Settings};

/// Correctness indicator shown next to the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Unanswered,
    Incorrect,
    Correct,
}

impl Indicator {
    /// CSS class used by the view.
    pub fn css_class(self) -> &'static str {
        match self {
            Indicator::Unanswered => "unanswered",
            Indicator::Incorrect => "incorrect",
            Indicator::Correct => "correct",
        }
    }
}

/// Feedback returned to the learner's browser after a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub status: String,
    pub problem_progress: String,
    pub indicator_class: Indicator,
    pub used_attempts_feedback: String,
    pub submit_class: String,
    /// Mirrors `submit_class` for clients that prefer a flag.
    pub submit_disabled: bool,
    pub word_count_message: String,
    pub submitted_message: String,
}

/// Grade to report to the host after a scored submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub value: f64,
    pub max_value: i64,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub feedback: Feedback,
    /// Present only when the answer was scored.
    pub grade: Option<Grade>,
}

/// Request body of the submission handler.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub student_answer: String,
}

/// A question instance bound to one learner's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBlock {
    pub settings: Settings,
    pub state: AttemptState,
}

impl ResponseBlock {
    pub fn new(settings: Settings, state: AttemptState) -> Self {
        Self { settings, state }
    }

    /// Credit earned by the stored answer, recomputed on every call.
    pub fn credit(&self) -> Credit {
        determine_credit(&self.state.student_answer, &self.settings)
    }

    pub fn word_count_valid(&self) -> bool {
        word_count_valid(&self.state.student_answer, &self.settings)
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.settings.attempts_exhausted(self.state.count_attempts)
    }

    pub fn indicator(&self) -> Indicator {
        if self.state.count_attempts == 0 {
            Indicator::Unanswered
        } else if self.credit() == Credit::Zero {
            Indicator::Incorrect
        } else {
            Indicator::Correct
        }
    }

    /// `"hidden"` when correctness should not be shown.
    pub fn indicator_visibility_class(&self) -> &'static str {
        if self.settings.display_correctness {
            ""
        } else {
            "hidden"
        }
    }

    pub fn problem_progress(&self, catalog: &dyn Catalog) -> String {
        let weight = self.settings.weight;
        if self.state.score == 0.0 {
            catalog.render(&Message::PointsPossible { weight })
        } else {
            catalog.render(&Message::PointsScored {
                score: self.state.score,
                weight,
            })
        }
    }

    pub fn used_attempts_feedback(&self, catalog: &dyn Catalog) -> String {
        if self.settings.max_attempts > 0 {
            catalog.render(&Message::AttemptsUsed {
                used: self.state.count_attempts,
                max: self.settings.max_attempts,
            })
        } else {
            String::new()
        }
    }

    pub fn submit_class(&self) -> &'static str {
        if self.attempts_exhausted() {
            "nodisplay"
        } else {
            ""
        }
    }

    /// Word-count warning; shown once answered, or always when `ignore_attempts`.
    pub fn word_count_message(&self, catalog: &dyn Catalog, ignore_attempts: bool) -> String {
        if (ignore_attempts || self.state.count_attempts > 0) && !self.word_count_valid() {
            catalog.render(&Message::WordCountInvalid {
                min: self.settings.min_word_count,
                max: self.settings.max_word_count,
            })
        } else {
            String::new()
        }
    }

    pub fn submitted_message(&self) -> &str {
        if self.state.count_attempts > 0 && self.word_count_valid() {
            &self.settings.submitted_message
        } else {
            ""
        }
    }

    /// Build the feedback payload for the current state.
    pub fn feedback(&self, catalog: &dyn Catalog) -> Feedback {
        let submit_class = self.submit_class();
        Feedback {
            status: "success".to_string(),
            problem_progress: self.problem_progress(catalog),
            indicator_class: self.indicator(),
            used_attempts_feedback: self.used_attempts_feedback(catalog),
            submit_class: submit_class.to_string(),
            submit_disabled: !submit_class.is_empty(),
            word_count_message: self.word_count_message(catalog, true),
            submitted_message: self.submitted_message().to_string(),
        }
    }

    /// Process a learner's answer.
    ///
    /// Fails without touching state once attempts are exhausted. Otherwise
    /// the answer is stored; a valid-length answer is counted and scored.
    /// With unlimited attempts the counter is set to 1 rather than
    /// incremented.
    pub fn submit(
        &mut self,
        answer: impl Into<String>,
        catalog: &dyn Catalog,
    ) -> Result<Submission, GradingError> {
        if self.attempts_exhausted() {
            return Err(GradingError::AttemptsExhausted {
                used: self.state.count_attempts,
                max: self.settings.max_attempts,
            });
        }

        self.state.student_answer = answer.into();

        let grade = if self.word_count_valid() {
            if self.settings.max_attempts == 0 {
                self.state.count_attempts = 1;
            } else {
                self.state.count_attempts += 1;
            }
            self.state.score = self.credit().score(self.settings.weight);
            Some(Grade {
                value: self.state.score,
                max_value: self.settings.weight,
            })
        } else {
            None
        };

        Ok(Submission {
            feedback: self.feedback(catalog),
            grade,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::EnglishCatalog;

    fn block(settings: Settings) -> ResponseBlock {
        ResponseBlock::new(settings, AttemptState::default())
    }

    fn ten_points() -> Settings {
        Settings {
            weight: 10,
            ..Settings::default()
        }
    }

    #[test]
    fn unanswered_view_state() {
        let b = block(ten_points());
        assert_eq!(b.indicator(), Indicator::Unanswered);
        assert_eq!(b.problem_progress(&EnglishCatalog), "10 points possible");
        assert_eq!(b.submitted_message(), "");
        assert_eq!(b.word_count_message(&EnglishCatalog, false), "");
        assert_eq!(b.used_attempts_feedback(&EnglishCatalog), "");
    }

    #[test]
    fn no_keyphrases_scores_full() {
        let mut b = block(Settings {
            min_word_count: 1,
            max_word_count: 5,
            ..ten_points()
        });
        let sub = b.submit("a b c", &EnglishCatalog).unwrap();
        assert_eq!(b.state.score, 10.0);
        assert_eq!(sub.feedback.indicator_class, Indicator::Correct);
        assert_eq!(sub.feedback.problem_progress, "10/10 points");
        assert_eq!(
            sub.feedback.submitted_message,
            "Your submission has been received"
        );
        assert_eq!(
            sub.grade,
            Some(Grade {
                value: 10.0,
                max_value: 10
            })
        );
    }

    #[test]
    fn full_phrase_scores_full() {
        let mut b = block(Settings {
            fullcredit_keyphrases: vec!["photosynthesis".into()],
            ..ten_points()
        });
        b.submit("I love photosynthesis", &EnglishCatalog).unwrap();
        assert_eq!(b.state.score, 10.0);
    }

    #[test]
    fn half_phrase_scores_half() {
        let mut b = block(Settings {
            fullcredit_keyphrases: vec!["photosynthesis".into()],
            halfcredit_keyphrases: vec!["sunlight".into()],
            ..ten_points()
        });
        let sub = b.submit("plants need sunlight", &EnglishCatalog).unwrap();
        assert_eq!(b.state.score, 5.0);
        assert_eq!(sub.feedback.problem_progress, "5/10 points");
        assert_eq!(sub.feedback.indicator_class, Indicator::Correct);
    }

    #[test]
    fn no_match_is_incorrect() {
        let mut b = block(Settings {
            fullcredit_keyphrases: vec!["photosynthesis".into()],
            ..ten_points()
        });
        let sub = b.submit("plants are green", &EnglishCatalog).unwrap();
        assert_eq!(b.state.score, 0.0);
        assert_eq!(b.state.count_attempts, 1);
        assert_eq!(sub.feedback.indicator_class, Indicator::Incorrect);
        assert_eq!(sub.feedback.problem_progress, "10 points possible");
        assert_eq!(sub.grade.map(|g| g.value), Some(0.0));
    }

    #[test]
    fn short_answer_is_not_counted() {
        let mut b = block(Settings {
            min_word_count: 3,
            ..ten_points()
        });
        let sub = b.submit("hi", &EnglishCatalog).unwrap();
        assert_eq!(b.state.count_attempts, 0);
        assert_eq!(b.state.score, 0.0);
        assert_eq!(b.state.student_answer, "hi");
        assert!(!sub.feedback.word_count_message.is_empty());
        assert_eq!(sub.feedback.submitted_message, "");
        assert_eq!(sub.feedback.indicator_class, Indicator::Unanswered);
        assert!(sub.grade.is_none());
    }

    #[test]
    fn invalid_resubmission_keeps_previous_score() {
        let mut b = block(Settings {
            min_word_count: 3,
            ..ten_points()
        });
        b.submit("one two three", &EnglishCatalog).unwrap();
        assert_eq!(b.state.score, 10.0);

        let sub = b.submit("hi", &EnglishCatalog).unwrap();
        assert_eq!(b.state.score, 10.0);
        assert_eq!(b.state.count_attempts, 1);
        assert!(sub.grade.is_none());
        // The stored answer is now too short, so the current credit is zero.
        assert_eq!(sub.feedback.indicator_class, Indicator::Incorrect);
        assert_eq!(sub.feedback.submitted_message, "");
    }

    #[test]
    fn unlimited_attempts_pin_counter_to_one() {
        let mut b = block(ten_points());
        for _ in 0..3 {
            b.submit("answer", &EnglishCatalog).unwrap();
        }
        assert_eq!(b.state.count_attempts, 1);
    }

    #[test]
    fn limited_attempts_increment_then_lock() {
        let mut b = block(Settings {
            max_attempts: 2,
            ..ten_points()
        });
        let first = b.submit("first", &EnglishCatalog).unwrap();
        assert_eq!(first.feedback.used_attempts_feedback, "You have used 1 of 2 submissions");
        assert!(!first.feedback.submit_disabled);

        let second = b.submit("second", &EnglishCatalog).unwrap();
        assert_eq!(b.state.count_attempts, 2);
        assert_eq!(second.feedback.submit_class, "nodisplay");
        assert!(second.feedback.submit_disabled);

        let err = b.submit("third", &EnglishCatalog).unwrap_err();
        assert!(matches!(
            err,
            GradingError::AttemptsExhausted { used: 2, max: 2 }
        ));
        assert_eq!(b.state.student_answer, "second");
        assert_eq!(b.state.score, 10.0);
    }

    #[test]
    fn invalid_answers_do_not_consume_limited_attempts() {
        let mut b = block(Settings {
            max_attempts: 1,
            min_word_count: 2,
            ..ten_points()
        });
        b.submit("short", &EnglishCatalog).unwrap();
        b.submit("short", &EnglishCatalog).unwrap();
        assert_eq!(b.state.count_attempts, 0);
        b.submit("long enough", &EnglishCatalog).unwrap();
        assert!(b.attempts_exhausted());
    }

    #[test]
    fn hidden_indicator_when_correctness_not_displayed() {
        let b = block(Settings {
            display_correctness: false,
            ..Settings::default()
        });
        assert_eq!(b.indicator_visibility_class(), "hidden");
        assert_eq!(block(Settings::default()).indicator_visibility_class(), "");
    }

    #[test]
    fn feedback_serializes_to_expected_json() {
        let mut b = block(ten_points());
        let sub = b.submit("yes", &EnglishCatalog).unwrap();
        let json = serde_json::to_value(&sub.feedback).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["indicator_class"], "correct");
        assert_eq!(json["submit_class"], "");
        assert_eq!(json["submit_disabled"], false);
    }

    #[test]
    fn submit_request_requires_answer() {
        let ok: SubmitRequest = serde_json::from_str(r#"{"student_answer": "x"}"#).unwrap();
        assert_eq!(ok.student_answer, "x");
        assert!(serde_json::from_str::<SubmitRequest>("{}").is_err());
    }
}
