//! Validation of instructor-authored settings.
//!
//! Every failing check is collected so the authoring UI can show them all
//! at once.

use serde::Serialize;

use crate::messages::{Catalog, Message};
use crate::model::Settings;

/// A single problem found in a settings proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsIssue {
    NegativeWeight,
    NegativeMaxAttempts,
    NegativeMaxWordCount,
    MinWordCountBelowOne,
    MinAboveMaxWordCount,
    BlankSubmittedMessage,
}

impl SettingsIssue {
    /// Name of the settings field the issue is about.
    pub fn field(self) -> &'static str {
        match self {
            SettingsIssue::NegativeWeight => "weight",
            SettingsIssue::NegativeMaxAttempts => "max_attempts",
            SettingsIssue::NegativeMaxWordCount => "max_word_count",
            SettingsIssue::MinWordCountBelowOne | SettingsIssue::MinAboveMaxWordCount => {
                "min_word_count"
            }
            SettingsIssue::BlankSubmittedMessage => "submitted_message",
        }
    }
}

/// A rendered validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationMessage {
    pub issue: SettingsIssue,
    /// Field the message refers to.
    pub field: &'static str,
    /// Human-readable, localized text.
    pub text: String,
}

/// Check settings and return every issue found, in a stable order.
pub fn check_settings(settings: &Settings) -> Vec<SettingsIssue> {
    let mut issues = Vec::new();

    if settings.weight < 0 {
        issues.push(SettingsIssue::NegativeWeight);
    }
    if settings.max_attempts < 0 {
        issues.push(SettingsIssue::NegativeMaxAttempts);
    }
    if settings.max_word_count < 0 {
        issues.push(SettingsIssue::NegativeMaxWordCount);
    }
    if settings.min_word_count < 1 {
        issues.push(SettingsIssue::MinWordCountBelowOne);
    }
    if settings.min_word_count > settings.max_word_count {
        issues.push(SettingsIssue::MinAboveMaxWordCount);
    }
    if settings.submitted_message.is_empty() {
        issues.push(SettingsIssue::BlankSubmittedMessage);
    }

    issues
}

/// Validate settings and render each issue through `catalog`.
pub fn validate_settings(settings: &Settings, catalog: &dyn Catalog) -> Vec<ValidationMessage> {
    check_settings(settings)
        .into_iter()
        .map(|issue| ValidationMessage {
            issue,
            field: issue.field(),
            text: catalog.render(&Message::Settings(issue)),
        })
        .collect()
}
