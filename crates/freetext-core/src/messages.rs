//! Localized learner- and author-facing strings.
//!
//! The grading logic never formats text itself; it builds a [`Message`] and
//! asks a [`Catalog`] to render it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::validation::SettingsIssue;

/// A user-visible message with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Progress before any points are earned.
    PointsPossible { weight: i64 },
    /// Progress once points are earned.
    PointsScored { score: f64, weight: i64 },
    /// Attempts used out of the limit.
    AttemptsUsed { used: u32, max: i64 },
    /// Answer length outside the configured bounds.
    WordCountInvalid { min: i64, max: i64 },
    /// Submission refused because the limit was reached.
    AttemptsExhausted,
    /// Label of the submit button.
    SubmitButton,
    /// A settings validation failure.
    Settings(SettingsIssue),
}

/// Source of localized strings.
pub trait Catalog: Send + Sync {
    /// The locale this catalog renders.
    fn locale(&self) -> Locale;

    /// Render a message in this catalog's language.
    fn render(&self, message: &Message) -> String;
}

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// The built-in catalog for this locale.
    pub fn catalog(self) -> Arc<dyn Catalog> {
        match self {
            Locale::En => Arc::new(EnglishCatalog),
            Locale::Ru => Arc::new(RussianCatalog),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Ru => write!(f, "ru"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "ru" | "ru-ru" | "russian" => Ok(Locale::Ru),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Format a score in `%g` style: six significant digits, no trailing
/// zeros, exponent form outside `1e-4..1e6`.
pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return format!("{score}");
    }

    // `{:.5e}` rounds to six significant digits and yields e.g. "1.23457e6".
    let scientific = format!("{score:.5e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if (-4..6).contains(&exponent) {
        let decimals = (5 - exponent) as usize;
        trim_fraction(&format!("{score:.decimals$}")).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// English strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl Catalog for EnglishCatalog {
    fn locale(&self) -> Locale {
        Locale::En
    }

    fn render(&self, message: &Message) -> String {
        match message {
            Message::PointsPossible { weight } => {
                if *weight == 1 {
                    format!("{weight} point possible")
                } else {
                    format!("{weight} points possible")
                }
            }
            Message::PointsScored { score, weight } => {
                let score = format_score(*score);
                if *weight == 1 {
                    format!("{score}/{weight} point")
                } else {
                    format!("{score}/{weight} points")
                }
            }
            Message::AttemptsUsed { used, max } => {
                format!("You have used {used} of {max} submissions")
            }
            Message::WordCountInvalid { min, max } => format!(
                "Invalid Word Count. Your response must be between {min} and {max} words."
            ),
            Message::AttemptsExhausted => {
                "User has already exceeded the maximum number of allowed attempts".to_string()
            }
            Message::SubmitButton => "Submit".to_string(),
            Message::Settings(issue) => match issue {
                SettingsIssue::NegativeWeight => "Weight Attempts cannot be negative",
                SettingsIssue::NegativeMaxAttempts => "Maximum Attempts cannot be negative",
                SettingsIssue::NegativeMaxWordCount => "Maximum Word Count cannot be negative",
                SettingsIssue::MinWordCountBelowOne => "Minimum Word Count cannot be less than 1",
                SettingsIssue::MinAboveMaxWordCount => {
                    "Minimum Word Count cannot be greater than Max Word Count"
                }
                SettingsIssue::BlankSubmittedMessage => {
                    "Submission Received Message cannot be blank"
                }
            }
            .to_string(),
        }
    }
}

/// Russian strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RussianCatalog;

/// Russian plural category for `n`: one, few or many.
fn russian_plural<'a>(n: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let n = n.unsigned_abs();
    match (n % 10, n % 100) {
        (1, r) if r != 11 => one,
        (2..=4, r) if !(12..=14).contains(&r) => few,
        _ => many,
    }
}

impl Catalog for RussianCatalog {
    fn locale(&self) -> Locale {
        Locale::Ru
    }

    fn render(&self, message: &Message) -> String {
        match message {
            Message::PointsPossible { weight } => {
                let noun = russian_plural(*weight, "балл", "балла", "баллов");
                format!("Максимум {weight} {noun}")
            }
            Message::PointsScored { score, weight } => {
                let noun = russian_plural(*weight, "балл", "балла", "баллов");
                format!("{}/{weight} {noun}", format_score(*score))
            }
            Message::AttemptsUsed { used, max } => {
                format!("Вы использовали {used} из {max} попыток")
            }
            Message::WordCountInvalid { min, max } => format!(
                "Неверное количество слов. Ваш ответ должен содержать не менее {min} и не более {max} слов."
            ),
            Message::AttemptsExhausted => {
                "Превышено максимальное количество попыток".to_string()
            }
            Message::SubmitButton => "Отправить".to_string(),
            Message::Settings(issue) => match issue {
                SettingsIssue::NegativeWeight => "Вес задания не может быть отрицательным",
                SettingsIssue::NegativeMaxAttempts => {
                    "Максимальное количество попыток не может быть отрицательным"
                }
                SettingsIssue::NegativeMaxWordCount => {
                    "Максимальное количество слов не может быть отрицательным"
                }
                SettingsIssue::MinWordCountBelowOne => {
                    "Минимальное количество слов не может быть меньше 1"
                }
                SettingsIssue::MinAboveMaxWordCount => {
                    "Минимальное количество слов не может превышать максимальное"
                }
                SettingsIssue::BlankSubmittedMessage => {
                    "Сообщение после отправки ответа не может быть пустым"
                }
            }
            .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_display_and_parse() {
        assert_eq!(Locale::Ru.to_string(), "ru");
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ru-RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn score_formatting_drops_trailing_zero() {
        assert_eq!(format_score(10.0), "10");
        assert_eq!(format_score(2.5), "2.5");
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(999999.0), "999999");
    }

    #[test]
    fn large_and_tiny_scores_use_exponent_form() {
        assert_eq!(format_score(1e7), "1e+07");
        assert_eq!(format_score(1234567.0), "1.23457e+06");
        assert_eq!(format_score(1e21), "1e+21");
        assert_eq!(format_score(0.0001), "0.0001");
        assert_eq!(format_score(0.00001), "1e-05");
    }

    #[test]
    fn english_progress_plurals() {
        let c = EnglishCatalog;
        assert_eq!(
            c.render(&Message::PointsPossible { weight: 1 }),
            "1 point possible"
        );
        assert_eq!(
            c.render(&Message::PointsPossible { weight: 10 }),
            "10 points possible"
        );
        assert_eq!(
            c.render(&Message::PointsScored {
                score: 5.0,
                weight: 10
            }),
            "5/10 points"
        );
        assert_eq!(
            c.render(&Message::PointsScored {
                score: 0.5,
                weight: 1
            }),
            "0.5/1 point"
        );
    }

    #[test]
    fn english_word_count_message_names_bounds() {
        let text = EnglishCatalog.render(&Message::WordCountInvalid { min: 3, max: 50 });
        assert!(text.contains("between 3 and 50 words"));
    }

    #[test]
    fn russian_plural_rules() {
        assert_eq!(russian_plural(1, "a", "b", "c"), "a");
        assert_eq!(russian_plural(21, "a", "b", "c"), "a");
        assert_eq!(russian_plural(11, "a", "b", "c"), "c");
        assert_eq!(russian_plural(3, "a", "b", "c"), "b");
        assert_eq!(russian_plural(13, "a", "b", "c"), "c");
        assert_eq!(russian_plural(5, "a", "b", "c"), "c");
    }

    #[test]
    fn russian_catalog_renders() {
        let c = Locale::Ru.catalog();
        assert_eq!(c.locale(), Locale::Ru);
        assert_eq!(
            c.render(&Message::PointsPossible { weight: 2 }),
            "Максимум 2 балла"
        );
        assert_eq!(
            c.render(&Message::AttemptsUsed { used: 1, max: 3 }),
            "Вы использовали 1 из 3 попыток"
        );
    }
}
