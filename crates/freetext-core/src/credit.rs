//! Credit evaluation for free-text answers.

use crate::model::{Credit, Settings};

/// Number of whitespace-separated tokens in `answer`.
pub fn word_count(answer: &str) -> usize {
    answer.split_whitespace().count()
}

/// Whether the answer's word count lies within the configured bounds (inclusive).
pub fn word_count_valid(answer: &str, settings: &Settings) -> bool {
    let count = word_count(answer) as i64;
    count >= settings.min_word_count && count <= settings.max_word_count
}

/// Case-insensitive check for any of `phrases` inside `answer`.
pub fn contains_any_phrase(phrases: &[String], answer: &str) -> bool {
    let answer = answer.to_lowercase();
    phrases
        .iter()
        .any(|phrase| answer.contains(&phrase.to_lowercase()))
}

/// Determine the credit tier an answer earns under `settings`.
///
/// Rules, first match wins:
/// 1. empty answer or word count out of bounds: zero
/// 2. no keyphrases configured: full
/// 3. any full-credit phrase present: full
/// 4. any half-credit phrase present: half
/// 5. otherwise zero
pub fn determine_credit(answer: &str, settings: &Settings) -> Credit {
    if answer.is_empty() || !word_count_valid(answer, settings) {
        Credit::Zero
    } else if !settings.has_keyphrases() {
        Credit::Full
    } else if contains_any_phrase(&settings.fullcredit_keyphrases, answer) {
        Credit::Full
    } else if contains_any_phrase(&settings.halfcredit_keyphrases, answer) {
        Credit::Half
    } else {
        Credit::Zero
    }
}
