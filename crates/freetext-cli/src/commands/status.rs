//! The `freetext status` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use freetext_core::credit::word_count;
use freetext_core::messages::format_score;

use super::engine_from;
use crate::LearnerArgs;

pub async fn execute(learner: LearnerArgs) -> Result<()> {
    let engine = engine_from(learner.config.as_deref())?;
    let context = learner.context();
    let block = engine.load_block(&context).await?;

    let attempts = if block.settings.max_attempts > 0 {
        format!(
            "{}/{}",
            block.state.count_attempts, block.settings.max_attempts
        )
    } else {
        format!("{} (unlimited)", block.state.count_attempts)
    };

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("Block"), Cell::new(context.to_string())]);
    table.add_row(vec![
        Cell::new("Question"),
        Cell::new(&block.settings.display_name),
    ]);
    table.add_row(vec![Cell::new("Attempts"), Cell::new(attempts)]);
    table.add_row(vec![
        Cell::new("Score"),
        Cell::new(format!(
            "{}/{}",
            format_score(block.state.score),
            block.settings.weight
        )),
    ]);
    table.add_row(vec![Cell::new("Credit"), Cell::new(block.credit())]);
    table.add_row(vec![
        Cell::new("Indicator"),
        Cell::new(block.indicator().css_class()),
    ]);
    table.add_row(vec![
        Cell::new("Words"),
        Cell::new(format!(
            "{} (allowed {}-{})",
            word_count(&block.state.student_answer),
            block.settings.min_word_count,
            block.settings.max_word_count
        )),
    ]);
    table.add_row(vec![
        Cell::new("Locked"),
        Cell::new(if block.attempts_exhausted() { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        Cell::new("Answer"),
        Cell::new(&block.state.student_answer),
    ]);

    println!("{table}");
    Ok(())
}
