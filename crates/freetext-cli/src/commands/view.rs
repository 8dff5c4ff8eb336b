//! The `freetext view` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::engine_from;
use crate::LearnerArgs;

pub async fn execute(learner: LearnerArgs, output: Option<PathBuf>, fragment: bool) -> Result<()> {
    let engine = engine_from(learner.config.as_deref())?;
    let context = learner.context();

    let rendered = engine.student_view(&context).await?;
    let text = if fragment {
        serde_json::to_string_pretty(&rendered)?
    } else {
        let settings = engine.load_settings(&context).await?;
        rendered.to_page(&settings.display_name)
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("View written to: {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}
