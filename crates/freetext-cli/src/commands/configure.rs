//! The `freetext configure` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use freetext_core::parser::load_blocks;

use super::engine_from;

pub async fn execute(settings_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let engine = engine_from(config_path.as_deref())?;
    let blocks = load_blocks(&settings_path)?;

    for block in &blocks {
        engine
            .save_settings(&block.context, &block.settings)
            .await
            .with_context(|| format!("failed to configure {}", block.context))?;
        println!("Configured {}", block.context);
    }

    Ok(())
}
