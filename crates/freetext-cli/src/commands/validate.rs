//! The `freetext validate` command.

use std::path::PathBuf;

use anyhow::Result;

use freetext_core::parser::load_blocks;
use freetext_core::validation::validate_settings;
use freetext_runtime::config::load_config_from;

pub fn execute(settings_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = config.locale.catalog();

    let blocks = load_blocks(&settings_path)?;
    anyhow::ensure!(
        !blocks.is_empty(),
        "no block definitions found in {}",
        settings_path.display()
    );

    let mut total_errors = 0;

    for block in &blocks {
        println!(
            "Block: {} ({})",
            block.context, block.settings.display_name
        );

        let messages = validate_settings(&block.settings, catalog.as_ref());
        for m in &messages {
            println!("  [{}] ERROR: {}", m.field, m.text);
        }
        total_errors += messages.len();
    }

    if total_errors == 0 {
        println!("All block settings valid.");
        Ok(())
    } else {
        anyhow::bail!("{total_errors} settings error(s) found")
    }
}
