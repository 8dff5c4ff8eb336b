//! TOML block definition parser.
//!
//! A block definition names the block it configures and carries its
//! settings:
//!
//! ```toml
//! [block]
//! course_id = "bio101"
//! block_id = "photosynthesis-q1"
//!
//! [settings]
//! prompt = "Explain photosynthesis."
//! weight = 10
//! fullcredit_keyphrases = ["chlorophyll"]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{BlockContext, Settings};

#[derive(Debug, Deserialize)]
struct TomlBlockFile {
    block: TomlBlockHeader,
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Deserialize)]
struct TomlBlockHeader {
    course_id: String,
    block_id: String,
}

/// Settings for a specific block, as authored in a definition file.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    pub context: BlockContext,
    pub settings: Settings,
}

/// Parse a single TOML file into a `BlockDefinition`.
pub fn parse_block_file(path: &Path) -> Result<BlockDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read block file: {}", path.display()))?;

    parse_block_str(&content, path)
}

/// Parse a TOML string into a `BlockDefinition`.
pub fn parse_block_str(content: &str, source_path: &Path) -> Result<BlockDefinition> {
    let parsed: TomlBlockFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    anyhow::ensure!(
        !parsed.block.course_id.trim().is_empty() && !parsed.block.block_id.trim().is_empty(),
        "course_id and block_id must not be empty: {}",
        source_path.display()
    );

    Ok(BlockDefinition {
        context: BlockContext::block(parsed.block.course_id, parsed.block.block_id),
        settings: parsed.settings,
    })
}

/// Recursively load all `.toml` block definitions from a directory.
pub fn load_block_directory(dir: &Path) -> Result<Vec<BlockDefinition>> {
    let mut blocks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            blocks.extend(load_block_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_block_file(&path) {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    blocks.sort_by(|a, b| a.context.to_string().cmp(&b.context.to_string()));
    Ok(blocks)
}

/// Load one file, or every definition under a directory.
pub fn load_blocks(path: &Path) -> Result<Vec<BlockDefinition>> {
    if path.is_dir() {
        load_block_directory(path)
    } else {
        Ok(vec![parse_block_file(path)?])
    }
}
