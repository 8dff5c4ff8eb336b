pub mod configure;
pub mod init;
pub mod status;
pub mod submit;
pub mod validate;
pub mod view;

use anyhow::Result;

use freetext_core::{BlockContext, GradingEngine};
use freetext_runtime::config::load_config_from;
use freetext_runtime::build_engine;

use crate::LearnerArgs;

impl LearnerArgs {
    pub fn context(&self) -> BlockContext {
        BlockContext::learner(&self.course, &self.block, &self.student)
    }
}

/// Load config from `path` (or the default locations) and wire an engine.
pub fn engine_from(path: Option<&std::path::Path>) -> Result<GradingEngine> {
    let config = load_config_from(path)?;
    Ok(build_engine(&config))
}
