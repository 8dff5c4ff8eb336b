//! Runtime configuration and collaborator factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use freetext_core::messages::Locale;
use freetext_core::traits::{FieldStore, GradePublisher};
use freetext_core::GradingEngine;

use crate::assets::StaticAssets;
use crate::json_store::JsonFileStore;
use crate::memory::{InMemoryStore, RecordingPublisher};
use crate::publisher::{JsonlPublisher, LogPublisher};

/// Where scoped fields are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Memory,
    Json {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            path: default_store_path(),
        }
    }
}

/// Where grade events go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PublisherConfig {
    #[default]
    Log,
    Jsonl {
        #[serde(default = "default_grades_path")]
        path: PathBuf,
    },
    Memory,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./freetext-data/store.json")
}

fn default_grades_path() -> PathBuf {
    PathBuf::from("./freetext-data/grades.jsonl")
}

fn default_asset_base_url() -> String {
    "public".to_string()
}

/// Top-level freetext configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    /// Base URL (or relative directory) for view.css / view.js.
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,
    #[serde(default)]
    pub locale: Locale,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            publisher: PublisherConfig::default(),
            asset_base_url: default_asset_base_url(),
            locale: Locale::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
        cursor = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `freetext.toml` in the current directory
/// 2. `~/.config/freetext/config.toml`
///
/// Environment overrides: `FREETEXT_STORE_PATH`, `FREETEXT_LOCALE`.
pub fn load_config() -> Result<RuntimeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RuntimeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("freetext.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => RuntimeConfig::default(),
    };

    if let Ok(store_path) = std::env::var("FREETEXT_STORE_PATH") {
        config.store = StoreConfig::Json {
            path: PathBuf::from(store_path),
        };
    }

    if let Ok(locale) = std::env::var("FREETEXT_LOCALE") {
        config.locale = locale
            .parse()
            .map_err(|e: String| anyhow::anyhow!("FREETEXT_LOCALE: {e}"))?;
    }

    Ok(resolve_config(config))
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<RuntimeConfig> {
    Ok(toml::from_str(content)?)
}

/// Expand `${VAR}` references in every path-like setting.
fn resolve_config(mut config: RuntimeConfig) -> RuntimeConfig {
    if let StoreConfig::Json { path } = &mut config.store {
        *path = resolve_path(path);
    }
    if let PublisherConfig::Jsonl { path } = &mut config.publisher {
        *path = resolve_path(path);
    }
    config.asset_base_url = resolve_env_vars(&config.asset_base_url);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("freetext"))
}

/// Create a field store from its configuration.
pub fn create_store(config: &StoreConfig) -> Arc<dyn FieldStore> {
    match config {
        StoreConfig::Memory => Arc::new(InMemoryStore::new()),
        StoreConfig::Json { path } => Arc::new(JsonFileStore::new(path)),
    }
}

/// Create a grade publisher from its configuration.
pub fn create_publisher(config: &PublisherConfig) -> Arc<dyn GradePublisher> {
    match config {
        PublisherConfig::Log => Arc::new(LogPublisher),
        PublisherConfig::Jsonl { path } => Arc::new(JsonlPublisher::new(path)),
        PublisherConfig::Memory => Arc::new(RecordingPublisher::new()),
    }
}

/// Wire a `GradingEngine` from configuration.
pub fn build_engine(config: &RuntimeConfig) -> GradingEngine {
    GradingEngine::new(
        create_store(&config.store),
        create_publisher(&config.publisher),
        Arc::new(StaticAssets::new(config.asset_base_url.clone())),
        config.locale.catalog(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_FREETEXT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_FREETEXT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_FREETEXT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_FREETEXT_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_reexpand_values() {
        std::env::set_var("_FREETEXT_SELF_REF", "${_FREETEXT_SELF_REF}");
        std::env::set_var("_FREETEXT_OTHER", "data");
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(resolve_env_vars(
                "${_FREETEXT_SELF_REF}/${_FREETEXT_OTHER}/store.json",
            ));
        });
        let resolved = rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .expect("expansion should terminate");
        assert_eq!(resolved, "${_FREETEXT_SELF_REF}/data/store.json");
        std::env::remove_var("_FREETEXT_SELF_REF");
        std::env::remove_var("_FREETEXT_OTHER");
    }

    #[test]
    fn default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.publisher, PublisherConfig::Log);
        assert_eq!(config.locale, Locale::En);
        assert!(matches!(config.store, StoreConfig::Json { .. }));
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
asset_base_url = "/static/freetext"
locale = "ru"

[store]
type = "json"
path = "/var/lib/freetext/store.json"

[publisher]
type = "jsonl"
path = "/var/lib/freetext/grades.jsonl"
"#,
        )
        .unwrap();
        assert_eq!(config.locale, Locale::Ru);
        assert_eq!(config.asset_base_url, "/static/freetext");
        assert_eq!(
            config.store,
            StoreConfig::Json {
                path: PathBuf::from("/var/lib/freetext/store.json")
            }
        );
        assert!(matches!(config.publisher, PublisherConfig::Jsonl { .. }));
    }

    #[test]
    fn parse_memory_store() {
        let config = parse_config("[store]\ntype = \"memory\"\n").unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.publisher, PublisherConfig::Log);
    }

    #[test]
    fn unknown_store_type_fails() {
        assert!(parse_config("[store]\ntype = \"redis\"\n").is_err());
    }

    #[test]
    fn missing_explicit_config_fails() {
        assert!(load_config_from(Some(Path::new("/nonexistent/freetext.toml"))).is_err());
    }

    #[test]
    fn store_path_expands_env_vars() {
        std::env::set_var("_FREETEXT_DATA_DIR", "/tmp/ft");
        let config = resolve_config(RuntimeConfig {
            store: StoreConfig::Json {
                path: PathBuf::from("${_FREETEXT_DATA_DIR}/store.json"),
            },
            ..RuntimeConfig::default()
        });
        assert_eq!(
            config.store,
            StoreConfig::Json {
                path: PathBuf::from("/tmp/ft/store.json")
            }
        );
        std::env::remove_var("_FREETEXT_DATA_DIR");
    }

    #[tokio::test]
    async fn built_engine_grades_with_memory_collaborators() {
        let engine = build_engine(&RuntimeConfig {
            store: StoreConfig::Memory,
            publisher: PublisherConfig::Memory,
            ..RuntimeConfig::default()
        });
        let ctx = freetext_core::BlockContext::learner("c", "b", "s");
        let feedback = engine.submit(&ctx, "an answer").await.unwrap();
        assert_eq!(feedback.problem_progress, "1/1 point");
    }
}
