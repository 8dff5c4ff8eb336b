//! freetext-runtime — Standalone host collaborators.
//!
//! Implements the `FieldStore`, `GradePublisher` and `AssetResolver` traits
//! so a `GradingEngine` can run outside a course platform, and loads the
//! configuration that selects between them.

pub mod assets;
pub mod config;
pub mod error;
pub mod json_store;
pub mod memory;
pub mod publisher;

pub use config::{build_engine, load_config, PublisherConfig, RuntimeConfig, StoreConfig};
pub use error::StoreError;
