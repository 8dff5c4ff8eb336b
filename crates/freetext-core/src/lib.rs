//! freetext-core — Credit evaluation and attempt tracking for free-text responses.
//!
//! This crate defines the data model, the grading state machine, and the
//! collaborator traits a host runtime implements to embed the question.

pub mod block;
pub mod credit;
pub mod engine;
pub mod error;
pub mod messages;
pub mod model;
pub mod parser;
pub mod traits;
pub mod validation;
pub mod view;

pub use block::{Feedback, Grade, Indicator, ResponseBlock};
pub use engine::GradingEngine;
pub use error::GradingError;
pub use model::{AttemptState, BlockContext, Credit, Settings};
