//! # Taskdeck Common Library
//!
//! Shared code for the taskdeck workspace:
//! - Error types
//! - Configuration loading and first-run bootstrap
//! - Core data model (Task, Card, CardDraft)
//! - Due-date expression parsing for the CLI

pub mod config;
pub mod datex;
pub mod error;
pub mod types;

pub use error::{Error, Result};
