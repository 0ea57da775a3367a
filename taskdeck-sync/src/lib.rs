//! # Taskdeck Sync
//!
//! Mirrors "available" tasks from a personal task manager onto a kanban
//! board, and closes tasks whose cards reached a completed lane.
//!
//! Modules:
//! - [`taskman`] — task-manager source (HTTP client + trait)
//! - [`board`] — board source (HTTP client + trait + wire types)
//! - [`snapshot`] — flattens the board's zones into one card sequence
//! - [`reconcile`] — the reconciliation engine (dedup, deferral,
//!   completed-card extraction)
//! - [`sync`] — one end-to-end pass over both sources

pub mod board;
pub mod reconcile;
pub mod snapshot;
pub mod sync;
pub mod taskman;

pub use reconcile::{BoardRules, Reconciler};
pub use sync::{PassOptions, PassSummary, SyncRunner};
