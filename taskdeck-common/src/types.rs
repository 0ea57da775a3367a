//! Core data model shared by the sync pass
//!
//! Fixed-field records for the three shapes the reconciler works with:
//! tasks read from the task manager, cards read from the board, and card
//! drafts submitted to the board. Wire payloads are validated into these
//! types at the I/O boundary; the reconciliation logic never touches raw
//! key/value payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Priority assigned to every card mirrored from a task
pub const DEFAULT_PRIORITY: i64 = 1;

/// A unit of work read from the task manager
///
/// Immutable snapshot at read time; the reconciler only reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    /// Task-manager identifier, globally unique within that system
    pub external_id: String,
    /// Task name (becomes the card title)
    pub name: String,
    /// Free-form note (becomes the card description)
    #[serde(default)]
    pub note: String,
    /// Context/category label, keyed into the context → type-id map
    pub context: String,
    /// Optional due date
    pub due_date: Option<NaiveDate>,
    /// Optional start date; a strictly-future start defers the task
    pub start_date: Option<NaiveDate>,
}

/// A card as seen in one board snapshot
///
/// `external_id` is empty for cards that were created directly on the
/// board and are not linked to any task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Task-manager id this card mirrors, or "" if unlinked
    pub external_id: String,
    /// Card title
    pub title: String,
    /// Lane the card currently sits in
    pub lane_id: String,
    /// True iff `lane_id` is in the configured completed-lane set
    pub completed: bool,
}

/// A new card to be created on the board
///
/// Serializes with the board API's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    /// Target lane; always the configured backlog lane
    #[serde(rename = "LaneId")]
    pub lane_id: String,
    /// Card title, copied from the task name
    #[serde(rename = "Title")]
    pub title: String,
    /// Board card-type id, looked up from the task's context
    #[serde(rename = "TypeId")]
    pub type_id: i64,
    /// Task-manager id linking the card back to its task
    #[serde(rename = "ExternalCardID")]
    pub external_id: String,
    /// Card priority, always [`DEFAULT_PRIORITY`]
    #[serde(rename = "Priority")]
    pub priority: i64,
    /// Due date copied from the task
    #[serde(rename = "DueDate")]
    pub due_date: Option<NaiveDate>,
    /// Start date copied from the task
    #[serde(rename = "StartDate")]
    pub start_date: Option<NaiveDate>,
    /// Card description, copied from the task note
    #[serde(rename = "Description")]
    pub description: String,
}
