//! One end-to-end sync pass
//!
//! Sequential phases over the two sources: read the board snapshot
//! once, close tasks for completed cards, gather candidates, reconcile,
//! create the eligible cards. Each phase is optional per the pass
//! options; the first failing phase aborts the pass and nothing further
//! is attempted. The runner performs no retries — dedup against a fresh
//! snapshot makes re-running a whole pass safe.

use crate::board::BoardSource;
use crate::reconcile::{BoardRules, Reconciler};
use crate::snapshot::build_snapshot;
use crate::taskman::TaskSource;
use chrono::NaiveDate;
use std::collections::HashSet;
use taskdeck_common::types::Task;
use taskdeck_common::Result;
use tracing::info;

/// Which phases one pass runs
#[derive(Debug, Clone, Default)]
pub struct PassOptions {
    /// Sync available tasks due on or before this date
    pub due_by: Option<NaiveDate>,
    /// Sync flagged and available tasks
    pub flagged: bool,
    /// Close tasks whose cards reached a completed lane
    pub pull_completed: bool,
}

impl PassOptions {
    /// True if the pass has any work to do
    pub fn any(&self) -> bool {
        self.due_by.is_some() || self.flagged || self.pull_completed
    }
}

/// Counts from one completed pass, for reporting
#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    /// Cards found on the board
    pub cards_on_board: usize,
    /// Tasks closed from completed cards
    pub tasks_closed: usize,
    /// Candidate tasks gathered
    pub candidates: usize,
    /// Candidates already on the board
    pub synced: usize,
    /// Candidates deferred by start date
    pub deferred: usize,
    /// Cards created
    pub created: usize,
}

/// Orchestrates one pass over a task source and a board source
pub struct SyncRunner<T, B> {
    tasks: T,
    board: B,
    reconciler: Reconciler,
    completed_lanes: HashSet<String>,
}

impl<T: TaskSource, B: BoardSource> SyncRunner<T, B> {
    /// Wire a runner to its sources and board layout
    pub fn new(tasks: T, board: B, rules: BoardRules, completed_lanes: HashSet<String>) -> Self {
        Self {
            tasks,
            board,
            reconciler: Reconciler::new(rules),
            completed_lanes,
        }
    }

    /// Run one pass
    pub async fn run(&self, opts: &PassOptions, today: NaiveDate) -> Result<PassSummary> {
        let mut summary = PassSummary::default();
        if !opts.any() {
            return Ok(summary);
        }

        // One snapshot per pass; both the close-back and the dedup
        // check work against the same read.
        let raw = self.board.current_board().await?;
        let snapshot = build_snapshot(&raw, &self.completed_lanes);
        summary.cards_on_board = snapshot.len();
        info!("Found {} cards on board", snapshot.len());

        if opts.pull_completed {
            let completed = Reconciler::completed_ids(&snapshot);
            info!(
                "Found {} completed cards out of {} on board",
                completed.len(),
                snapshot.len()
            );
            if !completed.is_empty() {
                self.tasks.close_tasks(&completed).await?;
                summary.tasks_closed = completed.len();
            }
        }

        let candidates = self.gather_candidates(opts).await?;
        summary.candidates = candidates.len();
        if candidates.is_empty() {
            return Ok(summary);
        }
        info!(
            "Found {} tasks eligible for syncing with the board",
            candidates.len()
        );

        let outcome = self.reconciler.new_cards(&snapshot, &candidates, today)?;
        summary.synced = outcome.synced;
        summary.deferred = outcome.deferred;
        info!(
            "Found {} cards to sync (ignoring {} already on board and {} deferred)",
            outcome.drafts.len(),
            outcome.synced,
            outcome.deferred
        );

        if !outcome.drafts.is_empty() {
            self.board.add_cards(&outcome.drafts).await?;
            summary.created = outcome.drafts.len();
        }

        Ok(summary)
    }

    /// Concatenate due-by and flagged tasks, in that order
    ///
    /// No dedup here: candidates are deduplicated against the board,
    /// not against each other.
    async fn gather_candidates(&self, opts: &PassOptions) -> Result<Vec<Task>> {
        let mut candidates = Vec::new();
        if let Some(due) = opts.due_by {
            candidates.extend(self.tasks.tasks_due_by(due).await?);
        }
        if opts.flagged {
            candidates.extend(self.tasks.flagged_tasks().await?);
        }
        Ok(candidates)
    }
}
