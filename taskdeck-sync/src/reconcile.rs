//! Reconciliation engine
//!
//! Pure decision logic over one board snapshot and one candidate list:
//! which completed cards flow back to the task manager, and which
//! candidate tasks become new cards. External-id equality is the sole
//! matching key; titles are ambiguous and never consulted.
//!
//! Each candidate lands in exactly one of three dispositions:
//! already on the board, deferred by a future start date, or eligible.
//! Eligibility is re-derived from a fresh snapshot every pass, which is
//! what makes re-running a failed pass safe.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use taskdeck_common::config::BoardConfig;
use taskdeck_common::types::{Card, CardDraft, Task, DEFAULT_PRIORITY};
use taskdeck_common::{Error, Result};
use tracing::{debug, info};

/// Immutable board layout the reconciler decides against
#[derive(Debug, Clone)]
pub struct BoardRules {
    /// Lane new cards are created in
    pub backlog_lane_id: String,
    /// Context label → board card-type id
    pub card_types: HashMap<String, i64>,
}

impl BoardRules {
    /// Extract the rules from the `[board]` config section
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            backlog_lane_id: config.backlog_lane_id.clone(),
            card_types: config.card_types.clone(),
        }
    }
}

/// Outcome of one dedup/deferral run
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Drafts for tasks not yet on the board and not deferred
    pub drafts: Vec<CardDraft>,
    /// Candidates skipped because their card already exists
    pub synced: usize,
    /// Candidates skipped because their start date is in the future
    pub deferred: usize,
}

/// The reconciliation engine
pub struct Reconciler {
    rules: BoardRules,
}

impl Reconciler {
    /// Create a reconciler for one board layout
    pub fn new(rules: BoardRules) -> Self {
        Self { rules }
    }

    /// External ids of completed cards, in snapshot order
    ///
    /// Cards without an external id are not linked to a task and are
    /// never reported. An empty result is a valid outcome.
    pub fn completed_ids(snapshot: &[Card]) -> Vec<String> {
        snapshot
            .iter()
            .filter(|c| c.completed && !c.external_id.is_empty())
            .map(|c| c.external_id.clone())
            .collect()
    }

    /// Decide each candidate's disposition and build drafts for the
    /// eligible ones
    ///
    /// Rules, in precedence order:
    /// 1. a snapshot card with the same external id exists → skip
    ///    (already synced);
    /// 2. start date strictly after `today` → skip (deferred);
    /// 3. otherwise build a draft targeting the backlog lane.
    ///
    /// A candidate whose context has no card-type mapping aborts with
    /// [`Error::UnmappedContext`]; silently dropping it or defaulting
    /// the type would hide a configuration mistake.
    pub fn new_cards(
        &self,
        snapshot: &[Card],
        candidates: &[Task],
        today: NaiveDate,
    ) -> Result<Reconciliation> {
        let on_board: HashSet<&str> = snapshot
            .iter()
            .filter(|c| !c.external_id.is_empty())
            .map(|c| c.external_id.as_str())
            .collect();

        let mut drafts = Vec::new();
        let mut synced = 0;
        let mut deferred = 0;

        for task in candidates {
            if on_board.contains(task.external_id.as_str()) {
                debug!(task = %task.name, "Ignoring pre-existing card");
                synced += 1;
                continue;
            }

            if let Some(start) = task.start_date {
                if start > today {
                    info!("Ignoring card {}. Deferred until {}", task.name, start);
                    deferred += 1;
                    continue;
                }
            }

            drafts.push(self.draft_for(task)?);
        }

        Ok(Reconciliation {
            drafts,
            synced,
            deferred,
        })
    }

    fn draft_for(&self, task: &Task) -> Result<CardDraft> {
        let type_id = self
            .rules
            .card_types
            .get(&task.context)
            .copied()
            .ok_or_else(|| Error::UnmappedContext(task.context.clone()))?;

        Ok(CardDraft {
            lane_id: self.rules.backlog_lane_id.clone(),
            title: task.name.clone(),
            type_id,
            external_id: task.external_id.clone(),
            priority: DEFAULT_PRIORITY,
            due_date: task.due_date,
            start_date: task.start_date,
            description: task.note.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn card(external_id: &str, title: &str, lane_id: &str, completed: bool) -> Card {
        Card {
            external_id: external_id.to_string(),
            title: title.to_string(),
            lane_id: lane_id.to_string(),
            completed,
        }
    }

    fn task(external_id: &str, name: &str, context: &str) -> Task {
        Task {
            external_id: external_id.to_string(),
            name: name.to_string(),
            note: String::new(),
            context: context.to_string(),
            due_date: None,
            start_date: None,
        }
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(BoardRules {
            backlog_lane_id: "backlog".to_string(),
            card_types: [("home".to_string(), 5), ("work".to_string(), 7)]
                .into_iter()
                .collect(),
        })
    }

    #[test]
    fn completed_card_in_done_lane_is_reported() {
        let snapshot = vec![card("T1", "one", "done-lane", true)];
        assert_eq!(Reconciler::completed_ids(&snapshot), vec!["T1".to_string()]);
    }

    #[test]
    fn completed_extraction_excludes_unlinked_cards() {
        let snapshot = vec![
            card("", "board-only card", "done-lane", true),
            card("T2", "two", "done-lane", true),
            card("T3", "three", "doing", false),
        ];
        assert_eq!(Reconciler::completed_ids(&snapshot), vec!["T2".to_string()]);
    }

    #[test]
    fn eligible_task_becomes_backlog_draft() {
        let candidates = vec![task("T3", "tidy garage", "home")];
        let result = reconciler().new_cards(&[], &candidates, today()).unwrap();

        assert_eq!(result.synced, 0);
        assert_eq!(result.deferred, 0);
        assert_eq!(result.drafts.len(), 1);
        let draft = &result.drafts[0];
        assert_eq!(draft.lane_id, "backlog");
        assert_eq!(draft.type_id, 5);
        assert_eq!(draft.external_id, "T3");
        assert_eq!(draft.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn matching_is_by_external_id_never_title() {
        // Same title, different id: must not match.
        let snapshot = vec![card("T9", "write report", "doing", false)];
        let candidates = vec![task("T10", "write report", "work")];
        let result = reconciler().new_cards(&snapshot, &candidates, today()).unwrap();
        assert_eq!(result.synced, 0);
        assert_eq!(result.drafts.len(), 1);

        // Different title, same id: must match.
        let snapshot = vec![card("T10", "completely different title", "doing", false)];
        let result = reconciler().new_cards(&snapshot, &candidates, today()).unwrap();
        assert_eq!(result.synced, 1);
        assert!(result.drafts.is_empty());
    }

    #[test]
    fn future_start_date_defers() {
        let mut candidate = task("T2", "later", "work");
        candidate.start_date = NaiveDate::from_ymd_opt(2999, 1, 1);
        let result = reconciler().new_cards(&[], &[candidate], today()).unwrap();

        assert!(result.drafts.is_empty());
        assert_eq!(result.deferred, 1);
    }

    #[test]
    fn deferral_boundary_is_strictly_future() {
        let mut starts_today = task("T4", "now", "work");
        starts_today.start_date = Some(today());
        let mut started_yesterday = task("T5", "yesterday", "work");
        started_yesterday.start_date = today().pred_opt();

        let result = reconciler()
            .new_cards(&[], &[starts_today, started_yesterday], today())
            .unwrap();
        assert_eq!(result.deferred, 0);
        assert_eq!(result.drafts.len(), 2);
    }

    #[test]
    fn dedup_wins_over_deferral() {
        let snapshot = vec![card("T6", "already there", "doing", false)];
        let mut candidate = task("T6", "already there", "work");
        candidate.start_date = NaiveDate::from_ymd_opt(2999, 1, 1);

        let result = reconciler().new_cards(&snapshot, &[candidate], today()).unwrap();
        assert_eq!(result.synced, 1);
        assert_eq!(result.deferred, 0);
    }

    #[test]
    fn unmapped_context_is_fatal() {
        let candidates = vec![task("T7", "mystery", "errands")];
        let err = reconciler().new_cards(&[], &candidates, today()).unwrap_err();
        assert!(matches!(err, Error::UnmappedContext(ref c) if c == "errands"));
    }

    #[test]
    fn second_pass_after_creates_is_empty() {
        let candidates = vec![task("T8", "one", "home"), task("T9", "two", "work")];
        let rec = reconciler();

        let first = rec.new_cards(&[], &candidates, today()).unwrap();
        assert_eq!(first.drafts.len(), 2);

        // Simulate the creates landing on the board before the next pass.
        let snapshot: Vec<Card> = first
            .drafts
            .iter()
            .map(|d| card(&d.external_id, &d.title, &d.lane_id, false))
            .collect();

        let second = rec.new_cards(&snapshot, &candidates, today()).unwrap();
        assert!(second.drafts.is_empty());
        assert_eq!(second.synced, 2);
    }

    #[test]
    fn unlinked_board_cards_never_match_candidates() {
        // An unlinked card has external_id "", which must not collide
        // with anything.
        let snapshot = vec![card("", "hand-made card", "doing", false)];
        let candidates = vec![task("T11", "hand-made card", "home")];
        let result = reconciler().new_cards(&snapshot, &candidates, today()).unwrap();
        assert_eq!(result.synced, 0);
        assert_eq!(result.drafts.len(), 1);
    }
}
