//! Board snapshot builder
//!
//! Flattens the board's three zones into one ordered card sequence:
//! backlog first, then the in-progress lanes in board order, then the
//! archive. Per-zone input order is preserved. Completion is derived
//! here, by lane membership in the completed-lane set; nothing later in
//! the pass looks at lane ids again.

use crate::board::{RawBoard, RawLane};
use std::collections::HashSet;
use taskdeck_common::types::Card;
use tracing::debug;

/// Flatten `raw` into one immutable card sequence
pub fn build_snapshot(raw: &RawBoard, completed_lanes: &HashSet<String>) -> Vec<Card> {
    let mut cards = Vec::new();
    for lane in raw
        .backlog
        .iter()
        .chain(raw.lanes.iter())
        .chain(raw.archive.iter())
    {
        read_lane(lane, completed_lanes, &mut cards);
    }
    cards
}

fn read_lane(lane: &RawLane, completed_lanes: &HashSet<String>, out: &mut Vec<Card>) {
    for card in &lane.cards {
        let completed = completed_lanes.contains(&card.lane_id);
        debug!(
            lane = %lane.title,
            external_id = %card.external_id,
            title = %card.title,
            completed,
            "Found card"
        );
        out.push(Card {
            external_id: card.external_id.clone(),
            title: card.title.clone(),
            lane_id: card.lane_id.clone(),
            completed,
        });
    }
}
