//! Kanban board client
//!
//! The pass depends on the [`BoardSource`] contract: read the whole
//! board once, create a batch of cards. [`BoardClient`] implements it
//! against the board's JSON API (basic auth, PascalCase field names).
//!
//! The raw board structure mirrors the board's three zones. Cards carry
//! more fields on the wire; only the ones the snapshot builder needs are
//! deserialized here.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use taskdeck_common::config::BoardConfig;
use taskdeck_common::types::CardDraft;
use taskdeck_common::{Error, Result};
use tracing::debug;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const IMPORT_COMMENT: &str = "Imported from task manager";

/// One board read, as returned by the board API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBoard {
    /// Backlog zone lanes
    #[serde(rename = "Backlog", default)]
    pub backlog: Vec<RawLane>,
    /// In-progress lanes, in board order
    #[serde(rename = "Lanes", default)]
    pub lanes: Vec<RawLane>,
    /// Archive zone lanes
    #[serde(rename = "Archive", default)]
    pub archive: Vec<RawLane>,
}

/// One lane and its cards, in board order
#[derive(Debug, Clone, Deserialize)]
pub struct RawLane {
    /// Lane title (logging only)
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Cards in the lane
    #[serde(rename = "Cards", default)]
    pub cards: Vec<RawCard>,
}

/// One card record as stored on the board
#[derive(Debug, Clone, Deserialize)]
pub struct RawCard {
    /// Task-manager id the card is linked to; "" for unlinked cards
    #[serde(rename = "ExternalCardID", default)]
    pub external_id: String,
    /// Card title
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Lane the card sits in
    #[serde(rename = "LaneId")]
    pub lane_id: String,
}

/// Read/write contract the pass needs from the board
#[async_trait]
pub trait BoardSource {
    /// Current state of all three zones
    async fn current_board(&self) -> Result<RawBoard>;

    /// Create all drafts on the board in one batch
    async fn add_cards(&self, drafts: &[CardDraft]) -> Result<()>;
}

/// HTTP client for the board's JSON API
pub struct BoardClient {
    http: reqwest::Client,
    api_url: String,
    board_id: String,
    email: String,
    password: String,
}

impl BoardClient {
    /// Build a client from the `[board]` config section
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| unavailable(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            board_id: config.id.clone(),
            email: config.email.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl BoardSource for BoardClient {
    async fn current_board(&self) -> Result<RawBoard> {
        let url = format!("{}/boards/{}", self.api_url, self.board_id);
        debug!(url = %url, "Reading board");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.email, Some(&self.password))
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        response
            .json::<RawBoard>()
            .await
            .map_err(|e| unavailable(format!("malformed board: {}", e)))
    }

    async fn add_cards(&self, drafts: &[CardDraft]) -> Result<()> {
        let url = format!("{}/boards/{}/cards", self.api_url, self.board_id);
        debug!(url = %url, count = drafts.len(), "Creating cards");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.email, Some(&self.password))
            .json(&serde_json::json!({
                "comment": IMPORT_COMMENT,
                "cards": drafts,
            }))
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::ValidationRejected {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {}", status)));
        }
        Ok(())
    }
}

fn unavailable(reason: String) -> Error {
    Error::SourceUnavailable {
        system: "board",
        reason,
    }
}
