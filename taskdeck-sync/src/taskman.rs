//! Task-manager client
//!
//! The reconciliation pass only depends on the [`TaskSource`] contract:
//! read tasks due by a date, read flagged tasks, close a batch of tasks.
//! [`TaskManagerClient`] implements it against the task manager's JSON
//! HTTP API. Any transport failure is fatal for the pass.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use taskdeck_common::config::TaskmanConfig;
use taskdeck_common::types::Task;
use taskdeck_common::{Error, Result};
use tracing::debug;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("taskdeck/", env!("CARGO_PKG_VERSION"));

/// Read/write contract the pass needs from the task manager
#[async_trait]
pub trait TaskSource {
    /// Available tasks due on or before `date`
    async fn tasks_due_by(&self, date: NaiveDate) -> Result<Vec<Task>>;

    /// Flagged and available tasks
    async fn flagged_tasks(&self) -> Result<Vec<Task>>;

    /// Mark the given tasks complete, by external id, in one batch
    async fn close_tasks(&self, ids: &[String]) -> Result<()>;
}

/// HTTP client for the task manager's JSON API
pub struct TaskManagerClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TaskManagerClient {
    /// Build a client from the `[taskman]` config section
    pub fn new(config: &TaskmanConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| unavailable(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    async fn fetch_tasks(&self, query: &[(&str, String)]) -> Result<Vec<Task>> {
        let url = format!("{}/tasks/available", self.base_url);
        debug!(url = %url, "Fetching tasks");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        response
            .json::<Vec<Task>>()
            .await
            .map_err(|e| unavailable(format!("malformed task list: {}", e)))
    }
}

#[async_trait]
impl TaskSource for TaskManagerClient {
    async fn tasks_due_by(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.fetch_tasks(&[("due_by", date.to_string())]).await
    }

    async fn flagged_tasks(&self) -> Result<Vec<Task>> {
        self.fetch_tasks(&[("flagged", "true".to_string())]).await
    }

    async fn close_tasks(&self, ids: &[String]) -> Result<()> {
        let url = format!("{}/tasks/close", self.base_url);
        debug!(url = %url, count = ids.len(), "Closing tasks");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }
        Ok(())
    }
}

fn unavailable(reason: String) -> Error {
    Error::SourceUnavailable {
        system: "task manager",
        reason,
    }
}
