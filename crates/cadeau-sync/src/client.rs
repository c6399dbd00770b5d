//! Best-effort HTTP client for the replication hub.
//!
//! Every call swallows its errors: the hub may simply not be running, and
//! replication failing must never disturb the local store.

use cadeau_store::UserRecord;

use crate::hub::SyncListResponse;

#[derive(Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SyncClient {
    /// `hub_url` is the hub's base URL, e.g. `http://localhost:8080`.
    pub fn new(hub_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/users/sync", hub_url.trim_end_matches('/')),
        }
    }

    /// Push the local list to the hub, fire-and-forget.
    pub async fn push(&self, users: &[UserRecord]) {
        let body = serde_json::json!({ "users": users });
        match self.http.post(&self.endpoint).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(count = users.len(), "pushed user list to hub");
            }
            Ok(resp) => {
                tracing::debug!(status = %resp.status(), "hub rejected user list push");
            }
            Err(e) => {
                tracing::debug!(error = %e, "hub push failed");
            }
        }
    }

    /// Fetch the hub's copy of the list; `None` on any failure.
    pub async fn pull(&self) -> Option<Vec<UserRecord>> {
        let resp = match self.http.get(&self.endpoint).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(error = %e, "hub pull failed");
                return None;
            }
        };

        match resp.json::<SyncListResponse>().await {
            Ok(body) => Some(body.users),
            Err(e) => {
                tracing::debug!(error = %e, "hub pull returned an unexpected body");
                None
            }
        }
    }
}
