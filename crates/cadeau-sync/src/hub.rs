//! The replication hub: one in-memory copy of the user list behind two
//! HTTP routes.
//!
//! This is a development convenience, not a consistency protocol — no
//! authentication, no schema versioning, a POST replaces the list
//! wholesale.  The web storefront gossiped to a fixed set of localhost
//! ports; a single hub instance is the designated meeting point instead.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use cadeau_store::UserRecord;

/// Shared hub state.
#[derive(Clone, Default)]
pub struct SyncHub {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl SyncHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hub copy of the user list.
    pub async fn snapshot(&self) -> Vec<UserRecord> {
        self.users.read().await.clone()
    }

    /// Replace the hub copy wholesale; returns the new count.
    pub async fn replace(&self, users: Vec<UserRecord>) -> usize {
        let count = users.len();
        *self.users.write().await = users;
        count
    }
}

/// Wire shape of `GET /api/users/sync`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncListResponse {
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SyncPushRequest {
    #[serde(default)]
    pub users: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct SyncPushResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the sync routes with a permissive CORS layer, mirroring the
/// storefront's endpoint surface.
pub fn router(hub: SyncHub) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/users/sync", get(sync_list).post(sync_push))
        .layer(cors)
        .with_state(hub)
}

async fn sync_list(State(hub): State<SyncHub>) -> Json<SyncListResponse> {
    Json(SyncListResponse {
        users: hub.snapshot().await,
    })
}

async fn sync_push(
    State(hub): State<SyncHub>,
    Json(body): Json<SyncPushRequest>,
) -> (StatusCode, Json<SyncPushResponse>) {
    // Anything that is not a record array under `users` is a 400.
    match serde_json::from_value::<Vec<UserRecord>>(body.users) {
        Ok(users) => {
            let count = hub.replace(users).await;
            tracing::debug!(count, "hub received user list");
            (
                StatusCode::OK,
                Json(SyncPushResponse {
                    success: true,
                    count: Some(count),
                    error: None,
                }),
            )
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(SyncPushResponse {
                success: false,
                count: None,
                error: Some("Invalid data".to_string()),
            }),
        ),
    }
}
