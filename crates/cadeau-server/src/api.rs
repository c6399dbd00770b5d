//! HTTP API: health, the replication hub routes, and the disabled
//! payment-gateway stubs.
//!
//! The payment endpoints never talk to a gateway; they return mock data in
//! the gateway's response shape so checkout flows can be exercised end to
//! end.  Wire a real provider here before any non-demo deployment.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use cadeau_sync::{sync_router, SyncHub};

use crate::error::ServerError;

pub fn build_router(hub: SyncHub) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/payment/create", post(payment_create))
        .route("/api/payment/verify", post(payment_verify))
        .merge(sync_router(hub))
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ---------------------------------------------------------------------------
// Payment stubs (gateway integration disabled)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreateRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub total_price: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreateResponse {
    pub success: bool,
    pub payment_url: String,
    pub order_id: String,
    pub message: &'static str,
}

async fn payment_create(Json(req): Json<PaymentCreateRequest>) -> Json<PaymentCreateResponse> {
    let order_id = format!("ORDER_{}", chrono::Utc::now().timestamp_millis());
    tracing::info!(
        order_id,
        brand = %req.brand,
        quantity = req.quantity,
        "mock payment created"
    );

    Json(PaymentCreateResponse {
        success: true,
        payment_url: format!(
            "/payment/mock?orderId={}&amount={}",
            order_id, req.total_price
        ),
        order_id,
        message: "Payment gateway is disabled; replace this stub with your provider",
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerifyRequest {
    #[serde(default)]
    pub authority: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerifyResponse {
    pub success: bool,
    pub order: MockOrder,
    pub gift_codes: Vec<&'static str>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockOrder {
    pub order_id: String,
    pub brand: &'static str,
    pub total_price: &'static str,
}

async fn payment_verify(
    Json(req): Json<PaymentVerifyRequest>,
) -> Result<Json<PaymentVerifyResponse>, ServerError> {
    if !req.status.eq_ignore_ascii_case("ok") {
        return Err(ServerError::PaymentNotVerified);
    }

    tracing::info!(order_id = %req.order_id, "mock payment verified");

    Ok(Json(PaymentVerifyResponse {
        success: true,
        order: MockOrder {
            order_id: req.order_id,
            brand: "PlayStation",
            total_price: "5,200,000",
        },
        gift_codes: vec!["PSN-XXXX-XXXX-XXXX-XXXX", "PSN-YYYY-YYYY-YYYY-YYYY"],
        message: "Payment gateway is disabled; these codes are placeholders",
    }))
}
