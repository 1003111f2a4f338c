/*
 * Responsibility
 * - GET /api/health (疎通用, 認証なし)
 */
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::api::response;
use crate::error::AppResult;
use crate::routing::{PathParams, Request};
use crate::state::AppState;

/// Version reported to clients; the API shape, not the crate version.
const API_VERSION: &str = "1.0.0";

pub async fn health(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    tracing::debug!(app = req.state().kind.as_str(), "health check");

    Ok(response::ok(&json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "version": API_VERSION,
        "database": "connected",
    })))
}
