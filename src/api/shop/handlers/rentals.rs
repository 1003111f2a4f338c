/*
 * Responsibility
 * - /api/admin/rentals/... (管理者のみ)
 * - リマインダーは記録するだけで、実際の送信は行わない
 */
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::api::response;
use crate::api::shop::dto::AdminRentalView;
use crate::api::shop::{admin_rental_view, require_admin};
use crate::error::AppResult;
use crate::repos::rental_repo::{self, RentalRow};
use crate::repos::Db;
use crate::routing::{PathParams, Request};
use crate::state::AppState;

fn views(db: &Db, rentals: Vec<RentalRow>) -> Vec<AdminRentalView> {
    rentals.into_iter().map(|r| admin_rental_view(db, r)).collect()
}

pub async fn overdue(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    let rentals = rental_repo::overdue(&state.db, Utc::now());
    Ok(response::ok(&json!({
        "overdue_rentals": views(&state.db, rentals),
    })))
}

pub async fn expiring(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    let rentals = rental_repo::expiring(&state.db, Utc::now());
    Ok(response::ok(&json!({
        "expiring_rentals": views(&state.db, rentals),
    })))
}

pub async fn send_reminders(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    let reminded = rental_repo::record_reminders(&state.db, Utc::now());
    let sent = reminded.len();
    tracing::info!(sent, by = claims.user_id(), "rental reminders recorded");

    Ok(response::ok(&json!({
        "message": format!("Отправлено {sent} напоминаний"),
        "notifications_sent": sent,
        "rentals": views(&state.db, reminded),
    })))
}
