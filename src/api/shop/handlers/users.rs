/*
 * Responsibility
 * - shop の /api/users/... handler
 * - 本人 or 管理者のみ閲覧・編集可 (role の変更は管理者のみ)
 */
use axum::response::Response;
use serde_json::json;

use crate::api::common::dto::{UpdateUserRequest, UserEnvelope, UsersEnvelope};
use crate::api::common::{MSG_ACCESS_DENIED, MSG_USER_NOT_FOUND, apply_user_update, caller_role};
use crate::api::response;
use crate::api::shop::dto::{PurchaseView, RentalView};
use crate::api::shop::{purchase_view, rental_view, require_admin};
use crate::error::{AppError, AppResult};
use crate::policy::{self, Role};
use crate::repos::user_repo::{self, UserRow};
use crate::repos::{Db, rental_repo};
use crate::routing::{PathParams, Request};
use crate::state::AppState;

fn purchases_of(db: &Db, user_id: i64) -> Vec<PurchaseView> {
    rental_repo::purchases_of(db, user_id)
        .into_iter()
        .map(|p| purchase_view(db, p))
        .collect()
}

fn rentals_of(db: &Db, user_id: i64) -> Vec<RentalView> {
    rental_repo::rentals_of(db, user_id)
        .into_iter()
        .map(|r| rental_view(db, r))
        .collect()
}

fn target_user(state: &AppState, id: Option<i64>) -> AppResult<UserRow> {
    id.and_then(|id| user_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_USER_NOT_FOUND))
}

pub async fn list_users(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    Ok(response::ok(&UsersEnvelope {
        users: user_repo::list(&state.db),
    }))
}

pub async fn list_admins(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    Ok(response::ok(&json!({
        "admins": user_repo::list_by_role(&state.db, Role::Admin),
    })))
}

pub async fn list_regular(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    Ok(response::ok(&UsersEnvelope {
        users: user_repo::list_by_role(&state.db, Role::User),
    }))
}

pub async fn get_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, params.int(0))?;
    policy::ensure_self_or_admin(&claims, user.id, caller_role(state, &claims), MSG_ACCESS_DENIED)?;

    Ok(response::ok(&json!({
        "purchases": purchases_of(&state.db, user.id),
        "rentals": rentals_of(&state.db, user.id),
        "user": user,
    })))
}

pub async fn update_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, params.int(0))?;
    let role = caller_role(state, &claims);
    policy::ensure_self_or_admin(&claims, user.id, role, MSG_ACCESS_DENIED)?;

    let body: UpdateUserRequest = req.json_or_default()?;

    // Role changes from non-admins are dropped without complaint.
    let new_role = match body.role.as_deref() {
        Some(value) if role.is_admin() => Some(Role::parse(value).ok_or_else(|| {
            AppError::bad_request("Неверная роль. Допустимые значения: user, admin")
        })?),
        _ => None,
    };

    let updated = apply_user_update(state, user.id, &body, new_role)?;
    if new_role.is_some() {
        tracing::info!(user_id = updated.id, role = %updated.role(), by = claims.user_id(), "role changed");
    }

    Ok(response::ok(&UserEnvelope { user: updated }))
}

pub async fn delete_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, params.int(0))?;
    policy::ensure_self_or_admin(&claims, user.id, caller_role(state, &claims), MSG_ACCESS_DENIED)?;

    user_repo::delete(&state.db, user.id);
    tracing::info!(user_id = user.id, by = claims.user_id(), "user deleted");

    Ok(response::message("Пользователь успешно удален"))
}

pub async fn my_rentals(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    Ok(response::ok(&json!({
        "rentals": rentals_of(&state.db, claims.user_id()),
    })))
}

pub async fn my_purchases(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    Ok(response::ok(&json!({
        "purchases": purchases_of(&state.db, claims.user_id()),
    })))
}

/// Access is decided before existence here: strangers get 403 for any id.
pub async fn user_purchases(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let id = params.int(0).unwrap_or_default();
    policy::ensure_self_or_admin(&claims, id, caller_role(state, &claims), MSG_ACCESS_DENIED)?;
    let user = target_user(state, Some(id))?;

    Ok(response::ok(&json!({
        "purchases": purchases_of(&state.db, user.id),
        "user": user,
    })))
}

pub async fn user_rentals(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let id = params.int(0).unwrap_or_default();
    policy::ensure_self_or_admin(&claims, id, caller_role(state, &claims), MSG_ACCESS_DENIED)?;
    let user = target_user(state, Some(id))?;

    Ok(response::ok(&json!({
        "rentals": rentals_of(&state.db, user.id),
        "user": user,
    })))
}
