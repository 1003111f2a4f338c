/*
 * Responsibility
 * - travel の /api/users/... handler
 * - 一覧は実在するユーザーのみ, 編集・削除は本人のみ
 */
use axum::response::Response;

use crate::api::common::dto::{UpdateUserRequest, UserEnvelope, UsersEnvelope};
use crate::api::common::{MSG_ACCESS_DENIED, MSG_USER_NOT_FOUND, apply_user_update};
use crate::api::response;
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::repos::user_repo::{self, UserRow};
use crate::routing::{PathParams, Request};
use crate::services::auth::Claims;
use crate::state::AppState;

fn target_user(state: &AppState, params: &PathParams) -> AppResult<UserRow> {
    params
        .int(0)
        .and_then(|id| user_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_USER_NOT_FOUND))
}

/// A valid token whose account has since been deleted gets 403.
fn ensure_caller_exists(state: &AppState, claims: &Claims) -> AppResult<()> {
    match user_repo::get(&state.db, claims.user_id()) {
        Some(_) => Ok(()),
        None => Err(AppError::forbidden(MSG_ACCESS_DENIED)),
    }
}

pub async fn list_users(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    ensure_caller_exists(state, &claims)?;

    Ok(response::ok(&UsersEnvelope {
        users: user_repo::list(&state.db),
    }))
}

pub async fn get_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;
    if user.id != claims.user_id() {
        ensure_caller_exists(state, &claims)?;
    }

    Ok(response::ok(&UserEnvelope { user }))
}

pub async fn update_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;
    policy::ensure_owner(&claims, user.id, MSG_ACCESS_DENIED)?;

    let body: UpdateUserRequest = req.json_or_default()?;
    let user = apply_user_update(state, user.id, &body, None)?;

    Ok(response::ok(&UserEnvelope { user }))
}

pub async fn delete_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;
    policy::ensure_owner(&claims, user.id, MSG_ACCESS_DENIED)?;

    user_repo::delete(&state.db, user.id);
    tracing::info!(user_id = user.id, "user deleted");

    Ok(response::message("Пользователь успешно удален"))
}
