/*
 * Responsibility
 * - blog の /api/users/... handler (profile 閲覧・編集・削除, 購読)
 * - 編集・削除は本人のみ
 */
use axum::response::Response;
use serde_json::json;

use crate::api::blog::dto::PostView;
use crate::api::blog::post_view;
use crate::api::common::dto::{UpdateUserRequest, UserEnvelope, UsersEnvelope};
use crate::api::common::{MSG_USER_NOT_FOUND, apply_user_update};
use crate::api::response;
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::repos::user_repo::{self, UserRow};
use crate::repos::{post_repo, subscription_repo};
use crate::routing::{PathParams, Request};
use crate::services::auth::Claims;
use crate::state::AppState;

fn target_user(state: &AppState, params: &PathParams) -> AppResult<UserRow> {
    params
        .int(0)
        .and_then(|id| user_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_USER_NOT_FOUND))
}

/// Newest first. Other people's restricted posts are left out.
fn visible_posts_of(state: &AppState, caller: &Claims, user_id: i64) -> Vec<PostView> {
    post_repo::list_by_user(&state.db, user_id)
        .into_iter()
        .filter(|p| policy::is_visible(Some(caller), p.user_id, p.restricted))
        .map(|p| {
            let own = p.user_id == caller.user_id();
            post_view(&state.db, p, own)
        })
        .collect()
}

pub async fn list_users(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;

    Ok(response::ok(&UsersEnvelope {
        users: user_repo::list(&state.db),
    }))
}

pub async fn get_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;

    Ok(response::ok(&json!({
        "posts": visible_posts_of(state, &claims, user.id),
        "is_subscribed": subscription_repo::is_subscribed(&state.db, claims.user_id(), user.id),
        "subscriber_count": subscription_repo::subscriber_count(&state.db, user.id),
        "subscription_count": subscription_repo::subscription_count(&state.db, user.id),
        "user": user,
    })))
}

pub async fn update_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;
    policy::ensure_owner(&claims, user.id, "Вы можете редактировать только свой профиль")?;

    let body: UpdateUserRequest = req.json_or_default()?;
    let user = apply_user_update(state, user.id, &body, None)?;

    Ok(response::ok(&UserEnvelope { user }))
}

pub async fn delete_user(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;
    policy::ensure_owner(&claims, user.id, "Вы можете удалить только свой аккаунт")?;

    user_repo::delete(&state.db, user.id);
    tracing::info!(user_id = user.id, "user deleted");

    Ok(response::message("Пользователь успешно удален"))
}

pub async fn user_posts(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let user = target_user(state, &params)?;

    Ok(response::ok(&json!({
        "posts": visible_posts_of(state, &claims, user.id),
        "user": user,
    })))
}

pub async fn subscribe(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let target = target_user(state, &params)?;
    policy::ensure_not_self(&claims, target.id, "Нельзя подписаться на самого себя")?;

    subscription_repo::subscribe(&state.db, claims.user_id(), target.id)
        .map_err(|_| AppError::conflict("Вы уже подписаны на этого пользователя"))?;
    tracing::info!(subscriber_id = claims.user_id(), target_id = target.id, "subscribed");

    Ok(response::message("Успешно подписались"))
}

pub async fn unsubscribe(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let target = target_user(state, &params)?;

    if !subscription_repo::unsubscribe(&state.db, claims.user_id(), target.id) {
        return Err(AppError::bad_request("Вы не подписаны на этого пользователя"));
    }
    tracing::info!(subscriber_id = claims.user_id(), target_id = target.id, "unsubscribed");

    Ok(response::message("Успешно отписались"))
}
