/*
 * Responsibility
 * - /api/posts, /api/share/{token}, /api/tags の handler
 * - restricted post は作者以外には存在しないものとして扱う (404)
 * - share token を知っている者は identity 検査なしで閲覧できる
 */
use axum::response::Response;
use serde_json::json;

use crate::api::blog::dto::{CreatePostRequest, TagCount, UpdatePostRequest};
use crate::api::blog::{MSG_POST_NOT_FOUND, post_view};
use crate::api::response;
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::repos::post_repo::{self, NewPost, PostChanges, PostQuery, PostSort};
use crate::repos::subscription_repo;
use crate::routing::{PathParams, Request};
use crate::services::share_token;
use crate::state::AppState;

/// Bare JSON array. `isSubscriptions=true` narrows to followed authors,
/// but only for a signed-in caller.
pub async fn list_posts(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let caller = state.auth.try_auth(req.headers());

    let followed = match &caller {
        Some(claims) if req.query("isSubscriptions") == Some("true") => {
            Some(subscription_repo::followed_ids(&state.db, claims.user_id()))
        }
        _ => None,
    };

    let query = PostQuery {
        sort: PostSort::parse(req.query("sortBy")),
        tag: req.query("tag").filter(|t| !t.is_empty()),
        authors: followed.as_deref(),
    };

    let posts: Vec<_> = post_repo::list(&state.db, &query)
        .into_iter()
        .filter(|p| policy::is_visible(caller.as_ref(), p.user_id, p.restricted))
        .map(|p| post_view(&state.db, p, false))
        .collect();

    Ok(response::ok(&posts))
}

pub async fn get_post(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let post = params
        .int(0)
        .and_then(|id| post_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_POST_NOT_FOUND))?;

    let caller = state.auth.try_auth(req.headers());
    policy::ensure_visible(caller.as_ref(), post.user_id, post.restricted, MSG_POST_NOT_FOUND)?;

    let is_owner = caller.is_some_and(|c| c.user_id() == post.user_id);
    Ok(response::ok(&post_view(&state.db, post, is_owner)))
}

/// Holding the token is the authorization.
pub async fn get_shared_post(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let post = params
        .named("token")
        .and_then(|token| post_repo::find_by_share_token(&state.db, token))
        .ok_or_else(|| AppError::not_found("Пост не найден или токен недействителен"))?;

    Ok(response::ok(&post_view(&state.db, post, true)))
}

pub async fn create_post(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    let body: CreatePostRequest = req.json_or_default()?;
    let (title, content) = body.validate().map_err(AppError::bad_request)?;

    let restricted = body.restricted.unwrap_or(false);
    let share_token = if restricted {
        Some(share_token::generate()?)
    } else {
        None
    };

    let post = post_repo::create(
        &state.db,
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
            restricted,
            share_token,
            user_id: claims.user_id(),
            tags: body.tags.clone().unwrap_or_default(),
        },
    );
    tracing::info!(post_id = post.id, user_id = claims.user_id(), restricted, "post created");

    Ok(response::created(&json!({ "post": post_view(&state.db, post, true) })))
}

pub async fn update_post(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    let post = params
        .int(0)
        .and_then(|id| post_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_POST_NOT_FOUND))?;
    policy::ensure_owner(&claims, post.user_id, "Вы можете редактировать только свои посты")?;

    let body: UpdatePostRequest = req.json_or_default()?;
    let fresh_share_token = if body.restricted == Some(true) && post.share_token.is_none() {
        Some(share_token::generate()?)
    } else {
        None
    };

    let changes = PostChanges {
        title: body.title.filter(|t| !t.trim().is_empty()),
        content: body.content.filter(|c| !c.trim().is_empty()),
        restricted: body.restricted,
        fresh_share_token,
        tags: body.tags,
    };
    let updated = post_repo::update(&state.db, post.id, changes)
        .ok_or_else(|| AppError::not_found(MSG_POST_NOT_FOUND))?;

    Ok(response::ok(&json!({ "post": post_view(&state.db, updated, true) })))
}

pub async fn delete_post(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    let post = params
        .int(0)
        .and_then(|id| post_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_POST_NOT_FOUND))?;
    policy::ensure_owner(&claims, post.user_id, "Вы можете удалять только свои посты")?;

    post_repo::delete(&state.db, post.id);
    tracing::info!(post_id = post.id, user_id = claims.user_id(), "post deleted");

    Ok(response::message("Пост успешно удален"))
}

pub async fn list_tags(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let tags: Vec<TagCount> = post_repo::tag_counts(&req.state().db)
        .into_iter()
        .map(|(tag, post_count)| TagCount { tag, post_count })
        .collect();

    Ok(response::ok(&json!({ "tags": tags })))
}
