/*
 * Responsibility
 * - /api/posts/{id}/comments の handler
 * - 親 post の可視性をそのまま引き継ぐ
 */
use axum::response::Response;
use serde_json::json;

use crate::api::blog::MSG_POST_NOT_FOUND;
use crate::api::blog::dto::{CommentRequest, CommentView, Commenter};
use crate::api::response;
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::repos::comment_repo::{self, CommentRow};
use crate::repos::{Db, post_repo, user_repo};
use crate::routing::{PathParams, Request};
use crate::state::AppState;

fn comment_view(db: &Db, comment: CommentRow) -> CommentView {
    let user = user_repo::get(db, comment.user_id).map(|u| Commenter {
        id: u.id,
        name: u.name,
    });
    CommentView { comment, user }
}

/// Oldest first.
pub async fn list_comments(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let post = params
        .int(0)
        .and_then(|id| post_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_POST_NOT_FOUND))?;

    let caller = state.auth.try_auth(req.headers());
    policy::ensure_visible(caller.as_ref(), post.user_id, post.restricted, MSG_POST_NOT_FOUND)?;

    let comments: Vec<CommentView> = comment_repo::list_for_post(&state.db, post.id)
        .into_iter()
        .map(|c| comment_view(&state.db, c))
        .collect();

    Ok(response::ok(&json!({ "comments": comments })))
}

pub async fn create_comment(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    // Content is checked before the post is looked up.
    let body: CommentRequest = req.json_or_default()?;
    let content = body.validate().map_err(AppError::bad_request)?;

    let post = params
        .int(0)
        .and_then(|id| post_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_POST_NOT_FOUND))?;
    policy::ensure_visible(Some(&claims), post.user_id, post.restricted, MSG_POST_NOT_FOUND)?;

    let comment = comment_repo::create(&state.db, post.id, claims.user_id(), content);
    tracing::info!(comment_id = comment.id, post_id = post.id, "comment created");

    Ok(response::created(&json!({ "comment": comment_view(&state.db, comment) })))
}
