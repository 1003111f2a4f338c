/*
 * Responsibility
 * - blog アプリ (posts / comments / tags / subscriptions) の公開口
 * - handler 間で共有する表示用の組み立て
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;

use crate::repos::post_repo::{self, PostRow};
use crate::repos::{Db, user_repo};

use dto::PostView;

pub(crate) const MSG_POST_NOT_FOUND: &str = "Пост не найден";

/// Attaches tags and author. The share token is kept only when `reveal_token`.
pub(crate) fn post_view(db: &Db, mut post: PostRow, reveal_token: bool) -> PostView {
    if !reveal_token {
        post.share_token = None;
    }
    PostView {
        tags: post_repo::tags_of(db, &post),
        user: user_repo::get(db, post.user_id).map(Into::into),
        post,
    }
}
