/*
 * Responsibility
 * - blog の URL 構造を定義 (登録順 = 照合順)
 */
use axum::http::Method;

use crate::api::common::add_common_routes;
use crate::routing::{RouteError, Router};
use crate::state::AppState;

use super::handlers::{
    comments::{create_comment, list_comments},
    posts::{create_post, delete_post, get_post, get_shared_post, list_posts, list_tags, update_post},
    users::{delete_user, get_user, list_users, subscribe, unsubscribe, update_user, user_posts},
};

pub fn routes() -> Result<Router<AppState>, RouteError> {
    let mut router = Router::new();
    add_common_routes(&mut router)?;

    router
        .add_route(Method::GET, "/api/users", list_users)?
        .add_route(Method::GET, "/api/users/{id}", get_user)?
        .add_route(Method::PUT, "/api/users/{id}", update_user)?
        .add_route(Method::DELETE, "/api/users/{id}", delete_user)?
        .add_route(Method::POST, "/api/users/{id}/subscribe", subscribe)?
        .add_route(Method::DELETE, "/api/users/{id}/subscribe", unsubscribe)?
        .add_route(Method::GET, "/api/posts", list_posts)?
        .add_route(Method::GET, "/api/posts/{id}", get_post)?
        .add_route(Method::POST, "/api/posts", create_post)?
        .add_route(Method::PUT, "/api/posts/{id}", update_post)?
        .add_route(Method::DELETE, "/api/posts/{id}", delete_post)?
        .add_route(Method::GET, "/api/share/{token}", get_shared_post)?
        .add_route(Method::GET, "/api/tags", list_tags)?
        .add_route(Method::GET, "/api/users/{id}/posts", user_posts)?
        .add_route(Method::GET, "/api/posts/{id}/comments", list_comments)?
        .add_route(Method::POST, "/api/posts/{id}/comments", create_comment)?;

    Ok(router)
}
