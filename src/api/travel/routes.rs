/*
 * Responsibility
 * - travel の URL 構造を定義 (登録順 = 照合順)
 * - /api/travels/my は /api/travels/{id} より先に登録する
 */
use axum::http::Method;

use crate::api::common::add_common_routes;
use crate::routing::{RouteError, Router};
use crate::state::AppState;

use super::handlers::{travels, users};

pub fn routes() -> Result<Router<AppState>, RouteError> {
    let mut router = Router::new();
    add_common_routes(&mut router)?;

    router
        .add_route(Method::GET, "/api/users", users::list_users)?
        .add_route(Method::GET, "/api/users/{id}", users::get_user)?
        .add_route(Method::PUT, "/api/users/{id}", users::update_user)?
        .add_route(Method::DELETE, "/api/users/{id}", users::delete_user)?
        .add_route(Method::GET, "/api/travels", travels::list_travels)?
        .add_route(Method::GET, "/api/travels/my", travels::my_travels)?
        .add_route(Method::GET, "/api/travels/{id}", travels::get_travel)?
        .add_route(Method::POST, "/api/travels", travels::create_travel)?
        .add_route(Method::PUT, "/api/travels/{id}", travels::update_travel)?
        .add_route(Method::DELETE, "/api/travels/{id}", travels::delete_travel)?
        .add_route(Method::POST, "/api/travels/{travel_id}/places", travels::add_place)?;

    Ok(router)
}
