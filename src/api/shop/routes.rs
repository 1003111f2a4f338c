/*
 * Responsibility
 * - shop の URL 構造を定義 (登録順 = 照合順)
 * - /api/books/purchase 等の literal は /api/books/{id} より先に登録する
 */
use axum::http::Method;

use crate::api::common::add_common_routes;
use crate::routing::{RouteError, Router};
use crate::state::AppState;

use super::handlers::{books, rentals, users};

pub fn routes() -> Result<Router<AppState>, RouteError> {
    let mut router = Router::new();
    add_common_routes(&mut router)?;

    router
        .add_route(Method::GET, "/api/users", users::list_users)?
        .add_route(Method::GET, "/api/users/admins", users::list_admins)?
        .add_route(Method::GET, "/api/users/regular", users::list_regular)?
        .add_route(Method::GET, "/api/users/{id}", users::get_user)?
        .add_route(Method::PUT, "/api/users/{id}", users::update_user)?
        .add_route(Method::DELETE, "/api/users/{id}", users::delete_user)?
        .add_route(Method::GET, "/api/users/rentals", users::my_rentals)?
        .add_route(Method::GET, "/api/users/purchases", users::my_purchases)?
        .add_route(Method::GET, "/api/users/{id}/purchases", users::user_purchases)?
        .add_route(Method::GET, "/api/users/{id}/rentals", users::user_rentals)?;

    router
        .add_route(Method::GET, "/api/admin/rentals/overdue", rentals::overdue)?
        .add_route(Method::GET, "/api/admin/rentals/expiring", rentals::expiring)?
        .add_route(Method::POST, "/api/admin/rentals/send-reminders", rentals::send_reminders)?;

    router
        .add_route(Method::GET, "/api/books", books::list_books)?
        .add_route(Method::GET, "/api/books/purchase", books::books_for_purchase)?
        .add_route(Method::GET, "/api/books/rent", books::books_for_rent)?
        .add_route(Method::GET, "/api/books/{id}", books::get_book)?
        .add_route(Method::POST, "/api/books", books::create_book)?
        .add_route(Method::PUT, "/api/books/{id}", books::update_book)?
        .add_route(Method::DELETE, "/api/books/{id}", books::delete_book)?
        .add_route(Method::POST, "/api/books/{id}/purchase", books::purchase_book)?
        .add_route(Method::POST, "/api/books/{id}/rent", books::rent_book)?
        .add_route(Method::GET, "/api/categories", books::categories)?
        .add_route(Method::GET, "/api/authors", books::authors)?;

    Ok(router)
}
