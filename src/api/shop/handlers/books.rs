/*
 * Responsibility
 * - /api/books/..., /api/categories, /api/authors の handler
 * - 全 endpoint で認証必須, 作成・更新・削除は管理者のみ
 * - 購入・貸出は在庫の検査と減算を 1 回の repo 呼び出しで行う
 */
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::api::response;
use crate::api::shop::dto::{BookRequest, NamedCount, PurchaseRequest, RentRequest};
use crate::api::shop::{MSG_BOOK_NOT_FOUND, require_admin};
use crate::error::{AppError, AppResult};
use crate::repos::book_repo::{self, BookChanges, BookQuery, BookRow, BookSort, Offer, StockError};
use crate::repos::rental_repo::{self, RentalPeriod};
use crate::routing::{PathParams, Request};
use crate::state::AppState;

fn stock_error(err: StockError, offer: Offer) -> AppError {
    match (err, offer) {
        (StockError::NotFound, _) => AppError::not_found(MSG_BOOK_NOT_FOUND),
        (StockError::NotOffered, Offer::Purchase) => AppError::bad_request("Книга недоступна для покупки"),
        (StockError::NotOffered, Offer::Rent) => AppError::bad_request("Книга недоступна для аренды"),
        (StockError::OutOfStock, _) => AppError::bad_request("Книга отсутствует на складе"),
        (StockError::Insufficient, _) => AppError::bad_request("Недостаточно книг на складе"),
    }
}

fn rental_price(book: &BookRow, period: RentalPeriod) -> f64 {
    match period {
        RentalPeriod::TwoWeeks => book.rental_price_2weeks,
        RentalPeriod::OneMonth => book.rental_price_1month,
        RentalPeriod::ThreeMonths => book.rental_price_3months,
    }
}

fn find_book(state: &AppState, params: &PathParams) -> AppResult<BookRow> {
    params
        .int(0)
        .and_then(|id| book_repo::get(&state.db, id))
        .ok_or_else(|| AppError::not_found(MSG_BOOK_NOT_FOUND))
}

pub async fn list_books(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;

    let query = BookQuery {
        category: req.query("category").filter(|c| !c.is_empty()),
        author: req.query("author").filter(|a| !a.is_empty()),
        sort: BookSort::parse(req.query("sort_by")),
    };

    Ok(response::ok(&json!({ "books": book_repo::list(&state.db, &query) })))
}

pub async fn books_for_purchase(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;

    Ok(response::ok(&json!({
        "books": book_repo::list_available(&state.db, Offer::Purchase),
    })))
}

pub async fn books_for_rent(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;

    Ok(response::ok(&json!({
        "books": book_repo::list_available(&state.db, Offer::Rent),
    })))
}

pub async fn get_book(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;
    let book = find_book(state, &params)?;

    Ok(response::ok(&json!({ "book": book })))
}

pub async fn create_book(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    let body: BookRequest = req.json_or_default()?;
    let new_book = body.into_new_book().map_err(AppError::bad_request)?;
    let book = book_repo::create(&state.db, new_book);
    tracing::info!(book_id = book.id, by = claims.user_id(), "book created");

    Ok(response::ok(&json!({ "book": book })))
}

pub async fn update_book(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    let body: BookRequest = req.json_or_default()?;
    let book = find_book(state, &params)?;
    let book = book_repo::update(&state.db, book.id, BookChanges::from(body))
        .ok_or_else(|| AppError::not_found(MSG_BOOK_NOT_FOUND))?;

    Ok(response::ok(&json!({ "book": book })))
}

pub async fn delete_book(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    require_admin(state, &claims)?;

    let book = find_book(state, &params)?;
    book_repo::delete(&state.db, book.id);
    tracing::info!(book_id = book.id, by = claims.user_id(), "book deleted");

    Ok(response::message("Книга успешно удалена"))
}

pub async fn purchase_book(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let book = find_book(state, &params)?;

    let body: PurchaseRequest = req.json_or_default()?;
    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::bad_request("Количество должно быть больше нуля"));
    }

    let book = book_repo::take_stock(&state.db, book.id, Offer::Purchase, quantity)
        .map_err(|e| stock_error(e, Offer::Purchase))?;
    let total_price = book.price * quantity as f64;
    let purchase = rental_repo::create_purchase(&state.db, claims.user_id(), book.id, quantity, total_price);
    tracing::info!(purchase_id = purchase.id, book_id = book.id, quantity, "book purchased");

    Ok(response::ok(&json!({
        "message": "Книга успешно куплена",
        "purchase_id": purchase.id,
        "total_price": total_price,
    })))
}

pub async fn rent_book(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let book = find_book(state, &params)?;

    let body: RentRequest = req.json_or_default()?;
    let Some(period) = body.rental_period.as_deref().and_then(RentalPeriod::parse) else {
        // Availability problems are reported ahead of a bad period.
        book_repo::check_stock(&book, Offer::Rent, 1).map_err(|e| stock_error(e, Offer::Rent))?;
        return Err(AppError::bad_request(
            "Неверный период аренды. Допустимые значения: 2weeks, 1month, 3months",
        ));
    };

    let book = book_repo::take_stock(&state.db, book.id, Offer::Rent, 1)
        .map_err(|e| stock_error(e, Offer::Rent))?;
    let price = rental_price(&book, period);
    let rental = rental_repo::create_rental(&state.db, claims.user_id(), book.id, period, price, Utc::now());
    tracing::info!(rental_id = rental.id, book_id = book.id, "book rented");

    Ok(response::ok(&json!({
        "message": "Книга успешно арендована",
        "rental_id": rental.id,
        "rental_price": price,
        "end_date": rental.end_date,
    })))
}

pub async fn categories(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;

    let categories: Vec<NamedCount> = book_repo::distinct_counts(&state.db, |b| b.category.as_deref())
        .into_iter()
        .map(|(name, book_count)| NamedCount { name, book_count })
        .collect();

    Ok(response::ok(&json!({ "categories": categories })))
}

pub async fn authors(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;

    let authors: Vec<NamedCount> = book_repo::distinct_counts(&state.db, |b| b.author.as_deref())
        .into_iter()
        .map(|(name, book_count)| NamedCount { name, book_count })
        .collect();

    Ok(response::ok(&json!({ "authors": authors })))
}
