/*
 * Responsibility
 * - shop アプリ (books / purchases / rentals / 管理者向け一覧) の公開口
 * - 管理者判定と表示用の組み立て
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;

use crate::api::common::caller_role;
use crate::error::AppResult;
use crate::policy;
use crate::repos::rental_repo::{PurchaseRow, RentalRow};
use crate::repos::{Db, book_repo, user_repo};
use crate::services::auth::Claims;
use crate::state::AppState;

use dto::{AdminRentalView, PurchaseView, RentalView};

pub(crate) const MSG_ADMIN_REQUIRED: &str = "Доступ запрещен. Требуются права администратора";
pub(crate) const MSG_BOOK_NOT_FOUND: &str = "Книга не найдена";

/// 403 unless the caller's stored role is admin.
pub(crate) fn require_admin(state: &AppState, claims: &Claims) -> AppResult<()> {
    policy::ensure_admin(caller_role(state, claims), MSG_ADMIN_REQUIRED)
}

pub(crate) fn purchase_view(db: &Db, purchase: PurchaseRow) -> PurchaseView {
    let book = book_repo::get(db, purchase.book_id);
    PurchaseView {
        book_title: book.as_ref().map(|b| b.title.clone()),
        book_price: book.map(|b| b.price),
        purchase,
    }
}

pub(crate) fn rental_view(db: &Db, rental: RentalRow) -> RentalView {
    RentalView {
        book_title: book_repo::get(db, rental.book_id).map(|b| b.title),
        rental,
    }
}

pub(crate) fn admin_rental_view(db: &Db, rental: RentalRow) -> AdminRentalView {
    let user = user_repo::get(db, rental.user_id);
    AdminRentalView {
        user_name: user.as_ref().map(|u| u.name.clone()),
        user_email: user.map(|u| u.email),
        book_title: book_repo::get(db, rental.book_id).map(|b| b.title),
        rental,
    }
}
