/*
 * Responsibility
 * - 3 つのアプリ (blog / shop / travel) の route table 公開口
 * - handler から見える Request 型と JSON response helper
 */
pub mod blog;
pub mod common;
pub mod response;
pub mod shop;
pub mod travel;

use crate::config::AppKind;
use crate::routing::{RouteError, Router};
use crate::state::AppState;

/// Route table for the configured application.
pub fn routes(kind: AppKind) -> Result<Router<AppState>, RouteError> {
    match kind {
        AppKind::Blog => blog::routes(),
        AppKind::Shop => shop::routes(),
        AppKind::Travel => travel::routes(),
    }
}
