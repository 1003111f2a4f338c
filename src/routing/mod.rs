/*
 * Responsibility
 * - method + path pattern → handler の登録と first-match-wins の dispatch
 * - pattern は登録時に一度だけ regex へ compile する
 */
mod pattern;
mod request;
mod table;

use thiserror::Error;

pub use pattern::{PathParams, RoutePattern};
pub use request::Request;
pub use table::{Handler, Router};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
