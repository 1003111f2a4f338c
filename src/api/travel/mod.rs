/*
 * Responsibility
 * - travel アプリ (travels / places_to_visit) の公開口
 * - body の読み取り規則 (空 / 非 object は "Invalid JSON")
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::repos::{Db, travel_repo::{self, TravelRow}};
use crate::routing::Request;
use crate::state::AppState;

use dto::TravelView;

pub(crate) const MSG_TRAVEL_NOT_FOUND: &str = "Travel not found";
pub(crate) const MSG_INVALID_JSON: &str = "Invalid JSON";

/// Body as a non-empty JSON object; anything else is `None`.
pub(crate) fn object_body<T: DeserializeOwned>(req: &Request<AppState>) -> Option<T> {
    match req.json_value() {
        Value::Object(map) if !map.is_empty() => serde_json::from_value(Value::Object(map)).ok(),
        _ => None,
    }
}

/// Like [`object_body`], but missing or unreadable bodies are a 400.
pub(crate) fn required_body<T: DeserializeOwned>(req: &Request<AppState>) -> AppResult<T> {
    object_body(req).ok_or_else(|| AppError::bad_request(MSG_INVALID_JSON))
}

pub(crate) fn travel_view(db: &Db, travel: TravelRow) -> TravelView {
    TravelView {
        places: travel_repo::places_of(db, travel.id),
        travel,
    }
}
