/*
 * Responsibility
 * - /api/travels/... の handler (全 endpoint で認証必須)
 * - 更新・削除・place 追加は作成者のみ
 * - PUT の places は isRemoved=true で削除, id 付きで更新, id なしで追加
 */
use axum::response::Response;
use serde_json::json;

use crate::api::response;
use crate::api::travel::dto::{PlaceRequest, TravelRequest, TravelView};
use crate::api::travel::{MSG_TRAVEL_NOT_FOUND, object_body, required_body, travel_view};
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::repos::travel_repo::{self, TravelQuery, TravelRow, TravelSort};
use crate::repos::Db;
use crate::routing::{PathParams, Request};
use crate::services::auth::Claims;
use crate::state::AppState;

const MSG_ACCESS_DENIED: &str = "Access denied";

fn find_travel(db: &Db, id: Option<i64>) -> AppResult<TravelRow> {
    id.and_then(|id| travel_repo::get(db, id))
        .ok_or_else(|| AppError::not_found(MSG_TRAVEL_NOT_FOUND))
}

fn list(req: &Request<AppState>, user_id: Option<i64>) -> Vec<TravelView> {
    let db = &req.state().db;
    let query = TravelQuery {
        user_id,
        location: req.query("location"),
        sort: TravelSort::parse(req.query("sort_by"), req.query("sort_direction")),
    };

    travel_repo::list(db, &query)
        .into_iter()
        .map(|t| travel_view(db, t))
        .collect()
}

/// Applies a `places` list to `travel_id`.
fn sync_places(db: &Db, travel_id: i64, places: &[PlaceRequest]) {
    for entry in places {
        if entry.is_removed() {
            if let Some(id) = entry.id {
                travel_repo::remove_place(db, travel_id, id);
            }
            continue;
        }

        let Some(place) = entry.to_new_place() else {
            continue;
        };
        match entry.id {
            Some(id) => {
                if travel_repo::replace_place(db, travel_id, id, place).is_none() {
                    tracing::debug!(travel_id, place_id = id, "place to update not found on travel");
                }
            }
            None => {
                travel_repo::add_place(db, travel_id, place);
            }
        }
    }
}

/// Every user's travels.
pub async fn list_travels(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    req.state().auth.require_auth(req.headers())?;

    Ok(response::ok(&json!({ "travels": list(&req, None) })))
}

pub async fn my_travels(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let claims = req.state().auth.require_auth(req.headers())?;

    Ok(response::ok(&json!({ "travels": list(&req, Some(claims.user_id())) })))
}

pub async fn get_travel(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    state.auth.require_auth(req.headers())?;
    let travel = find_travel(&state.db, params.int(0))?;

    Ok(response::ok(&json!({ "travel": travel_view(&state.db, travel) })))
}

pub async fn create_travel(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    let mut body: TravelRequest = required_body(&req)?;
    body.validate_new().map_err(AppError::bad_request)?;

    let travel = travel_repo::create(&state.db, claims.user_id(), body.take_fields());
    for place in body.places.iter().flatten().filter_map(PlaceRequest::to_new_place) {
        travel_repo::add_place(&state.db, travel.id, place);
    }
    tracing::info!(travel_id = travel.id, user_id = claims.user_id(), "travel created");

    Ok(response::ok(&json!({ "travel": travel_view(&state.db, travel) })))
}

pub async fn update_travel(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let travel = owned_travel(state, &claims, params.int(0))?;

    let mut body: TravelRequest = required_body(&req)?;
    let updated = travel_repo::update(&state.db, travel.id, body.take_fields())
        .ok_or_else(|| AppError::not_found(MSG_TRAVEL_NOT_FOUND))?;
    if let Some(places) = &body.places {
        sync_places(&state.db, travel.id, places);
    }

    Ok(response::ok(&json!({ "travel": travel_view(&state.db, updated) })))
}

pub async fn delete_travel(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let travel = owned_travel(state, &claims, params.int(0))?;

    travel_repo::delete(&state.db, travel.id);
    tracing::info!(travel_id = travel.id, user_id = claims.user_id(), "travel deleted");

    Ok(response::message("Travel deleted successfully"))
}

pub async fn add_place(req: Request<AppState>, params: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;
    let travel_id = params.named("travel_id").and_then(|v| v.parse().ok());
    let travel = owned_travel(state, &claims, travel_id)?;

    let place = object_body::<PlaceRequest>(&req)
        .and_then(|body| body.to_new_place())
        .ok_or_else(|| AppError::bad_request("Place name is required"))?;
    let place = travel_repo::add_place(&state.db, travel.id, place);

    Ok(response::ok(&json!({ "place": place })))
}

/// 404 when missing, 403 when someone else's.
fn owned_travel(state: &AppState, claims: &Claims, id: Option<i64>) -> AppResult<TravelRow> {
    let travel = find_travel(&state.db, id)?;
    policy::ensure_owner(claims, travel.user_id, MSG_ACCESS_DENIED)?;
    Ok(travel)
}
