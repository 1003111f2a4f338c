/*
 * Responsibility
 * - /api/auth/... (register / login / profile / logout)
 * - token は発行するだけで、サーバ側に状態は持たない (logout は no-op)
 */
use axum::response::Response;

use crate::api::common::dto::{AuthResponse, LoginRequest, RegisterRequest, UserEnvelope};
use crate::api::common::{MSG_USER_NOT_FOUND, issue_token_for};
use crate::api::response;
use crate::config::AppKind;
use crate::error::{AppError, AppResult};
use crate::policy::Role;
use crate::repos::user_repo::{self, NewUser};
use crate::routing::{PathParams, Request};
use crate::services::password::{hash_password, verify_password};
use crate::state::AppState;

pub async fn register(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let body: RegisterRequest = req.json_or_default()?;
    let input = body.validate().map_err(AppError::bad_request)?;

    let role = match state.kind {
        AppKind::Shop if body.wants_admin() => Some(Role::Admin),
        AppKind::Shop => Some(Role::User),
        AppKind::Blog | AppKind::Travel => None,
    };

    let user = user_repo::create(
        &state.db,
        NewUser {
            name: input.name.to_string(),
            email: input.email.to_string(),
            password_hash: hash_password(input.password)?,
            role,
        },
    )
    .map_err(|_| AppError::conflict("Пользователь с таким email уже существует"))?;

    tracing::info!(user_id = user.id, app = state.kind.as_str(), "user registered");

    let token = issue_token_for(state, &user)?;
    Ok(response::created(&AuthResponse { token, user }))
}

pub async fn login(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let body: LoginRequest = req.json_or_default()?;
    let (email, password) = body.validate().map_err(AppError::bad_request)?;

    let user = user_repo::find_by_email(&state.db, email)
        .filter(|u| verify_password(password, &u.password_hash))
        .ok_or_else(|| {
            tracing::info!("login rejected");
            AppError::unauthorized("Неверные учетные данные")
        })?;

    let token = issue_token_for(state, &user)?;
    Ok(response::ok(&AuthResponse { token, user }))
}

pub async fn profile(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    let state = req.state();
    let claims = state.auth.require_auth(req.headers())?;

    let user = user_repo::get(&state.db, claims.user_id())
        .ok_or_else(|| AppError::not_found(MSG_USER_NOT_FOUND))?;

    Ok(response::ok(&UserEnvelope { user }))
}

pub async fn logout(req: Request<AppState>, _: PathParams) -> AppResult<Response> {
    req.state().auth.require_auth(req.headers())?;
    Ok(response::message("Успешно вышли из системы"))
}
