/*
 * Responsibility
 * - 3 アプリ共通の endpoint (health / auth) と handler 間で共有する helper
 * - token 発行時の claim 組み立て (shop は role を載せる)
 */
pub mod dto;
pub mod handlers;

use axum::http::Method;

use crate::error::{AppError, AppResult};
use crate::policy::Role;
use crate::repos::user_repo::{self, UserChanges, UserRow};
use crate::routing::{RouteError, Router};
use crate::services::auth::{Claims, Identity};
use crate::services::password::hash_password;
use crate::state::AppState;

use dto::{UpdateUserRequest, present};

pub const MSG_USER_NOT_FOUND: &str = "Пользователь не найден";
pub const MSG_EMAIL_IN_USE: &str = "Этот email уже используется";
pub const MSG_ACCESS_DENIED: &str = "Доступ запрещен";

/// Health check and the auth endpoints, which every app registers first.
pub fn add_common_routes(router: &mut Router<AppState>) -> Result<(), RouteError> {
    router
        .add_route(Method::GET, "/api/health", handlers::health::health)?
        .add_route(Method::POST, "/api/auth/login", handlers::auth::login)?
        .add_route(Method::POST, "/api/auth/register", handlers::auth::register)?
        .add_route(Method::GET, "/api/auth/profile", handlers::auth::profile)?
        .add_route(Method::POST, "/api/auth/logout", handlers::auth::logout)?;
    Ok(())
}

/// Signs a token for `user`. Accounts with a role get it as a `role` claim.
pub fn issue_token_for(state: &AppState, user: &UserRow) -> AppResult<String> {
    let mut identity = Identity::new(user.id, user.email.clone());
    if let Some(role) = user.role {
        identity = identity.with("role", role.as_str());
    }
    Ok(state.auth.issue_token(&identity)?)
}

/// Role of the caller as currently stored. The `role` claim is not trusted:
/// a demoted admin loses rights right away.
pub fn caller_role(state: &AppState, claims: &Claims) -> Role {
    user_repo::get(&state.db, claims.user_id())
        .map(|u| u.role())
        .unwrap_or_default()
}

/// Applies name / email / password from `body`, plus `role` when given.
///
/// 404 when the user vanished, 409 when the email belongs to someone else.
pub fn apply_user_update(
    state: &AppState,
    user_id: i64,
    body: &UpdateUserRequest,
    role: Option<Role>,
) -> AppResult<UserRow> {
    let password_hash = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(hash_password)
        .transpose()?;

    let changes = UserChanges {
        name: present(&body.name).map(str::to_string),
        email: present(&body.email).map(str::to_string),
        password_hash,
        role,
    };

    match user_repo::update(&state.db, user_id, changes) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AppError::not_found(MSG_USER_NOT_FOUND)),
        Err(_) => Err(AppError::conflict(MSG_EMAIL_IN_USE)),
    }
}
