/*
 * Responsibility
 * - endpoint 毎の認可ルール (ownership / admin override / visibility / self 除外)
 * - 判定だけを行い、HTTP status はエラー型で表す
 */
use std::fmt;

use crate::error::{AppError, AppResult};
use crate::services::auth::Claims;

/// Shop account role. Blog and travel accounts have no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Accepts the exact stored spellings only.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 403 unless the caller owns the resource.
pub fn ensure_owner(claims: &Claims, owner_id: i64, message: &str) -> AppResult<()> {
    if claims.user_id() == owner_id {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// 403 unless the caller's role is admin.
pub fn ensure_admin(role: Role, message: &str) -> AppResult<()> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// 403 unless the caller is the target user or an admin.
pub fn ensure_self_or_admin(
    claims: &Claims,
    target_id: i64,
    role: Role,
    message: &str,
) -> AppResult<()> {
    if claims.user_id() == target_id || role.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// 400 when the caller targets themselves (e.g. subscribing to yourself).
pub fn ensure_not_self(claims: &Claims, target_id: i64, message: &str) -> AppResult<()> {
    if claims.user_id() == target_id {
        Err(AppError::bad_request(message))
    } else {
        Ok(())
    }
}

/// Restricted resources are invisible to everyone but their owner.
///
/// Hidden resources answer 404 rather than 403 so their existence doesn't
/// leak. Anonymous callers pass `None`.
pub fn ensure_visible(
    caller: Option<&Claims>,
    owner_id: i64,
    restricted: bool,
    message: &str,
) -> AppResult<()> {
    if is_visible(caller, owner_id, restricted) {
        Ok(())
    } else {
        Err(AppError::not_found(message))
    }
}

/// Boolean form of [`ensure_visible`], for filtering listings.
pub fn is_visible(caller: Option<&Claims>, owner_id: i64, restricted: bool) -> bool {
    !restricted || caller.is_some_and(|c| c.user_id() == owner_id)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::services::auth::{AuthGuard, Identity};

    fn claims_for(user_id: i64) -> Claims {
        let guard = AuthGuard::new("policy-test-secret", 3600).unwrap();
        let token = guard
            .issue_token(&Identity::new(user_id, format!("u{user_id}@x.y")))
            .unwrap();
        guard.verify_token(&token).unwrap()
    }

    #[test]
    fn owner_passes_and_others_are_forbidden() {
        let me = claims_for(1);
        assert!(ensure_owner(&me, 1, "nope").is_ok());

        let err = ensure_owner(&me, 2, "nope").unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn admin_overrides_ownership_for_self_or_admin() {
        let me = claims_for(1);
        assert!(ensure_self_or_admin(&me, 1, Role::User, "x").is_ok());
        assert!(ensure_self_or_admin(&me, 2, Role::Admin, "x").is_ok());
        assert_eq!(
            ensure_self_or_admin(&me, 2, Role::User, "x").unwrap_err().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn self_targeting_is_a_bad_request() {
        let me = claims_for(5);
        assert_eq!(
            ensure_not_self(&me, 5, "self").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
        assert!(ensure_not_self(&me, 6, "self").is_ok());
    }

    #[test]
    fn restricted_resources_are_hidden_as_not_found() {
        let owner = claims_for(1);
        let stranger = claims_for(2);

        assert!(ensure_visible(None, 1, false, "gone").is_ok());
        assert!(ensure_visible(Some(&owner), 1, true, "gone").is_ok());

        for caller in [None, Some(&stranger)] {
            let err = ensure_visible(caller, 1, true, "gone").unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.to_string(), "gone");
        }
    }

    #[test]
    fn role_parsing_is_exact() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("root"), None);
        assert!(ensure_admin(Role::User, "admins only").is_err());
        assert!(ensure_admin(Role::Admin, "admins only").is_ok());
    }
}
