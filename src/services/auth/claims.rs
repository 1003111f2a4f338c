use serde::Deserialize;
use serde_json::{Map, Value};

/// Claim names the guard owns; application fields can't shadow them.
pub(super) const RESERVED_CLAIMS: [&str; 4] = ["user_id", "email", "iat", "exp"];

/// Who a token is being issued for.
///
/// `extra` carries application-specific claims (the shop puts `role` here).
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub extra: Map<String, Value>,
}

impl Identity {
    pub fn new(user_id: i64, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Adds an application claim. Reserved names are ignored.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if !RESERVED_CLAIMS.contains(&key) {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }
}

/// Wire shape of a token payload. Only the guard decodes into this.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawClaims {
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verified token payload, valid for the request that presented it.
///
/// There is no public constructor: the only way to get one is
/// `AuthGuard::verify_token`.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    user_id: i64,
    email: String,
    issued_at: i64,
    expires_at: i64,
    extra: Map<String, Value>,
}

impl Claims {
    pub(super) fn from_verified(raw: RawClaims) -> Self {
        Self {
            user_id: raw.user_id,
            email: raw.email,
            issued_at: raw.iat,
            expires_at: raw.exp,
            extra: raw.extra,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn role(&self) -> Option<&str> {
        self.extra("role").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_cannot_be_overridden() {
        let identity = Identity::new(1, "a@b.com")
            .with("exp", 0)
            .with("user_id", 99)
            .with("role", "admin");

        assert_eq!(identity.extra.len(), 1);
        assert_eq!(identity.extra["role"], "admin");
    }
}
