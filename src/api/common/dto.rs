/*
 * Responsibility
 * - auth / users の request/response DTO (3 アプリ共通)
 * - 必須項目のチェックは validate() で行う
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repos::user_repo::UserRow;

/// Trimmed value of an optional text field; blank counts as missing.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// `(email, password)` when both are present.
    pub fn validate(&self) -> Result<(&str, &str), &'static str> {
        match (present(&self.email), self.password.as_deref()) {
            (Some(email), Some(password)) if !password.is_empty() => Ok((email, password)),
            _ => Err("Email и пароль обязательны"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Shop only. Anything but a literal `true` means a regular account.
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<Value>,
}

pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<Registration<'_>, &'static str> {
        match (present(&self.name), present(&self.email), self.password.as_deref()) {
            (Some(name), Some(email), Some(password)) if !password.is_empty() => Ok(Registration {
                name,
                email,
                password,
            }),
            _ => Err("Имя, email и пароль обязательны"),
        }
    }

    pub fn wants_admin(&self) -> bool {
        self.is_admin == Some(Value::Bool(true))
    }
}

/// Partial profile update. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Shop only, and only honoured for admins.
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRow,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserRow,
}

#[derive(Debug, Serialize)]
pub struct UsersEnvelope {
    pub users: Vec<UserRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest {
            email: Some(" a@b.c ".into()),
            password: Some("pw".into()),
        };
        assert_eq!(req.validate(), Ok(("a@b.c", "pw")));

        let req = LoginRequest {
            email: Some("   ".into()),
            password: Some("pw".into()),
        };
        assert_eq!(req.validate(), Err("Email и пароль обязательны"));
    }

    #[test]
    fn only_a_literal_true_asks_for_admin() {
        let parse = |body: &str| serde_json::from_str::<RegisterRequest>(body).unwrap();
        assert!(parse(r#"{"isAdmin": true}"#).wants_admin());
        assert!(!parse(r#"{"isAdmin": "true"}"#).wants_admin());
        assert!(!parse(r#"{"isAdmin": 1}"#).wants_admin());
        assert!(!parse("{}").wants_admin());
    }
}
