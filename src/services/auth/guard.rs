use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use super::bearer::extract_bearer_token;
use super::claims::{Claims, Identity, RawClaims};
use crate::error::AppError;

/// Token lifetime when `JWT_EXPIRE` is not set.
pub const DEFAULT_EXPIRY_SECONDS: i64 = 3600;

/// Longest accepted token lifetime (one year).
pub const MAX_EXPIRY_SECONDS: i64 = 365 * 24 * 3600;

/// The only algorithm accepted, for signing and for verifying.
const ALGORITHM: Algorithm = Algorithm::HS256;

const MSG_TOKEN_REQUIRED: &str = "Authorization token required";
const MSG_TOKEN_INVALID: &str = "Invalid or expired token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("jwt secret is not configured")]
    MissingSecret,

    #[error("token lifetime out of range")]
    ExpiryOutOfRange,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => AppError::unauthorized(MSG_TOKEN_REQUIRED),
            // Expired and invalid look the same from outside.
            AuthError::Expired | AuthError::Invalid(_) => AppError::unauthorized(MSG_TOKEN_INVALID),
            AuthError::MissingSecret | AuthError::ExpiryOutOfRange | AuthError::Signing(_) => {
                AppError::Internal
            }
        }
    }
}

/// HS256 token issuer + verifier.
///
/// Built once at startup from config and shared read-only. Key material is
/// not printable via Debug.
#[derive(Clone)]
pub struct AuthGuard {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_seconds: i64,
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field("algorithm", &ALGORITHM)
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl AuthGuard {
    pub fn new(secret: &str, expiry_seconds: i64) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::MissingSecret);
        }
        if !(0..=MAX_EXPIRY_SECONDS).contains(&expiry_seconds) {
            return Err(AuthError::ExpiryOutOfRange);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.algorithms = vec![ALGORITHM];
        // exp is compared against the caller's clock in `verify_token_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_seconds,
        })
    }

    pub fn issue_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_token_at(identity, Utc::now().timestamp())
    }

    /// Signs `identity` plus `iat = now` and `exp = now + expiry`.
    pub fn issue_token_at(&self, identity: &Identity, now: i64) -> Result<String, AuthError> {
        let mut payload: Map<String, Value> = identity.extra.clone();
        payload.insert("user_id".into(), identity.user_id.into());
        payload.insert("email".into(), identity.email.clone().into());
        payload.insert("iat".into(), now.into());
        let exp = now
            .checked_add(self.expiry_seconds)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        payload.insert("exp".into(), exp.into());

        let mut header = Header::new(ALGORITHM);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &payload, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign JWT");
            AuthError::Signing(e)
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_token_at(token, Utc::now().timestamp())
    }

    /// Checks signature and algorithm, then requires `now < exp`.
    pub fn verify_token_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::Invalid)?;

        if now >= data.claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(Claims::from_verified(data.claims))
    }

    /// Identity of the caller, or the 401 the handler must return right away.
    pub fn require_auth(&self, headers: &HeaderMap) -> Result<Claims, AppError> {
        let token = extract_bearer_token(headers).ok_or(AuthError::MissingToken)?;

        self.verify_token(token).map_err(|err| {
            tracing::warn!(error = ?err, "access token verification failed");
            AppError::from(err)
        })
    }

    /// Like `require_auth`, but anonymous or broken credentials just mean `None`.
    pub fn try_auth(&self, headers: &HeaderMap) -> Option<Claims> {
        let token = extract_bearer_token(headers)?;
        self.verify_token(token).ok()
    }
}
