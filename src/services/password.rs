//! Argon2id password hashing (PHC strings).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::error::{AppError, AppResult};

const SALT_BYTES: usize = 16;

fn random_salt() -> AppResult<SaltString> {
    let mut bytes = [0u8; SALT_BYTES];
    getrandom::fill(&mut bytes).map_err(|e| {
        tracing::error!(error = %e, "getrandom failed");
        AppError::Internal
    })?;

    SaltString::encode_b64(&bytes).map_err(|e| {
        tracing::error!(error = %e, "failed to encode salt");
        AppError::Internal
    })
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = random_salt()?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "failed to hash password");
            AppError::Internal
        })
}

/// `false` for a wrong password and for a stored hash that doesn't parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash is not a PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"), "hash should be in PHC format");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a) && verify_password("same", &b));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "plaintext"));
    }
}
