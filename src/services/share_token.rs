//! Capability tokens for restricted blog posts.
//!
//! 16 random bytes, lowercase hex. Whoever holds the token can read the post,
//! so it must come from the OS RNG.

use crate::error::{AppError, AppResult};

const TOKEN_BYTES: usize = 16;

pub fn generate() -> AppResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes).map_err(|e| {
        tracing::error!(error = %e, "getrandom failed");
        AppError::Internal
    })?;
    Ok(hex::encode(bytes))
}
