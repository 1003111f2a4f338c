/*
 * Responsibility
 * - HS256 access token の発行と検証 (AuthGuard)
 * - Authorization: Bearer header の解析
 * - 検証済み Claims の公開 (未検証の payload は外に出さない)
 */
mod bearer;
mod claims;
mod guard;

pub use bearer::extract_bearer_token;
pub use claims::{Claims, Identity};
pub use guard::{AuthError, AuthGuard, DEFAULT_EXPIRY_SECONDS, MAX_EXPIRY_SECONDS};
