/*
 * Responsibility
 * - handler から呼ばれる横断的な service (token, password, share token)
 * - HTTP にも永続化にも依存しない
 */
pub mod auth;
pub mod password;
pub mod share_token;
