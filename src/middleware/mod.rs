/*
 * Responsibility
 * - HTTP 層の横断的関心事 (CORS / request-id / trace / timeout / panic / security headers)
 * - 各 module は `apply(Router) -> Router` だけを公開する
 */
pub mod cors;
pub mod http;
pub mod security_headers;

use axum::Router;

use crate::config::Config;

/// Wraps the application with every HTTP layer, innermost first.
pub fn apply(router: Router, config: &Config) -> Router {
    let router = http::apply(router);
    let router = security_headers::apply(router);
    cors::apply(router, config)
}
