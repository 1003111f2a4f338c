//! CORS policy for the browser front-ends of the three apps.
//!
//! Development answers every origin; production only echoes origins listed in
//! `CORS_ALLOWED_ORIGINS`. Credentials are never allowed, so the wildcard is
//! safe to combine with the `Authorization` header.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

fn layer(config: &Config) -> CorsLayer {
    let cors = if config.app_env.is_production() {
        // An empty allowlist means no CORS headers at all.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ])
    .max_age(Duration::from_secs(60 * 10))
}

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}
