/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → AuthGuard + Db → AppState
 * - APP_KIND の route table を axum の fallback に載せ, middleware を適用
 * - axum::serve() で起動
 */
use std::{collections::HashMap, panic, process, sync::Arc};

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Query, State, rejection::BytesRejection},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, response::json_with_status};
use crate::config::Config;
use crate::error::{AppError, ErrorBody};
use crate::middleware;
use crate::repos::Db;
use crate::routing::{Request, Router};
use crate::services::auth::{AuthError, AuthGuard};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,trirest=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development crashes loudly; production keeps serving and the
        // catch-panic layer answers 500.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        app = config.app_kind.as_str(),
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let routes = api::routes(config.app_kind)?;
    tracing::debug!(?routes, "route table");

    let app = build_app(state, routes, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Process-wide services, built once and shared through `AppState`.
pub fn build_state(config: &Config) -> Result<AppState, AuthError> {
    let auth = AuthGuard::new(&config.jwt_secret, config.jwt_expire_seconds)?;

    Ok(AppState::new(auth, Db::new(), config.app_kind))
}

#[derive(Clone)]
struct Dispatcher {
    state: AppState,
    routes: Arc<Router<AppState>>,
}

/// Every request lands here; the first-match table decides what runs.
async fn dispatch(
    State(dispatcher): State<Dispatcher>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            return json_with_status(
                rejection.status(),
                &ErrorBody {
                    error: rejection.body_text(),
                },
            );
        }
    };
    // An unparsable query string is treated as no query at all.
    let query = Query::<HashMap<String, String>>::try_from_uri(&uri)
        .map(|Query(query)| query)
        .unwrap_or_default();

    let req = Request::new(method.as_str(), uri.path(), dispatcher.state.clone())
        .with_headers(headers)
        .with_query(query)
        .with_body(body);

    match dispatcher.routes.dispatch(req).await {
        Some(Ok(res)) => res,
        Some(Err(err)) => {
            if err.status().is_server_error() {
                tracing::error!(error = %err, %method, path = uri.path(), "request failed");
            } else {
                tracing::debug!(error = %err, %method, path = uri.path(), "request rejected");
            }
            err.into_response()
        }
        None => AppError::RouteNotFound.into_response(),
    }
}

/// Hands every request to `routes` and wraps the result in the HTTP layers.
pub fn build_app(state: AppState, routes: Router<AppState>, config: &Config) -> axum::Router {
    let dispatcher = Dispatcher {
        state,
        routes: Arc::new(routes),
    };

    let app = axum::Router::new()
        .fallback(dispatch)
        .with_state(dispatcher);

    middleware::apply(app, config)
}
