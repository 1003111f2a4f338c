//! First-match-wins route table.
//!
//! Routes are tried in registration order and the first one whose method and
//! pattern both match wins. Registration order is part of the contract: a
//! literal route such as `/api/books/purchase` must be registered before a
//! parametric sibling like `/api/books/{id}` that would also accept it.

use std::{future::Future, pin::Pin, sync::Arc};

use axum::{http::Method, response::Response};

use super::{PathParams, Request, RouteError, RoutePattern};
use crate::error::AppResult;

pub type HandlerFuture = Pin<Box<dyn Future<Output = AppResult<Response>> + Send>>;

/// Anything callable with the request and the captured path params.
///
/// Plain `async fn(Request<S>, PathParams) -> AppResult<Response>` functions
/// implement this through the blanket impl below.
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, req: Request<S>, params: PathParams) -> HandlerFuture;
}

impl<S, F, Fut> Handler<S> for F
where
    F: Fn(Request<S>, PathParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AppResult<Response>> + Send + 'static,
{
    fn call(&self, req: Request<S>, params: PathParams) -> HandlerFuture {
        Box::pin((self)(req, params))
    }
}

struct Route<S> {
    method: String,
    pattern: RoutePattern,
    handler: Arc<dyn Handler<S>>,
}

/// Result of matching a method + path against the table.
pub struct RouteMatch<'a, S> {
    pub method: &'a str,
    pub pattern: &'a str,
    pub params: PathParams,
    handler: &'a Arc<dyn Handler<S>>,
}

pub struct Router<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S> std::fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.routes
                    .iter()
                    .map(|r| format!("{} {}", r.method, r.pattern.as_str())),
            )
            .finish()
    }
}

impl<S: 'static> Router<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route. Duplicates are kept; the earlier one always wins.
    pub fn add_route<H>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError>
    where
        H: Handler<S>,
    {
        let pattern = RoutePattern::compile(pattern)?;
        self.routes.push(Route {
            method: method.as_str().to_ascii_uppercase(),
            pattern,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route matching `method` + `path` without calling it.
    pub fn resolve(&self, method: &str, path: &str) -> Option<RouteMatch<'_, S>> {
        let method = method.to_ascii_uppercase();

        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                route.pattern.captures(path).map(|params| RouteMatch {
                    method: &route.method,
                    pattern: route.pattern.as_str(),
                    params,
                    handler: &route.handler,
                })
            })
    }

    /// Runs the first matching handler. `None` means no route matched and the
    /// caller owes the client a 404.
    pub async fn dispatch(&self, req: Request<S>) -> Option<AppResult<Response>> {
        let RouteMatch {
            pattern,
            params,
            handler,
            ..
        } = self.resolve(req.method(), req.path())?;

        tracing::debug!(method = %req.method(), route = %pattern, "dispatching");

        let handler = Arc::clone(handler);
        Some(handler.call(req, params).await)
    }
}
