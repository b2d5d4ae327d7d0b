use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Method, Request, Response, StatusCode};
use tracing::warn;

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::database::utils::get_timestamp;
use crate::handlers::http::utils::{deliver_error_json, get_bearer_token};
use crate::handlers::http::{analysis, auth, health};

// ---------------------------------------------------------------------------
// Handler type aliases
// ---------------------------------------------------------------------------
//
// Two tiers:
//
//   RouteHandler  : no auth.  Receives (req, state).
//                   Use for: /register, /login, /health.
//
//   AuthHandler   : bearer token signature + expiry, zero DB reads.
//                   Receives (req, state, user).
//                   Use for: everything under /api.

type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send>>;

type RouteHandler =
    Box<dyn Fn(Request<hyper::body::Incoming>, AppState) -> HandlerFuture + Send + Sync>;

type AuthHandler = Box<
    dyn Fn(Request<hyper::body::Incoming>, AppState, AuthenticatedUser) -> HandlerFuture
        + Send
        + Sync,
>;

enum RouteKind {
    /// No authentication check.
    Open(RouteHandler),

    /// Token verified by the router before the handler runs.  The handler
    /// receives the `AuthenticatedUser` and must not re-check.
    Authenticated(AuthHandler),
}

struct Route {
    method: Method,
    path: String,
    kind: RouteKind,
}

pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    // ── Open (no auth) ────────────────────────────────────────────────────────

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.open(Method::GET, path, handler)
    }

    /// POST with no authentication.  Only for /register and /login.
    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.open(Method::POST, path, handler)
    }

    fn open<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    // ── Authenticated (bearer token, zero DB reads) ──────────────────────────

    pub fn get_auth<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState, AuthenticatedUser) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.authenticated(Method::GET, path, handler)
    }

    pub fn post_auth<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState, AuthenticatedUser) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.authenticated(Method::POST, path, handler)
    }

    fn authenticated<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState, AuthenticatedUser) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: RouteKind::Authenticated(Box::new(move |req, state, user| {
                Box::pin(handler(req, state, user))
            })),
        });
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
        state: AppState,
    ) -> Result<Response<BoxBody<Bytes, Infallible>>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method || !Self::path_matches(&route.path, &path) {
                continue;
            }

            return match &route.kind {
                RouteKind::Open(h) => h(req, state).await,

                RouteKind::Authenticated(h) => match authenticate(&req, &state) {
                    Ok(user) => h(req, state, user).await,
                    Err(reason) => {
                        warn!("Auth rejected {} {}: {}", method, path, reason);
                        unauthorized()
                    }
                },
            };
        }

        deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);
        route_path == clean
    }
}

/// Bearer token → verified identity.  The error string is for logs only.
fn authenticate(
    req: &Request<hyper::body::Incoming>,
    state: &AppState,
) -> std::result::Result<AuthenticatedUser, String> {
    let token = get_bearer_token(req.headers()).ok_or("missing bearer token")?;
    let now = u64::try_from(get_timestamp()).unwrap_or(0);
    state.tokens.verify(token, now).map_err(|e| e.to_string())
}

fn unauthorized() -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_error_json(
        "UNAUTHORIZED",
        "Authentication required",
        StatusCode::UNAUTHORIZED,
    )
    .context("Failed to deliver 401 response")
}

// ---------------------------------------------------------------------------
// API router
//
// Auth tier is enforced here at the routing level; handlers MUST NOT repeat
// the check.
//
//   .get(...) / .post(...)            → Open: handler gets (req, state)
//   .get_auth(...) / .post_auth(...)  → Authenticated: (req, state, user)
// ---------------------------------------------------------------------------

pub fn build_api_router() -> Router {
    Router::new()
        .get("/health", health::handle_health)
        .post("/register", auth::handle_register)
        .post("/login", auth::handle_login)
        .post_auth("/api/analyze", analysis::handle_analyze)
        .get_auth("/api/stats", analysis::handle_stats)
        .get_auth("/api/logs", analysis::handle_logs)
}
