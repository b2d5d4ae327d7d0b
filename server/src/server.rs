use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::body::Incoming;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::{Method, Request, Response};
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::AppState;
use crate::handlers::http::utils::internal_error_response;
use crate::handlers::http::{Router, build_api_router};
use crate::tower_middle::TimeoutLayer;

/// Browser clients (extension, dashboard) call from arbitrary origins.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// Accept connections on `listener` forever, one task per connection.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let router = Arc::new(build_api_router());
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let local = listener
        .local_addr()
        .context("Listener has no local address")?;
    info!("Listening on http://{}", local);

    loop {
        let (stream, remote) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        let io = TokioIo::new(stream);

        let router = router.clone();
        let state = state.clone();
        let service = ServiceBuilder::new()
            .layer(cors_layer())
            .layer(TimeoutLayer::new(timeout))
            .service_fn(move |req: Request<Incoming>| {
                dispatch(router.clone(), state.clone(), req)
            });

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, TowerToHyperService::new(service))
                .await
            {
                debug!(%remote, "Error serving connection: {:?}", err);
            }
        });
    }
}

/// Route one request inside its own span.  Handler plumbing failures become
/// a generic 500 here.
async fn dispatch(
    router: Arc<Router>,
    state: AppState,
    req: Request<Incoming>,
) -> Result<Response<BoxBody<Bytes, Infallible>>, Infallible> {
    let span = info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let response = match router.route(req, state).await {
            Ok(response) => response,
            Err(e) => {
                error!("Request handling failed: {:#}", e);
                internal_error_response()
            }
        };
        debug!(status = response.status().as_u16(), "Request complete");
        Ok(response)
    }
    .instrument(span)
    .await
}
