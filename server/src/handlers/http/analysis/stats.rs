use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::handlers::http::utils::deliver_serialized_json;

/// `GET /api/stats`
pub async fn handle_stats(
    _req: Request<hyper::body::Incoming>,
    state: AppState,
    user: AuthenticatedUser,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    match state.trust.compute(&user).await {
        Ok(stats) => deliver_serialized_json(&stats, StatusCode::OK),
        Err(e) => ApiError::from(e).into_response(),
    }
}
