use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};

use shared::types::AnalysisRequest;

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::handlers::http::utils::{deliver_serialized_json, read_json};

/// `POST /api/analyze`
pub async fn handle_analyze(
    req: Request<hyper::body::Incoming>,
    state: AppState,
    user: AuthenticatedUser,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let limit = state.config.server.max_body_bytes;
    let analysis: AnalysisRequest = match read_json(req, limit).await {
        Ok(analysis) => analysis,
        Err(e) => return e.into_response(),
    };

    match state.gateway.analyze(user, analysis).await {
        Ok(verdict) => deliver_serialized_json(&verdict, StatusCode::OK),
        Err(e) => e.into_response(),
    }
}
