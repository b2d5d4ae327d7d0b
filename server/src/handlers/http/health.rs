use std::convert::Infallible;
use std::time::SystemTime;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;

use crate::AppState;
use crate::handlers::http::utils::deliver_serialized_json;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub health: &'static str,
    /// RFC 7231 date of the response.
    pub time: String,
    pub uptime_secs: u64,
}

/// `GET /health`.  Liveness only; does not check the store or the scoring
/// service.
pub async fn handle_health(
    _req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let body = HealthResponse {
        status: "success",
        health: "ok",
        time: httpdate::fmt_http_date(SystemTime::now()),
        uptime_secs: state.started_at.elapsed().as_secs(),
    };
    deliver_serialized_json(&body, StatusCode::OK)
}
