use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::debug;

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::handlers::http::utils::deliver_serialized_json;

/// Largest page `/api/logs` will return in one call.
pub const MAX_LOG_LIMIT: u32 = 1000;

/// `GET /api/logs[?limit=N]`: the caller's scans, newest first.
pub async fn handle_logs(
    req: Request<hyper::body::Incoming>,
    state: AppState,
    user: AuthenticatedUser,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let limit = match parse_limit(req.uri().query()) {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };

    match state.store.list_scans(user.id(), limit).await {
        Ok(scans) => {
            debug!(user_id = user.id(), count = scans.len(), "Delivering scan log");
            deliver_serialized_json(&scans, StatusCode::OK)
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// `limit` from the query string.  Absent means no limit; anything outside
/// `1..=MAX_LOG_LIMIT` is rejected.
pub fn parse_limit(query: Option<&str>) -> Result<Option<u32>, ApiError> {
    let Some(raw) = query.and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| *k == "limit")
            .map(|(_, v)| v.into_owned())
    }) else {
        return Ok(None);
    };

    match raw.parse::<u32>() {
        Ok(n) if (1..=MAX_LOG_LIMIT).contains(&n) => Ok(Some(n)),
        _ => Err(ApiError::Validation(format!(
            "limit must be an integer between 1 and {}",
            MAX_LOG_LIMIT
        ))),
    }
}
