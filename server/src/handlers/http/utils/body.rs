use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::Request;
use hyper::body::Body;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// Collect a request body of at most `limit` bytes and parse it as JSON.
/// Oversized, unreadable and unparseable bodies are all validation errors.
pub async fn read_json<T, B>(req: Request<B>, limit: usize) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let bytes = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| {
            warn!("Failed to read request body: {}", e);
            ApiError::Validation(format!("Request body unreadable or larger than {} bytes", limit))
        })?
        .to_bytes();

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!("Failed to parse JSON body: {}", e);
        ApiError::Validation(format!("Invalid JSON body: {}", e))
    })
}
