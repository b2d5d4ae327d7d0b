use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use shared::types::server_config::ScoringConfig;

use crate::scoring::adapter::{PeerRequest, PeerResponse};

/// Every variant means the same thing to callers: no answer was obtained.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scoring service timed out")]
    Timeout,

    #[error("scoring service unreachable: {0}")]
    Transport(String),

    #[error("scoring service answered with status {0}")]
    Status(u16),

    #[error("scoring service reply could not be parsed: {0}")]
    MalformedReply(String),
}

impl From<reqwest::Error> for ScoringError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScoringError::Timeout
        } else if err.is_decode() {
            ScoringError::MalformedReply(err.to_string())
        } else {
            ScoringError::Transport(err.to_string())
        }
    }
}

/// A scoring backend.  Implementations make exactly one attempt per call.
#[async_trait]
pub trait ScoringPeer: Send + Sync {
    async fn invoke(&self, req: PeerRequest) -> Result<PeerResponse, ScoringError>;
}

/// Scoring service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpScoringPeer {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpScoringPeer {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("sentinel-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScoringError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringPeer for HttpScoringPeer {
    async fn invoke(&self, req: PeerRequest) -> Result<PeerResponse, ScoringError> {
        debug!(endpoint = %self.endpoint, url = %req.url, "Calling scoring service");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "Scoring request failed");
                ScoringError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Scoring service rejected request");
            return Err(ScoringError::Status(status.as_u16()));
        }

        let reply = response.json::<PeerResponse>().await.map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "Scoring reply unreadable");
            ScoringError::from(e)
        })?;

        debug!(
            verdict = %reply.verdict,
            probability = reply.phishing_probability,
            features = %reply.analyzed_features,
            "Scoring service replied"
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_config() {
        let peer = HttpScoringPeer::new(&ScoringConfig::default()).unwrap();
        assert_eq!(peer.endpoint(), ScoringConfig::default().endpoint);
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ScoringConfig {
            endpoint: format!("http://127.0.0.1:{}/analyze", port),
            timeout_ms: 2_000,
            connect_timeout_ms: 500,
        };
        let peer = HttpScoringPeer::new(&config).unwrap();
        let err = peer
            .invoke(PeerRequest {
                url: "https://x.test".to_string(),
                html: "<p>".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ScoringError::Transport(_) | ScoringError::Timeout));
    }
}
