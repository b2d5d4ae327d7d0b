//! Authenticated phishing-analysis gateway.
//!
//! Browser clients register, log in for a bearer token, and submit page
//! content to `/api/analyze`.  The gateway forwards it to a scoring service,
//! records the verdict per user, and serves the history and a trust score
//! back out of `/api/logs` and `/api/stats`.

pub mod auth;
pub mod database;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod scoring;
pub mod server;
pub mod tower_middle;
pub mod trust;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use shared::types::server_config::AppConfig;

use crate::auth::SessionTokenCodec;
use crate::database::CredentialStore;
use crate::gateway::AnalysisGateway;
use crate::scoring::ScoringPeer;
use crate::trust::TrustMetrics;

/// Everything a handler can reach.  Cheap to clone; all fields are shared
/// read-only handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<SessionTokenCodec>,
    pub store: Arc<dyn CredentialStore>,
    pub gateway: Arc<AnalysisGateway>,
    pub trust: Arc<TrustMetrics>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire components together.  Fails if no signing secret is configured.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        peer: Arc<dyn ScoringPeer>,
    ) -> Result<Self> {
        let secret = config
            .auth
            .resolved_jwt_secret()
            .context("No JWT secret configured (set auth.jwt_secret or JWT_SECRET)")?;

        let tokens = SessionTokenCodec::new(
            &secret,
            Duration::from_secs(config.auth.token_expiry_secs()),
        )
        .context("Failed to construct session token codec")?;

        database::utils::decoy_password_hash()
            .context("Failed to build the login decoy hash")?;

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            gateway: Arc::new(AnalysisGateway::new(store.clone(), peer)),
            trust: Arc::new(TrustMetrics::new(store.clone())),
            store,
            started_at: Instant::now(),
        })
    }
}
