//! Per-request analysis pipeline.
//!
//! `Received -> AuthVerified -> Translated -> PeerCalled -> Persisted ->
//! Responded`, with an early exit at any step.  Nothing is retried.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use shared::types::{AnalysisRequest, AnalysisResponse};

use crate::auth::AuthenticatedUser;
use crate::database::utils::get_timestamp;
use crate::database::{CredentialStore, NewScan};
use crate::error::ApiError;
use crate::scoring::{ScoringPeer, translate, translate_back};

pub struct AnalysisGateway {
    store: Arc<dyn CredentialStore>,
    peer: Arc<dyn ScoringPeer>,
}

impl AnalysisGateway {
    pub fn new(store: Arc<dyn CredentialStore>, peer: Arc<dyn ScoringPeer>) -> Self {
        Self { store, peer }
    }

    /// Score one page for `user` and record the verdict.
    ///
    /// A peer failure writes nothing.  A verdict that cannot be recorded is
    /// logged in full and reported as [`ApiError::VerdictNotRecorded`].
    pub async fn analyze(
        &self,
        user: AuthenticatedUser,
        req: AnalysisRequest,
    ) -> Result<AnalysisResponse, ApiError> {
        debug!(user_id = user.id(), "analysis: auth verified");

        validate_request(&req)?;

        let peer_req = translate(&req);
        debug!(user_id = user.id(), url = %peer_req.url, html_bytes = peer_req.html.len(), "analysis: translated");

        let reply = self.peer.invoke(peer_req).await.map_err(|e| {
            warn!(user_id = user.id(), url = %req.url, error = %e, "analysis: peer unavailable");
            ApiError::PeerUnavailable(e)
        })?;
        debug!(user_id = user.id(), verdict = %reply.verdict, "analysis: peer called");

        let verdict = translate_back(reply);

        let scan = NewScan {
            user_id: user.id(),
            url: req.url,
            is_spoof: verdict.is_spoof,
            confidence_score: verdict.confidence_score,
            threat_level: verdict.threat_level.clone(),
            timestamp: get_timestamp(),
        };

        match self.store.insert_scan(scan.clone()).await {
            Ok(scan_id) => {
                debug!(user_id = user.id(), scan_id, "analysis: persisted");
            }
            Err(e) => {
                error!(
                    user_id = scan.user_id,
                    url = %scan.url,
                    is_spoof = scan.is_spoof,
                    confidence_score = scan.confidence_score,
                    threat_level = %scan.threat_level,
                    timestamp = scan.timestamp,
                    error = %e,
                    "Verdict computed but scan record was not written"
                );
                return Err(ApiError::VerdictNotRecorded(e));
            }
        }

        info!(
            user_id = user.id(),
            url = %scan.url,
            is_spoof = verdict.is_spoof,
            threat_level = %verdict.threat_level,
            "Analysis complete"
        );

        Ok(verdict)
    }
}

fn validate_request(req: &AnalysisRequest) -> Result<(), ApiError> {
    if req.url.trim().is_empty() {
        return Err(ApiError::Validation("Missing required field: url".to_string()));
    }
    if req.dom_content.trim().is_empty() {
        return Err(ApiError::Validation(
            "Missing required field: dom_content".to_string(),
        ));
    }
    Ok(())
}
