use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared::types::{AnalysisRequest, AnalysisResponse};

/// The verdict string the peer uses for a phishing page.  Matched exactly.
pub const PHISHING_VERDICT: &str = "Phishing";

/// Body POSTed to the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerRequest {
    pub url: String,
    pub html: String,
}

/// Reply from the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub verdict: String,
    pub phishing_probability: f64,

    /// Feature vector the model looked at.  Carried for logging only.
    #[serde(default)]
    pub analyzed_features: Value,
}

/// Public request to peer request.  `metadata` has no peer counterpart and is
/// dropped.
pub fn translate(req: &AnalysisRequest) -> PeerRequest {
    PeerRequest {
        url: req.url.clone(),
        html: req.dom_content.clone(),
    }
}

/// Peer reply to public response.  The probability is passed through as-is;
/// the peer reports no anomalies, so the list is always empty.
pub fn translate_back(reply: PeerResponse) -> AnalysisResponse {
    AnalysisResponse {
        is_spoof: reply.verdict == PHISHING_VERDICT,
        confidence_score: reply.phishing_probability,
        threat_level: reply.verdict,
        anomalies: Vec::new(),
    }
}
