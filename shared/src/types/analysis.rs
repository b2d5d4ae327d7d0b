use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Public analysis contract (what the browser extension speaks)
// ---------------------------------------------------------------------------

/// Page submitted by the extension for phishing analysis.
///
/// `metadata` is accepted for forward compatibility (page title, element
/// counts, client timestamp, ...) but never leaves the gateway: the scoring
/// service has no slot for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
    pub dom_content: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, Value>>,
}

/// Verdict returned to the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub is_spoof: bool,
    pub confidence_score: f64,
    pub threat_level: String,
    /// Always serialized, empty when the scoring service reports nothing.
    #[serde(default)]
    pub anomalies: Vec<String>,
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// One completed analysis, as stored and as returned by `GET /api/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub user_id: i64,
    pub url: String,
    pub is_spoof: bool,
    pub confidence_score: f64,
    pub threat_level: String,
    /// Unix timestamp, seconds.
    pub timestamp: i64,
}

/// Per-user summary returned by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustStats {
    pub scanned: i64,
    pub blocked: i64,
    /// Percentage in `[0, 100]`; 100 when nothing has been scanned yet.
    pub trust_score: f64,
}
