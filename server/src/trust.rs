//! Per-user trust metrics derived from scan history.

use std::sync::Arc;

use tracing::{debug, warn};

use shared::types::TrustStats;

use crate::auth::AuthenticatedUser;
use crate::database::{CredentialStore, StoreError};

/// Score for a user with no history.
pub const PERFECT_TRUST: f64 = 100.0;

/// `100 - blocked/scanned * 100`, clamped to `[0, 100]`.  A user with no
/// scans scores [`PERFECT_TRUST`].
pub fn trust_score(scanned: i64, blocked: i64) -> f64 {
    if scanned <= 0 {
        return PERFECT_TRUST;
    }
    debug_assert!((0..=scanned).contains(&blocked));

    let score = PERFECT_TRUST - (blocked as f64 * 100.0) / scanned as f64;
    score.clamp(0.0, PERFECT_TRUST)
}

pub struct TrustMetrics {
    store: Arc<dyn CredentialStore>,
}

impl TrustMetrics {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Two independent counts; a write landing between them can make
    /// `blocked` momentarily exceed `scanned`, which is clamped.
    pub async fn compute(&self, user: &AuthenticatedUser) -> Result<TrustStats, StoreError> {
        let scanned = self.store.count_scans(user.id()).await?;
        let mut blocked = self.store.count_blocked(user.id()).await?;

        if blocked > scanned {
            warn!(
                user_id = user.id(),
                scanned, blocked, "Blocked count exceeds scanned count; clamping"
            );
            blocked = scanned;
        }
        let blocked = blocked.max(0);

        let stats = TrustStats {
            scanned,
            blocked,
            trust_score: trust_score(scanned, blocked),
        };
        debug!(user_id = user.id(), ?stats, "Trust metrics computed");

        Ok(stats)
    }
}
