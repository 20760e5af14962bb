//! Background sweep of expired challenges.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::auth::AuthService;

/// Purge expired challenges every `period`, forever.
pub async fn run_cleanup_loop(service: Arc<AuthService>, period: Duration) {
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;
        let purged = service.store().purge_expired();
        if purged > 0 {
            debug!(purged, remaining = service.store().len(), "expired challenges removed");
        }
    }
}
