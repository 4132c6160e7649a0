//! Process-wide registry of revoked token identifiers.
//!
//! Entries remember when their token would have expired anyway; once that
//! moment passes the signature check alone rejects the token, so the entry can
//! be swept.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default interval between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Concurrent set of revoked `jti`s keyed to their token expiry.
///
/// Construct once at startup and share through an `Arc`.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    revoked: DashMap<String, DateTime<Utc>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self {
            revoked: DashMap::new(),
        }
    }

    /// Revoke a token identifier. Idempotent; keeps the later expiry.
    pub fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) {
        self.revoked
            .entry(jti.to_string())
            .and_modify(|existing| {
                if expires_at > *existing {
                    *existing = expires_at;
                }
            })
            .or_insert(expires_at);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }

    /// Drop entries whose token has expired as of `now`. Returns the number
    /// of entries removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.revoked.len())
    }

    /// Spawn a periodic sweep on the current tokio runtime. Stops when
    /// `cancel` fires.
    pub fn spawn_sweep_task(
        self: &Arc<Self>,
        every: Duration,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let removed = registry.sweep(Utc::now());
                        if removed > 0 {
                            debug!(removed, remaining = registry.len(), "swept expired revocations");
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn revoke_is_visible_immediately() {
        let registry = RevocationRegistry::new();
        assert!(!registry.is_revoked("a"));
        registry.revoke("a", Utc::now() + ChronoDuration::minutes(5));
        assert!(registry.is_revoked("a"));
        assert!(!registry.is_revoked("b"));
    }

    #[test]
    fn revoke_is_idempotent_and_keeps_later_expiry() {
        let registry = RevocationRegistry::new();
        let now = Utc::now();
        registry.revoke("a", now + ChronoDuration::minutes(10));
        registry.revoke("a", now + ChronoDuration::minutes(1));
        assert_eq!(registry.len(), 1);

        // Still present after the earlier expiry passes.
        assert_eq!(registry.sweep(now + ChronoDuration::minutes(2)), 0);
        assert!(registry.is_revoked("a"));
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let registry = RevocationRegistry::new();
        let now = Utc::now();
        registry.revoke("old", now - ChronoDuration::seconds(1));
        registry.revoke("live", now + ChronoDuration::minutes(5));

        assert_eq!(registry.sweep(now), 1);
        assert!(!registry.is_revoked("old"));
        assert!(registry.is_revoked("live"));
    }

    #[test]
    fn concurrent_revocations_are_never_lost() {
        let registry = Arc::new(RevocationRegistry::new());
        let expires_at = Utc::now() + ChronoDuration::minutes(5);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        let jti = format!("{t}-{i}");
                        registry.revoke(&jti, expires_at);
                        assert!(registry.is_revoked(&jti));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(registry.len(), 8 * 250);
        for t in 0..8 {
            for i in 0..250 {
                assert!(registry.is_revoked(&format!("{t}-{i}")));
            }
        }
    }

    #[tokio::test]
    async fn sweep_task_stops_on_cancel() {
        let registry = Arc::new(RevocationRegistry::new());
        registry.revoke("old", Utc::now() - ChronoDuration::seconds(1));

        let cancel = CancellationToken::new();
        let handle = registry.spawn_sweep_task(Duration::from_millis(10), cancel.clone());

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(registry.is_empty());

        cancel.cancel();
        handle.await.unwrap();
    }
}
