//! In-memory challenge bookkeeping.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::crypto::challenge::Challenge;

/// Decides whether an outstanding challenge is too old to be used
pub trait ExpiryPolicy: Send + Sync {
    fn is_expired(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool;
}

/// Challenges stay valid until consumed or overwritten.
///
/// With this policy the store grows by one entry per client that requests a
/// challenge and never authenticates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverExpire;

impl ExpiryPolicy for NeverExpire {
    fn is_expired(&self, _issued_at: DateTime<Utc>, _now: DateTime<Utc>) -> bool {
        false
    }
}

/// Challenges expire once they are older than the given age
#[derive(Clone, Copy, Debug)]
pub struct MaxAge(pub Duration);

impl ExpiryPolicy for MaxAge {
    fn is_expired(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - issued_at >= self.0
    }
}

/// A challenge together with the time it was handed out
#[derive(Clone, Debug)]
pub struct IssuedChallenge {
    pub challenge: Challenge,
    pub issued_at: DateTime<Utc>,
}

/// Outstanding challenges keyed by client id
///
/// Safe to share between request handlers; all synchronisation is internal.
/// At most one challenge is outstanding per client: issuing a new one replaces
/// the previous.
pub struct ChallengeStore {
    entries: DashMap<String, IssuedChallenge>,
    expiry: Box<dyn ExpiryPolicy>,
}

impl ChallengeStore {
    /// Create an empty store whose challenges never expire
    pub fn new() -> Self {
        Self::with_expiry(NeverExpire)
    }

    pub fn with_expiry(policy: impl ExpiryPolicy + 'static) -> Self {
        Self {
            entries: DashMap::new(),
            expiry: Box::new(policy),
        }
    }

    /// Generate a challenge for `client_id`, replacing any outstanding one
    pub fn issue(&self, client_id: &str) -> Challenge {
        let challenge = Challenge::generate();
        self.entries.insert(
            client_id.to_string(),
            IssuedChallenge {
                challenge,
                issued_at: Utc::now(),
            },
        );
        challenge
    }

    /// Outstanding challenge for `client_id`, if any and not expired
    pub fn lookup(&self, client_id: &str) -> Option<Challenge> {
        let entry = self.entries.get(client_id)?;
        if self.expiry.is_expired(entry.issued_at, Utc::now()) {
            return None;
        }
        Some(entry.challenge)
    }

    /// Remove the outstanding challenge for `client_id`
    ///
    /// Returns whether an entry was removed.
    pub fn consume(&self, client_id: &str) -> bool {
        self.entries.remove(client_id).is_some()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut purged = 0;
        self.entries.retain(|_, issued| {
            let expired = self.expiry.is_expired(issued.issued_at, now);
            if expired {
                purged += 1;
            }
            !expired
        });
        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}
