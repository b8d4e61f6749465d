//! Per-virtual-user token cache
//!
//! Each VU authenticates at most once per run. The first outcome for a VU,
//! token or failure, is kept for the rest of the run; there is no expiry.

use crate::types::{AuthTokens, VuId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Outcome recorded for a VU
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSlot {
    Acquired(AuthTokens),
    Failed,
}

impl TokenSlot {
    pub fn tokens(&self) -> Option<&AuthTokens> {
        match self {
            TokenSlot::Acquired(tokens) => Some(tokens),
            TokenSlot::Failed => None,
        }
    }
}

/// Cache counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to run the auth flow
    pub misses: u64,
    /// Flow runs that produced a token
    pub acquired: u64,
    /// Flow runs that failed
    pub failed: u64,
    /// VUs with a recorded outcome
    pub entries: usize,
}

/// Token cache keyed by VU id
#[derive(Debug, Default)]
pub struct TokenCache {
    slots: RwLock<HashMap<VuId, TokenSlot>>,
    hits: AtomicU64,
    misses: AtomicU64,
    acquired: AtomicU64,
    failed: AtomicU64,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded outcome for a VU, if any
    pub fn slot(&self, vu: VuId) -> Option<TokenSlot> {
        self.slots.read().get(&vu).cloned()
    }

    /// Cached tokens for a VU, without running the flow
    pub fn get(&self, vu: VuId) -> Option<AuthTokens> {
        self.slots.read().get(&vu).and_then(|slot| slot.tokens().cloned())
    }

    /// Return the VU's cached outcome, or run `acquire` once and record it.
    ///
    /// The lock is never held across `acquire`. If two calls for the same VU
    /// race, the first recorded outcome wins and is returned to both.
    pub async fn get_or_acquire<F, Fut>(&self, vu: VuId, acquire: F) -> Option<AuthTokens>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<AuthTokens>>,
    {
        if let Some(slot) = self.slot(vu) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(vu, "Token cache hit");
            return slot.tokens().cloned();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(vu, "Token cache miss, acquiring token");

        let outcome = match acquire().await {
            Some(tokens) => {
                self.acquired.fetch_add(1, Ordering::Relaxed);
                TokenSlot::Acquired(tokens)
            }
            None => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(vu, "No token for VU; dependent requests will be skipped this run");
                TokenSlot::Failed
            }
        };

        let mut slots = self.slots.write();
        slots.entry(vu).or_insert(outcome).tokens().cloned()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TokenCacheStats {
        TokenCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            acquired: self.acquired.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_same_vu_acquires_once() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_acquire(1, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(AuthTokens::new("token-1", None))
            })
            .await;
        let second = cache
            .get_or_acquire(1, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(AuthTokens::new("token-other", None))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second.unwrap().access_token, "token-1");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.acquired, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_vus_are_isolated() {
        let cache = TokenCache::new();

        cache
            .get_or_acquire(1, || async { Some(AuthTokens::new("a", None)) })
            .await;
        cache
            .get_or_acquire(2, || async { Some(AuthTokens::new("b", None)) })
            .await;

        assert_eq!(cache.get(1).unwrap().access_token, "a");
        assert_eq!(cache.get(2).unwrap().access_token, "b");
        assert!(cache.get(3).is_none());
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_terminal_for_the_run() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_acquire(7, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    None
                })
                .await;
            assert!(token.is_none());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.slot(7), Some(TokenSlot::Failed));
        assert_eq!(cache.stats().failed, 1);
        assert_eq!(cache.stats().hits, 2);
    }
}
