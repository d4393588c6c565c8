//! Per-actor sliding-window rate limiting.
//!
//! An explicit, injected component rather than module-level state: the
//! engine owns one instance per process, and a multi-process deployment can
//! swap in an implementation backed by a shared store behind the same call
//! shape. Timestamps are passed in by the caller, so behavior is fully
//! deterministic under test.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use duskmire_types::ActorId;

use crate::config::RateLimitParams;
use crate::error::EngineError;

/// Sliding-window counter keyed by actor.
///
/// An acquisition succeeds while fewer than `max_attempts` acquisitions
/// happened within the trailing window, then records itself. Interior
/// locking makes one instance shareable across concurrent request handlers.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    window: Duration,
    max_attempts: u32,
    log: Mutex<BTreeMap<ActorId, VecDeque<DateTime<Utc>>>>,
}

impl SlidingWindowLimiter {
    /// Build a limiter from tuning parameters.
    pub fn new(params: &RateLimitParams) -> Self {
        Self {
            window: Duration::seconds(params.window_secs),
            max_attempts: params.max_attempts,
            log: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ActorId, VecDeque<DateTime<Utc>>>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Try to record one acquisition for `actor` at `now`.
    ///
    /// Entries older than the trailing window are pruned first; if the
    /// remaining count has reached the limit, the acquisition is rejected
    /// and not recorded.
    pub fn acquire(&self, actor: ActorId, now: DateTime<Utc>) -> Result<(), EngineError> {
        let cutoff = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let limit = usize::try_from(self.max_attempts).unwrap_or(usize::MAX);

        let mut log = self.lock();
        let entries = log.entry(actor).or_default();
        while entries.front().is_some_and(|at| *at <= cutoff) {
            entries.pop_front();
        }
        if entries.len() >= limit {
            return Err(EngineError::RateLimited { actor });
        }
        entries.push_back(now);
        Ok(())
    }
}
