//! Keyed debouncing for slider-like inputs.
//!
//! Rapid updates to the same key collapse into one: a value settles once no
//! newer value for its key has arrived for the configured delay, and the last
//! value pushed always wins.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<K, V> {
    key: K,
    value: V,
    updated: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer<K, V> {
    delay: Duration,
    pending: Vec<Pending<K, V>>,
}

impl<K: PartialEq, V> Debouncer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
        }
    }

    /// Record `value` for `key`, replacing any unsettled value and restarting its timer
    pub fn push(&mut self, key: K, value: V, now: Instant) {
        match self.pending.iter_mut().find(|p| p.key == key) {
            Some(pending) => {
                pending.value = value;
                pending.updated = now;
            }
            None => self.pending.push(Pending {
                key,
                value,
                updated: now,
            }),
        }
    }

    /// Peek at the unsettled value for `key`
    pub fn pending(&self, key: &K) -> Option<&V> {
        self.pending.iter().find(|p| &p.key == key).map(|p| &p.value)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every value that has settled by `now`, oldest key first
    pub fn poll(&mut self, now: Instant) -> Vec<(K, V)> {
        let delay = self.delay;
        let (settled, waiting) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition::<Vec<_>, _>(|p| now.saturating_duration_since(p.updated) >= delay);
        self.pending = waiting;
        settled.into_iter().map(|p| (p.key, p.value)).collect()
    }

    /// Time until the next value settles, `None` when nothing is pending
    pub fn time_until_settled(&self, now: Instant) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| self.delay.saturating_sub(now.saturating_duration_since(p.updated)))
            .min()
    }

    /// Settle everything immediately
    pub fn flush(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect()
    }
}
