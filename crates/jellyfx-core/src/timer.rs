#![forbid(unsafe_code)]

//! One-shot deferred timers on a tick-driven clock.
//!
//! There are no threads here. A [`TimerQueue`] keeps its own monotonic clock
//! that only moves when the owner calls [`advance`](TimerQueue::advance); the
//! owner then drains [`pop_due`](TimerQueue::pop_due) and handles each fired
//! timer itself.
//!
//! # Invariants
//!
//! 1. A cancelled token never fires.
//! 2. Due timers pop in deadline order; ties pop in scheduling order.
//! 3. Each token fires at most once.

use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Entry<K> {
    token: TimerToken,
    kind: K,
    deadline: Duration,
}

/// Pending one-shot timers keyed by a small kind enum.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    pending: Vec<Entry<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::with_capacity(2),
        }
    }

    /// Schedule `kind` to fire `delay` from now.
    pub fn schedule(&mut self, kind: K, delay: Duration) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Entry {
            token,
            kind,
            deadline: self.now.saturating_add(delay),
        });
        token
    }

    /// Cancel a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|e| e.token != token);
        self.pending.len() != before
    }

    /// Cancel an optional token held by the owner, clearing it.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerToken>) {
        if let Some(token) = slot.take() {
            self.cancel(token);
        }
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|e| e.token == token)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Remove and return the earliest timer whose deadline has passed.
    pub fn pop_due(&mut self) -> Option<(TimerToken, K)> {
        let now = self.now;
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.token.0))
            .map(|(i, _)| i)?;
        let entry = self.pending.remove(idx);
        Some((entry.token, entry.kind))
    }
}
