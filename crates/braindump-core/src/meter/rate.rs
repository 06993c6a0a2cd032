//! Sliding-window typing-rate meter.
//!
//! Keystroke timestamps are appended in arrival order and trimmed from the
//! front whenever the rate is queried. The rate is the surviving count
//! scaled from the window up to one minute.

use std::collections::VecDeque;

use crate::clock::{Clock, SystemClock, Timestamp};

pub const MINUTE_MS: u64 = 60_000;
pub const DEFAULT_WINDOW_MS: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct RateMeter<C: Clock = SystemClock> {
    events: VecDeque<Timestamp>,
    window_ms: u64,
    clock: C,
}

impl RateMeter<SystemClock> {
    pub fn new(window_ms: u64) -> Self {
        Self::with_clock(window_ms, SystemClock)
    }
}

impl<C: Clock> RateMeter<C> {
    /// Create a meter reading time from `clock`.
    ///
    /// A zero window falls back to [`DEFAULT_WINDOW_MS`].
    pub fn with_clock(window_ms: u64, clock: C) -> Self {
        Self {
            events: VecDeque::new(),
            window_ms: if window_ms == 0 { DEFAULT_WINDOW_MS } else { window_ms },
            clock,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn now_ms(&self) -> Timestamp {
        self.clock.now_ms()
    }

    /// Number of retained timestamps, including any that are already stale.
    pub fn retained(&self) -> usize {
        self.events.len()
    }

    /// Record one event at the current time.
    pub fn record_event(&mut self) {
        let now = self.clock.now_ms();
        self.record_event_at(now);
    }

    /// Record one event at a host-supplied time.
    pub fn record_event_at(&mut self, at_ms: Timestamp) {
        self.events.push_back(at_ms);
    }

    /// Prune stale events, then return events per minute.
    ///
    /// An event survives while `at > now - window`. Events arrive in
    /// non-decreasing order, so trimming the front is enough.
    pub fn current_rate(&mut self) -> f64 {
        let now = self.clock.now_ms();
        let window = self.window_ms;
        while let Some(&oldest) = self.events.front() {
            if oldest.saturating_add(window) > now {
                break;
            }
            self.events.pop_front();
        }
        self.events.len() as f64 * (MINUTE_MS as f64 / window as f64)
    }

    /// Replace the window for subsequent queries. Nothing is pruned until
    /// the next [`current_rate`](Self::current_rate). A zero window is
    /// ignored.
    pub fn set_window(&mut self, window_ms: u64) {
        if window_ms == 0 {
            tracing::warn!("ignoring zero rate window");
            return;
        }
        tracing::debug!(from = self.window_ms, to = window_ms, "rate window changed");
        self.window_ms = window_ms;
    }
}
