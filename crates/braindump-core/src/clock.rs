//! Time sources.
//!
//! Everything in the core measures time as [`Timestamp`] milliseconds read
//! through a [`Clock`], so tests and replays can drive time explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

/// Milliseconds since an arbitrary fixed epoch.
pub type Timestamp = u64;

/// Port for reading the current time.
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Wall clock, milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Manually driven clock.
///
/// Clones share the same time value, so a host can hand one clone to the
/// rate meter and keep another to advance it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: Timestamp) -> Self {
        Self {
            current_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.current_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute time. Going backwards is allowed but
    /// breaks the non-decreasing guarantee callers rely on.
    pub fn set(&self, at_ms: Timestamp) {
        self.current_ms.store(at_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.current_ms.load(Ordering::SeqCst)
    }
}
