//! Fixed-period sampler polled by the host's event loop.

use crate::clock::Timestamp;

pub const SAMPLE_PERIOD_MS: u64 = 100;

/// Reports when a sample tick is due. Does not own a thread; the host calls
/// [`poll`](Self::poll) from its timer callback.
///
/// Missed ticks are skipped rather than replayed in a burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSampler {
    period_ms: u64,
    next_due_ms: Timestamp,
}

impl IntervalSampler {
    pub fn start(now_ms: Timestamp, period_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> Timestamp {
        self.next_due_ms
    }

    /// Returns true when at least one period elapsed since the last tick.
    pub fn poll(&mut self, now_ms: Timestamp) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        let missed = (now_ms - self.next_due_ms) / self.period_ms;
        self.next_due_ms += (missed + 1) * self.period_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let mut sampler = IntervalSampler::start(0, SAMPLE_PERIOD_MS);
        assert!(!sampler.poll(50));
        assert!(sampler.poll(100));
        assert!(!sampler.poll(150));
        assert!(sampler.poll(210));
        assert_eq!(sampler.next_due_ms(), 300);
    }

    #[test]
    fn missed_ticks_are_skipped() {
        let mut sampler = IntervalSampler::start(0, SAMPLE_PERIOD_MS);
        assert!(sampler.poll(1_050));
        assert_eq!(sampler.next_due_ms(), 1_100);
        assert!(!sampler.poll(1_099));
    }
}
