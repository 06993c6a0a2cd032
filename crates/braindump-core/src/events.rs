use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;

/// Why a keystroke was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    BackwardNavigation,
    Deletion,
}

/// Every state change in the mode produces an Event.
/// Hosts may log or forward them; nothing in the core depends on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    KeyBlocked {
        reason: BlockReason,
        at_ms: Timestamp,
    },
    /// The combined toggle flipped both features.
    ModeToggled {
        guard: bool,
        meter: bool,
        at_ms: Timestamp,
    },
    GuardChanged {
        enabled: bool,
    },
    MeterChanged {
        enabled: bool,
    },
    GoalChanged {
        goal_tpm: f64,
    },
    WindowChanged {
        window_ms: u64,
    },
    RateSampled {
        tpm: f64,
        position: u32,
        at_ms: Timestamp,
    },
    SamplerStopped {
        at_ms: Timestamp,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::KeyBlocked {
            reason: BlockReason::Deletion,
            at_ms: 42,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "key_blocked");
        assert_eq!(json["reason"], "deletion");
        assert_eq!(json["at_ms"], 42);
    }
}
