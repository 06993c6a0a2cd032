//! Progress track rendering.
//!
//! Maps a typing rate and a goal onto a fixed-length track. The status bar
//! shows it as a shark chasing a swimmer: the further the swimmer is ahead,
//! the closer the rate is to the goal.

use serde::{Deserialize, Serialize};

pub const TRACK_LENGTH: u32 = 10;

const SHARK: &str = "🦈";
const SWIMMER: &str = "🏊‍♂️";
const CAUGHT: &str = "🩸";
const WAVE: &str = "~";

/// Discrete position on the track plus a textual label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// 0..=TRACK_LENGTH
    pub position: u32,
    pub label: String,
    /// Position 0: the shark caught the swimmer.
    pub exhausted: bool,
}

/// Map `(rate, goal)` onto the track.
///
/// Above 100% of the goal the position saturates at [`TRACK_LENGTH`];
/// otherwise it is the goal fraction scaled to the track, rounded. A goal
/// that is not strictly positive renders at rest.
pub fn render(rate: f64, goal: f64) -> Progress {
    let position = if goal > 0.0 && rate > 0.0 {
        let percentage = rate / goal * 100.0;
        if percentage > 100.0 {
            TRACK_LENGTH
        } else {
            ((percentage / 100.0) * f64::from(TRACK_LENGTH)).round() as u32
        }
    } else {
        0
    };
    let position = position.min(TRACK_LENGTH);

    Progress {
        position,
        label: format!("{rate} types/min (goal {goal})"),
        exhausted: position == 0,
    }
}

/// Full status-bar text for a rendered progress value.
pub fn render_track(progress: &Progress) -> String {
    let swimmer = if progress.exhausted { CAUGHT } else { SWIMMER };
    let ahead = WAVE.repeat(progress.position as usize);
    let behind = WAVE.repeat((TRACK_LENGTH - progress.position) as usize);
    format!("{swimmer}{ahead}{SHARK}{behind}: {}", progress.label)
}

/// Neutral text shown when tracking is off or sampling stopped.
pub fn reset_view() -> String {
    format!("🏊{}|{SHARK}: 0 types/min", WAVE.repeat(TRACK_LENGTH as usize))
}
