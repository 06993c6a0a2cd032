mod progress;
mod rate;
mod sampler;

pub use progress::{render, render_track, reset_view, Progress, TRACK_LENGTH};
pub use rate::{RateMeter, DEFAULT_WINDOW_MS, MINUTE_MS};
pub use sampler::{IntervalSampler, SAMPLE_PERIOD_MS};
