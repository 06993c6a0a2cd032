//! # Brain Dump Mode Core Library
//!
//! This library provides the core logic for Brain Dump Mode, a forward-only
//! writing aid for text editors. The editor (the host) stays in charge of
//! rendering, key dispatch and timers; this crate only decides what to do
//! with each keystroke and what to show on every sample tick.
//!
//! ## Architecture
//!
//! - **Content Guard**: A two-state machine that blocks backward navigation
//!   and restores the last snapshot when the user tries to delete text
//! - **Rate Meter**: A sliding-window keystroke counter reporting types per
//!   minute (TPM)
//! - **Progress Track**: A pure mapping from TPM and goal onto a fixed-length
//!   "shark chasing swimmer" bar
//! - **Mode**: The orchestrator that owns both subsystems, the settings and
//!   the sampler. Hosts call it synchronously from their single event loop.
//!
//! ## Key Components
//!
//! - [`BrainDumpMode`]: Orchestrator, keystroke and tick entry points
//! - [`ContentGuard`]: Snapshot/restore state machine
//! - [`RateMeter`]: Sliding-window rate computation
//! - [`render`]: Progress position and label
//! - [`Config`]: TOML-backed settings
//! - [`replay()`]: Deterministic keystroke replay against an in-memory document

pub mod clock;
pub mod error;
pub mod events;
pub mod guard;
pub mod host;
pub mod meter;
pub mod mode;
pub mod replay;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use error::{ConfigError, CoreError, ReplayError};
pub use events::{BlockReason, Event};
pub use guard::{pick_message, ContentGuard, GuardState, Key, KeyEvent, BLOCKED_MESSAGES};
pub use host::{DisplaySink, Document, MemoryDocument, Notifier, NullSink};
pub use meter::{render, render_track, reset_view, IntervalSampler, Progress, RateMeter, TRACK_LENGTH};
pub use mode::{BrainDumpMode, SamplerHandle};
pub use replay::{parse_script, replay, ReplayReport, ScriptAction, ScriptStep};
pub use storage::{Config, FileStore, MemoryStore, SettingsStore};
