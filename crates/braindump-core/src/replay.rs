//! Deterministic keystroke replay.
//!
//! Drives a [`BrainDumpMode`] with a [`ManualClock`] against an in-memory
//! document, ticking the sampler every [`SAMPLE_PERIOD_MS`] of script time.
//!
//! Script format, one step per line:
//!
//! ```text
//! # t_ms key
//! 0    H
//! 120  i
//! 300  Backspace
//! 900  !toggle
//! ```
//!
//! Keys use DOM names (`ArrowLeft`, `Enter`, `Space`, single characters);
//! `!toggle` flips the combined mode.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::clock::{Clock, ManualClock, Timestamp};
use crate::error::ReplayError;
use crate::events::Event;
use crate::guard::{Key, KeyEvent};
use crate::host::{Document, MemoryDocument};
use crate::meter::SAMPLE_PERIOD_MS;
use crate::mode::BrainDumpMode;
use crate::storage::{Config, MemoryStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptAction {
    Key(Key),
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub at_ms: Timestamp,
    pub action: ScriptAction,
}

/// Parse a replay script. Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Fails on the first malformed line or out-of-order timestamp.
pub fn parse_script(src: &str) -> Result<Vec<ScriptStep>, ReplayError> {
    let mut steps = Vec::new();
    let mut previous_ms = 0;

    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (at, key) = trimmed
            .split_once(char::is_whitespace)
            .map(|(at, key)| (at, key.trim()))
            .filter(|(_, key)| !key.is_empty())
            .ok_or_else(|| ReplayError::Malformed {
                line,
                content: trimmed.to_string(),
            })?;
        let at_ms: Timestamp = at.parse().map_err(|_| ReplayError::InvalidTimestamp {
            line,
            value: at.to_string(),
        })?;
        if at_ms < previous_ms {
            return Err(ReplayError::OutOfOrder {
                line,
                at_ms,
                previous_ms,
            });
        }
        previous_ms = at_ms;

        let action = match key {
            "!toggle" => ScriptAction::Toggle,
            name => match name.parse::<Key>() {
                Ok(key) => ScriptAction::Key(key),
                Err(never) => match never {},
            },
        };
        steps.push(ScriptStep { at_ms, action });
    }
    Ok(steps)
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub document: String,
    /// Everything except periodic samples.
    pub events: Vec<Event>,
    pub notices: Vec<String>,
    /// Status text after the final sample.
    pub status: String,
    pub peak_tpm: f64,
    pub samples: usize,
}

/// Replay `steps` against an initially empty document.
pub fn replay(config: Config, steps: &[ScriptStep], seed: u64) -> ReplayReport {
    let clock = ManualClock::new(0);
    let display = Rc::new(RefCell::new(String::new()));
    let notices = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut mode = BrainDumpMode::new(
        Box::new(MemoryStore::with_config(config)),
        clock.clone(),
        Box::new(display.clone()),
        Box::new(notices.clone()),
    )
    .with_rng(StdRng::seed_from_u64(seed));
    let mut sampler = mode.start_sampling();

    let mut doc = MemoryDocument::default();
    let mut events = Vec::new();
    let mut peak_tpm = 0.0_f64;
    let mut samples = 0;

    let mut record = |event: Option<Event>, events: &mut Vec<Event>| match event {
        Some(Event::RateSampled { tpm, .. }) => {
            peak_tpm = peak_tpm.max(tpm);
            samples += 1;
        }
        Some(other) => events.push(other),
        None => {}
    };

    for step in steps {
        let mut now = clock.now_ms();
        while now < step.at_ms {
            now = (now + SAMPLE_PERIOD_MS).min(step.at_ms);
            clock.set(now);
            record(mode.tick(), &mut events);
        }

        match &step.action {
            ScriptAction::Key(key) => {
                let mut event = KeyEvent::new(key.clone());
                record(mode.on_key(&mut event, Some(&mut doc)), &mut events);
                doc.apply(&event);
            }
            ScriptAction::Toggle => {
                let toggled = mode.toggle(Some(&doc as &dyn Document));
                record(Some(toggled), &mut events);
                if mode.config().meter.enabled && !mode.is_sampling() {
                    sampler = mode.start_sampling();
                }
            }
        }
    }
    record(mode.sample(), &mut events);
    let status = display.borrow().clone();
    mode.cancel_sampling(sampler);

    let notices = notices.borrow().clone();
    ReplayReport {
        document: doc.text().to_string(),
        events,
        notices,
        status,
        peak_tpm,
        samples,
    }
}
