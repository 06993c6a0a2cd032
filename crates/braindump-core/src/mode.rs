//! Brain Dump Mode orchestrator.
//!
//! Owns the settings, the content guard, the rate meter and the sampler,
//! and is driven synchronously from the host's single event loop:
//!
//! ```ignore
//! let mut mode = BrainDumpMode::new(store, SystemClock, display, notifier);
//! let sampler = mode.start_sampling();
//! // keydown callback:
//! mode.on_key(&mut event, editor.active_document());
//! // timer callback, every few ms:
//! mode.tick();
//! // unload:
//! mode.cancel_sampling(sampler);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::events::Event;
use crate::guard::{pick_message, ContentGuard, KeyEvent, BLOCKED_MESSAGES};
use crate::host::{DisplaySink, Document, Notifier};
use crate::meter::{render, render_track, reset_view, IntervalSampler, RateMeter, SAMPLE_PERIOD_MS};
use crate::storage::{Config, SettingsStore};

/// Registration handle for the periodic sampler.
///
/// Pass it back to [`BrainDumpMode::cancel_sampling`] to stop sampling.
/// A handle from an earlier registration cancels nothing.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the sampler running"]
pub struct SamplerHandle {
    id: u64,
}

pub struct BrainDumpMode<C: Clock = SystemClock> {
    config: Config,
    store: Box<dyn SettingsStore>,
    guard: ContentGuard,
    meter: RateMeter<C>,
    sampler: Option<(u64, IntervalSampler)>,
    next_sampler_id: u64,
    display: Box<dyn DisplaySink>,
    notifier: Box<dyn Notifier>,
    rng: StdRng,
}

impl<C: Clock> BrainDumpMode<C> {
    /// Load settings from `store` and build both subsystems from them.
    ///
    /// A guard enabled in the settings starts locked without a snapshot;
    /// the first keystroke on a document takes one.
    pub fn new(
        store: Box<dyn SettingsStore>,
        clock: C,
        display: Box<dyn DisplaySink>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let config = store.load();
        let mut guard = ContentGuard::new();
        if config.guard.enabled {
            guard.lock(None);
        }
        let meter = RateMeter::with_clock(config.meter.window_ms, clock);
        tracing::info!(
            guard = config.guard.enabled,
            meter = config.meter.enabled,
            goal_tpm = config.meter.goal_tpm,
            window_ms = config.meter.window_ms,
            "brain dump mode loaded"
        );
        Self {
            config,
            store,
            guard,
            meter,
            sampler: None,
            next_sampler_id: 0,
            display,
            notifier,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the notice RNG, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn guard(&self) -> &ContentGuard {
        &self.guard
    }

    pub fn meter(&self) -> &RateMeter<C> {
        &self.meter
    }

    /// Both features on.
    pub fn is_active(&self) -> bool {
        self.config.guard.enabled && self.config.meter.enabled
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }

    // ── Keystrokes ───────────────────────────────────────────────────

    /// Keydown entry point. Call before the editor applies the key; if the
    /// event comes back consumed, the editor must skip default handling.
    pub fn on_key(&mut self, event: &mut KeyEvent, doc: Option<&mut dyn Document>) -> Option<Event> {
        if self.config.meter.enabled {
            self.meter.record_event();
        }
        if !self.config.guard.enabled {
            return None;
        }

        let reason = self.guard.handle_key(event, doc)?;
        let message = pick_message(BLOCKED_MESSAGES, &mut self.rng);
        self.notifier.notify(message);
        Some(Event::KeyBlocked {
            reason,
            at_ms: self.meter.now_ms(),
        })
    }

    // ── Sampling ─────────────────────────────────────────────────────

    /// Register the periodic sampler, replacing any previous registration.
    pub fn start_sampling(&mut self) -> SamplerHandle {
        let id = self.next_sampler_id;
        self.next_sampler_id += 1;
        let sampler = IntervalSampler::start(self.meter.now_ms(), SAMPLE_PERIOD_MS);
        self.sampler = Some((id, sampler));
        tracing::info!(period_ms = SAMPLE_PERIOD_MS, "sampler started");
        SamplerHandle { id }
    }

    /// Host timer callback. Samples when a period has elapsed.
    pub fn tick(&mut self) -> Option<Event> {
        let now = self.meter.now_ms();
        let (_, sampler) = self.sampler.as_mut()?;
        if !sampler.poll(now) {
            return None;
        }
        self.sample()
    }

    /// Sample immediately: rate into the progress track, onto the display.
    /// Shows the neutral view while the meter is off.
    pub fn sample(&mut self) -> Option<Event> {
        if !self.config.meter.enabled {
            self.display.set_text(&reset_view());
            return None;
        }
        let tpm = self.meter.current_rate();
        let progress = render(tpm, self.config.meter.goal_tpm);
        self.display.set_text(&render_track(&progress));
        Some(Event::RateSampled {
            tpm,
            position: progress.position,
            at_ms: self.meter.now_ms(),
        })
    }

    /// Cancel the registration `handle` refers to. Returns false if it was
    /// already replaced or cancelled.
    pub fn cancel_sampling(&mut self, handle: SamplerHandle) -> bool {
        match self.sampler {
            Some((id, _)) if id == handle.id => {
                self.stop_sampling();
                true
            }
            _ => false,
        }
    }

    /// Stop whatever sampler is registered and reset the display.
    pub fn stop_sampling(&mut self) -> Option<Event> {
        self.sampler.take()?;
        self.display.set_text(&reset_view());
        tracing::info!("sampler stopped");
        Some(Event::SamplerStopped {
            at_ms: self.meter.now_ms(),
        })
    }

    /// Host is unloading the mode.
    pub fn unload(&mut self) {
        self.stop_sampling();
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Flip guard and meter together. The mode counts as on only when
    /// both are on, so a half-enabled mode toggles to fully on.
    pub fn toggle(&mut self, doc: Option<&dyn Document>) -> Event {
        let target = !self.is_active();
        self.apply_guard(target, doc);
        self.apply_meter(target);
        self.persist();

        let mark = if target { "✅" } else { "❌" };
        self.notifier.notify(&format!("Brain Dump Mode {mark}"));
        tracing::info!(enabled = target, "brain dump mode toggled");
        Event::ModeToggled {
            guard: target,
            meter: target,
            at_ms: self.meter.now_ms(),
        }
    }

    pub fn set_guard_enabled(&mut self, enabled: bool, doc: Option<&dyn Document>) -> Option<Event> {
        if !self.apply_guard(enabled, doc) {
            return None;
        }
        self.persist();
        Some(Event::GuardChanged { enabled })
    }

    pub fn set_meter_enabled(&mut self, enabled: bool) -> Option<Event> {
        if !self.apply_meter(enabled) {
            return None;
        }
        self.persist();
        Some(Event::MeterChanged { enabled })
    }

    /// # Errors
    ///
    /// Rejects goals that are not strictly positive.
    pub fn set_goal(&mut self, goal_tpm: f64) -> Result<Event, ConfigError> {
        if !(goal_tpm.is_finite() && goal_tpm > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "meter.goal_tpm".into(),
                message: format!("must be a positive number, got {goal_tpm}"),
            });
        }
        self.config.meter.goal_tpm = goal_tpm;
        self.persist();
        tracing::debug!(goal_tpm, "goal changed");
        Ok(Event::GoalChanged { goal_tpm })
    }

    /// # Errors
    ///
    /// Rejects a zero window.
    pub fn set_window(&mut self, window_ms: u64) -> Result<Event, ConfigError> {
        if window_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "meter.window_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        self.meter.set_window(window_ms);
        self.config.meter.window_ms = window_ms;
        self.persist();
        Ok(Event::WindowChanged { window_ms })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_guard(&mut self, enabled: bool, doc: Option<&dyn Document>) -> bool {
        if self.config.guard.enabled == enabled {
            return false;
        }
        self.config.guard.enabled = enabled;
        if enabled {
            self.guard.lock(doc);
        } else {
            self.guard.unlock();
        }
        true
    }

    fn apply_meter(&mut self, enabled: bool) -> bool {
        if self.config.meter.enabled == enabled {
            return false;
        }
        self.config.meter.enabled = enabled;
        if !enabled {
            self.stop_sampling();
            self.display.set_text(&reset_view());
        }
        true
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.config) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::events::BlockReason;
    use crate::guard::Key;
    use crate::host::MemoryDocument;
    use crate::storage::MemoryStore;

    struct Harness {
        mode: BrainDumpMode<ManualClock>,
        clock: ManualClock,
        store: MemoryStore,
        display: Rc<RefCell<String>>,
        notices: Rc<RefCell<Vec<String>>>,
    }

    fn harness(config: Config) -> Harness {
        let clock = ManualClock::new(0);
        let store = MemoryStore::with_config(config);
        let display = Rc::new(RefCell::new(String::new()));
        let notices = Rc::new(RefCell::new(Vec::<String>::new()));
        let mode = BrainDumpMode::new(
            Box::new(store.clone()),
            clock.clone(),
            Box::new(display.clone()),
            Box::new(notices.clone()),
        )
        .with_rng(StdRng::seed_from_u64(3));
        Harness {
            mode,
            clock,
            store,
            display,
            notices,
        }
    }

    fn enabled() -> Config {
        let mut cfg = Config::default();
        cfg.guard.enabled = true;
        cfg.meter.enabled = true;
        cfg
    }

    fn press(mode: &mut BrainDumpMode<ManualClock>, doc: &mut MemoryDocument, key: Key) -> Option<Event> {
        let mut event = KeyEvent::new(key);
        let emitted = mode.on_key(&mut event, Some(&mut *doc));
        doc.apply(&event);
        emitted
    }

    #[test]
    fn every_key_counts_toward_rate() {
        let mut h = harness(enabled());
        let mut doc = MemoryDocument::default();
        for key in [Key::Char('a'), Key::Backspace, Key::Named("Shift".into())] {
            press(&mut h.mode, &mut doc, key);
        }
        assert_eq!(h.mode.meter().retained(), 3);
    }

    #[test]
    fn blocked_key_notifies_and_reports() {
        let mut h = harness(enabled());
        let mut doc = MemoryDocument::new("keep");
        h.clock.set(250);
        let emitted = press(&mut h.mode, &mut doc, Key::Backspace);
        assert_eq!(
            emitted,
            Some(Event::KeyBlocked {
                reason: BlockReason::Deletion,
                at_ms: 250
            })
        );
        assert_eq!(doc.text(), "keep");
        let notices = h.notices.borrow();
        assert_eq!(notices.len(), 1);
        assert!(BLOCKED_MESSAGES.contains(&notices[0].as_str()));
    }

    #[test]
    fn disabled_features_do_nothing() {
        let mut h = harness(Config::default());
        let mut doc = MemoryDocument::new("abc");
        assert_eq!(press(&mut h.mode, &mut doc, Key::Backspace), None);
        assert_eq!(doc.text(), "ab");
        assert_eq!(h.mode.meter().retained(), 0);
    }

    #[test]
    fn tick_samples_every_period() {
        let mut h = harness(enabled());
        let _sampler = h.mode.start_sampling();
        let mut doc = MemoryDocument::default();
        for at in [10, 20, 30] {
            h.clock.set(at);
            press(&mut h.mode, &mut doc, Key::Char('x'));
        }

        h.clock.set(50);
        assert_eq!(h.mode.tick(), None);
        h.clock.set(100);
        let sampled = h.mode.tick();
        assert_eq!(
            sampled,
            Some(Event::RateSampled {
                tpm: 180.0,
                position: 4,
                at_ms: 100
            })
        );
        assert!(h.display.borrow().ends_with("180 types/min (goal 500)"));
    }

    #[test]
    fn meter_off_shows_reset_view() {
        let mut cfg = enabled();
        cfg.meter.enabled = false;
        let mut h = harness(cfg);
        let _sampler = h.mode.start_sampling();
        h.clock.set(100);
        assert_eq!(h.mode.tick(), None);
        assert_eq!(*h.display.borrow(), reset_view());
    }

    #[test]
    fn disabling_meter_cancels_sampler() {
        let mut h = harness(enabled());
        let handle = h.mode.start_sampling();
        assert_eq!(h.mode.set_meter_enabled(false), Some(Event::MeterChanged { enabled: false }));
        assert!(!h.mode.is_sampling());
        assert!(!h.mode.cancel_sampling(handle));

        h.display.borrow_mut().clear();
        h.clock.set(500);
        assert_eq!(h.mode.tick(), None);
        assert!(h.display.borrow().is_empty());
    }

    #[test]
    fn cancelled_sampler_stops_ticking() {
        let mut h = harness(enabled());
        let first = h.mode.start_sampling();
        let second = h.mode.start_sampling();
        assert!(!h.mode.cancel_sampling(first));
        assert!(h.mode.is_sampling());

        assert!(h.mode.cancel_sampling(second));
        assert!(!h.mode.is_sampling());
        assert_eq!(*h.display.borrow(), reset_view());

        h.clock.set(1_000);
        assert_eq!(h.mode.tick(), None);
        assert_eq!(*h.display.borrow(), reset_view());
    }

    #[test]
    fn toggle_flips_both_and_persists() {
        let mut h = harness(Config::default());
        let doc = MemoryDocument::new("start");
        let event = h.mode.toggle(Some(&doc));
        assert_eq!(
            event,
            Event::ModeToggled {
                guard: true,
                meter: true,
                at_ms: 0
            }
        );
        assert!(h.mode.is_active());
        assert_eq!(h.mode.guard().snapshot(), Some("start"));
        assert_eq!(h.store.save_count(), 1);
        assert!(h.store.saved().unwrap().guard.enabled);
        assert_eq!(h.notices.borrow().last().map(String::as_str), Some("Brain Dump Mode ✅"));

        h.mode.toggle(Some(&doc));
        assert!(!h.mode.config().guard.enabled);
        assert!(!h.mode.config().meter.enabled);
        assert_eq!(*h.display.borrow(), reset_view());
    }

    #[test]
    fn half_enabled_mode_toggles_on() {
        let mut cfg = Config::default();
        cfg.guard.enabled = true;
        let mut h = harness(cfg);
        h.mode.toggle(None);
        assert!(h.mode.is_active());
    }

    #[test]
    fn reenabling_guard_snapshots_live_content() {
        let mut h = harness(enabled());
        let mut doc = MemoryDocument::default();
        for c in "old".chars() {
            press(&mut h.mode, &mut doc, Key::Char(c));
        }
        h.mode.set_guard_enabled(false, Some(&doc));
        for c in " and new".chars() {
            press(&mut h.mode, &mut doc, Key::Char(c));
        }
        h.mode.set_guard_enabled(true, Some(&doc));

        press(&mut h.mode, &mut doc, Key::Backspace);
        assert_eq!(doc.text(), "old and new");
    }

    #[test]
    fn flags_are_independent() {
        let mut h = harness(Config::default());
        assert_eq!(h.mode.set_meter_enabled(true), Some(Event::MeterChanged { enabled: true }));
        assert_eq!(h.mode.set_meter_enabled(true), None);
        assert!(!h.mode.config().guard.enabled);
        assert!(!h.mode.guard().is_locked());
        assert_eq!(h.store.save_count(), 1);
    }

    #[test]
    fn goal_and_window_are_validated_and_persisted() {
        let mut h = harness(enabled());
        assert!(h.mode.set_goal(0.0).is_err());
        assert!(h.mode.set_window(0).is_err());
        h.mode.set_goal(300.0).unwrap();
        h.mode.set_window(500).unwrap();
        assert_eq!(h.mode.meter().window_ms(), 500);
        let saved = h.store.saved().unwrap();
        assert_eq!(saved.meter.goal_tpm, 300.0);
        assert_eq!(saved.meter.window_ms, 500);
    }
}
