use braindump_core::{BrainDumpMode, CoreError, FileStore, Notifier, NullSink, SystemClock};

/// Prints notices to stdout.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

/// No document is open from the command line, so the guard locks without
/// a snapshot and takes one on the editor's first keystroke.
pub fn run(store: &FileStore) -> Result<(), CoreError> {
    let mut mode = BrainDumpMode::new(
        Box::new(store.clone()),
        SystemClock,
        Box::new(NullSink),
        Box::new(StdoutNotifier),
    );
    let event = mode.toggle(None);
    tracing::debug!(?event, "toggled from cli");
    Ok(())
}
