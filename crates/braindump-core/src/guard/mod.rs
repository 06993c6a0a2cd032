mod content;
mod key;
mod messages;

pub use content::{ContentGuard, GuardState};
pub use key::{Key, KeyEvent};
pub use messages::{pick_message, BLOCKED_MESSAGES};
