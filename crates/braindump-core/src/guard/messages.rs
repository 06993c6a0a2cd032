use rand::seq::SliceRandom;
use rand::Rng;

/// Notices shown when a backward move or deletion is blocked.
pub const BLOCKED_MESSAGES: &[&str] = &[
    "Brain Dump Mode 🔥 Backspace DISABLED",
    "No looking back 🔥 Keep writing",
    "Forward only! Edit later ✍️",
    "The shark is behind you 🦈 Keep typing",
];

/// Pick one message uniformly at random. An empty pool yields `""`.
pub fn pick_message<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}
