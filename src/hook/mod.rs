//! Hook module for global keyboard event listening
//!
//! Uses rdev to monitor key press/release transitions system-wide and
//! feed them to the forwarding loop.

mod keys;
mod listener;

pub use keys::key_name;
pub use listener::{Direction, HookError, HookEvent, HookListener, KeyTransition};
