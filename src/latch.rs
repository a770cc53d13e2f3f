//! Press latch: the debounce state machine
//!
//! Two states, one edge. The latch engages on the first key press the
//! process ever sees and never releases, so every later press is dropped.
//! That matches the deployed behavior exactly; `test_latch_never_resets`
//! pins it down so loosening the latch is a deliberate, reviewed change.

use crate::hook::{Direction, KeyTransition};

/// The two possible latch states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchState {
    /// No press accepted yet
    #[default]
    Idle,
    /// A press was accepted; all further presses are dropped
    Latched,
}

/// Outcome of feeding one key transition through the latch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// First accepted press: forward this key name to the notifier
    Forward(String),
    /// Press arrived while latched: drop it (logged by the caller)
    Ignored(String),
    /// Release: never forwarded, latch untouched
    Skipped,
}

/// Debounce filter owned by the forwarding loop.
///
/// The latch engages before the send starts, so delivery outcome never
/// affects latch state.
#[derive(Debug, Default)]
pub struct PressLatch {
    state: LatchState,
}

impl PressLatch {
    /// Create a latch in the `Idle` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current latch state
    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Feed one key transition through the latch
    pub fn handle(&mut self, transition: KeyTransition) -> Verdict {
        match (self.state, transition.direction) {
            (LatchState::Idle, Direction::Pressed) => {
                self.state = LatchState::Latched;
                Verdict::Forward(transition.name)
            }
            (LatchState::Latched, Direction::Pressed) => Verdict::Ignored(transition.name),
            (_, Direction::Released) => Verdict::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(name: &str) -> KeyTransition {
        KeyTransition {
            name: name.to_string(),
            direction: Direction::Pressed,
        }
    }

    fn release(name: &str) -> KeyTransition {
        KeyTransition {
            name: name.to_string(),
            direction: Direction::Released,
        }
    }

    #[test]
    fn test_first_press_is_forwarded() {
        let mut latch = PressLatch::new();
        assert_eq!(latch.state(), LatchState::Idle);

        assert_eq!(latch.handle(press("x")), Verdict::Forward("x".to_string()));
        assert_eq!(latch.state(), LatchState::Latched);
    }

    #[test]
    fn test_second_press_is_ignored() {
        let mut latch = PressLatch::new();

        assert_eq!(latch.handle(press("x")), Verdict::Forward("x".to_string()));
        // No release in between
        assert_eq!(latch.handle(press("y")), Verdict::Ignored("y".to_string()));
    }

    #[test]
    fn test_release_never_forwards_when_idle() {
        let mut latch = PressLatch::new();

        assert_eq!(latch.handle(release("x")), Verdict::Skipped);
        assert_eq!(latch.state(), LatchState::Idle);
    }

    #[test]
    fn test_release_never_forwards_when_latched() {
        let mut latch = PressLatch::new();
        latch.handle(press("x"));

        assert_eq!(latch.handle(release("x")), Verdict::Skipped);
        assert_eq!(latch.state(), LatchState::Latched);
    }

    #[test]
    fn test_latch_never_resets() {
        let mut latch = PressLatch::new();
        latch.handle(press("x"));

        // No sequence of transitions brings the latch back to Idle;
        // only the very first press is ever forwarded.
        let keys = ["x", "y", "z", "space", "left shift"];
        for key in keys {
            assert_eq!(latch.handle(release(key)), Verdict::Skipped);
            assert_eq!(
                latch.handle(press(key)),
                Verdict::Ignored(key.to_string())
            );
            assert_eq!(latch.state(), LatchState::Latched);
        }
    }
}
