//! Outbound message types for the remote listener
//!
//! One message shape exists: a single-field record carrying the name of
//! the pressed key, sent as one JSON text frame per accepted press.

use serde::{Deserialize, Serialize};

/// Payload sent to the remote listener for one accepted key press.
///
/// Serializes as `{"button":"<name>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPress {
    /// Name of the pressed key, e.g. "a", "space", "left shift"
    pub button: String,
}

impl ButtonPress {
    /// Create a payload for the given key name
    pub fn new(button: impl Into<String>) -> Self {
        Self {
            button: button.into(),
        }
    }
}
