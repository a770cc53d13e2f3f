//! Global keyboard hook listener
//!
//! Registers a process-wide hook via rdev and forwards every key
//! transition to the forwarding loop. Runs on a dedicated thread because
//! `rdev::listen` blocks for the lifetime of the hook.
//!
//! An active hook observes keyboard input for the entire session, not
//! just this process, and needs input privileges on most desktops
//! (Accessibility on macOS, the `input` group or an X session on Linux).

use std::thread;

use rdev::{listen, Event, EventType};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::keys::key_name;

/// One key transition as delivered by the OS input subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTransition {
    /// Wire name of the key, see [`key_name`](super::key_name)
    pub name: String,
    /// Whether the key went down or up
    pub direction: Direction,
}

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Pressed,
    Released,
}

/// Events sent from the hook thread to the forwarding loop
#[derive(Debug, Clone)]
pub enum HookEvent {
    /// A key went down or up somewhere on the system
    Key(KeyTransition),
    /// The OS refused the hook or tore it down; fatal, not retried
    Failed(String),
}

/// Errors that can occur while starting the hook
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to spawn hook thread: {0}")]
    ThreadSpawn(String),

    #[error("failed to install global key hook: {0}")]
    Install(String),
}

/// Global keyboard hook that reports every key transition system-wide
pub struct HookListener {
    event_tx: mpsc::Sender<HookEvent>,
}

impl HookListener {
    /// Create a new hook listener feeding the given channel
    pub fn new(event_tx: mpsc::Sender<HookEvent>) -> Self {
        Self { event_tx }
    }

    /// Start the hook on a dedicated thread.
    ///
    /// rdev only reports hook-installation failure from inside `listen`,
    /// so a refused hook arrives on the channel as [`HookEvent::Failed`]
    /// rather than as an error from this method.
    pub fn start(self) -> Result<(), HookError> {
        let hook_tx = self.event_tx.clone();

        thread::Builder::new()
            .name("key-hook".to_string())
            .spawn(move || {
                info!("key hook thread started");

                if let Err(e) = listen(move |event| forward_event(&hook_tx, event)) {
                    let reason = format!("{e:?}");
                    error!(%reason, "could not install global key hook - check input permissions");
                    let _ = self.event_tx.blocking_send(HookEvent::Failed(reason));
                }

                info!("key hook thread stopped");
            })
            .map_err(|e| HookError::ThreadSpawn(e.to_string()))?;

        Ok(())
    }
}

/// Hook callback. Runs on the OS event-delivery thread, so it must never
/// block: transitions go out with `try_send` and are dropped with a
/// warning when the forwarding loop falls behind.
fn forward_event(tx: &mpsc::Sender<HookEvent>, event: Event) {
    let transition = match event.event_type {
        EventType::KeyPress(key) => KeyTransition {
            name: key_name(key).into_owned(),
            direction: Direction::Pressed,
        },
        EventType::KeyRelease(key) => KeyTransition {
            name: key_name(key).into_owned(),
            direction: Direction::Released,
        },
        // Mouse movement, clicks, and wheel events are not our concern
        _ => return,
    };

    match tx.try_send(HookEvent::Key(transition)) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(ev)) => {
            warn!(?ev, "hook channel full, dropping key transition");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {}
    }
}
