//! button-bridge: forwards key presses to a remote WebSocket listener
//!
//! The bridge installs a global keyboard hook (the buttons of a USB
//! encoder arrive as ordinary key events), feeds every transition
//! through a press latch, and ships each accepted press as a
//! `{"button":"<name>"}` JSON frame over a fresh WebSocket connection.
//!
//! Scope:
//! - Global hook for key press/release transitions
//! - Press latch that accepts the first press and drops the rest
//! - One-shot WebSocket delivery per accepted press
//! - NO reconnection, acknowledgment, or multi-device handling

mod config;
mod hook;
mod latch;
mod lifecycle;
mod message;
mod notifier;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::hook::{HookError, HookEvent, HookListener};
use crate::latch::{PressLatch, Verdict};
use crate::notifier::Notifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "button-bridge starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(endpoint = %config.endpoint, "configuration loaded");

    // Hook listener -> forwarding loop
    let (hook_tx, hook_rx) = mpsc::channel(config.channel_capacity);

    // A refused hook is reported through the channel, not from start()
    HookListener::new(hook_tx).start()?;
    info!("waiting for key presses (USB encoder buttons)");

    let notifier = Notifier::new(config.endpoint.clone()).with_timeout(config.send_timeout);
    let mut latch = PressLatch::new();

    tokio::select! {
        result = forward_presses(hook_rx, notifier, &mut latch) => {
            result?;
            info!("forwarding loop exited");
        }

        result = lifecycle::wait_for_shutdown() => {
            result?;
            info!("shutdown signal received");
        }
    }

    info!("button-bridge stopped");

    Ok(())
}

/// Drain hook events, apply the press latch, and hand accepted presses
/// to the notifier.
///
/// Sends run on a spawned task so the hook channel keeps draining while
/// a connect-send-close cycle is in flight. The latch engages before the
/// send starts and never resets, so at most one send ever happens.
async fn forward_presses(
    mut hook_rx: mpsc::Receiver<HookEvent>,
    notifier: Notifier,
    latch: &mut PressLatch,
) -> Result<()> {
    let notifier = Arc::new(notifier);

    while let Some(event) = hook_rx.recv().await {
        match event {
            HookEvent::Key(transition) => match latch.handle(transition) {
                Verdict::Forward(name) => {
                    info!(key = %name, "key pressed");

                    let notifier = Arc::clone(&notifier);
                    tokio::spawn(async move {
                        // Failures are logged and swallowed; the latch
                        // stays engaged either way
                        if let Err(e) = notifier.notify(&name).await {
                            warn!(error = %e, "failed to deliver button press");
                        }
                    });
                }
                Verdict::Ignored(name) => {
                    info!(key = %name, "ignoring key press, latch engaged");
                }
                Verdict::Skipped => {}
            },

            HookEvent::Failed(reason) => {
                error!(%reason, "global key hook failed");
                return Err(HookError::Install(reason).into());
            }
        }
    }

    Ok(())
}
