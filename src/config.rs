//! Configuration loading and management

use std::time::Duration;

use anyhow::Result;

use crate::notifier::DEFAULT_SEND_TIMEOUT;

/// Endpoint used when BUTTON_BRIDGE_ENDPOINT is not set.
/// Edit this to point at the listening server.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:9001";

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// WebSocket endpoint the notifier connects to for each press
    pub endpoint: String,

    /// Upper bound on one connect-send-close cycle
    pub send_timeout: Duration,

    /// Capacity of the hook-to-forwarder event channel
    pub channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let endpoint = std::env::var("BUTTON_BRIDGE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            endpoint,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            channel_capacity: 32,
        })
    }
}
