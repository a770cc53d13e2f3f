//! WebSocket notifier
//!
//! Delivers one button press per call: connect to the configured
//! endpoint, send a single JSON text frame, close the connection. No
//! acknowledgment is read and nothing is retried; failures are returned
//! to the caller, which logs and swallows them.

use std::time::Duration;

use futures_util::SinkExt;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite};
use tracing::{debug, info};

use crate::message::ButtonPress;

/// Upper bound on one connect-send-close cycle when none is configured
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while delivering a button press
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("send to {endpoint} did not complete within {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("failed to send message: {0}")]
    Send(tungstenite::Error),
}

/// One-shot sender for button press payloads
pub struct Notifier {
    endpoint: String,
    send_timeout: Duration,
}

impl Notifier {
    /// Create a notifier for the given WebSocket endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Override the send timeout
    pub fn with_timeout(self, send_timeout: Duration) -> Self {
        Self {
            send_timeout,
            ..self
        }
    }

    /// Deliver `{"button":"<name>"}` to the endpoint as one text frame.
    ///
    /// At most one message goes out per invocation. The whole
    /// connect-send-close cycle is bounded by the send timeout.
    pub async fn notify(&self, button: &str) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(&ButtonPress::new(button))?;

        timeout(self.send_timeout, self.send_once(&payload))
            .await
            .map_err(|_| NotifyError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout: self.send_timeout,
            })??;

        info!(payload = %payload, "sent button press");
        Ok(())
    }

    async fn send_once(&self, payload: &str) -> Result<(), NotifyError> {
        let (mut ws, _response) =
            connect_async(self.endpoint.as_str())
                .await
                .map_err(|e| NotifyError::Connect {
                    endpoint: self.endpoint.clone(),
                    source: e,
                })?;
        debug!(endpoint = %self.endpoint, "connected");

        ws.send(tungstenite::Message::Text(payload.to_string()))
            .await
            .map_err(NotifyError::Send)?;

        // The payload is already out; a failed close handshake is not
        // worth surfacing to the caller.
        if let Err(e) = ws.close(None).await {
            debug!(error = %e, "close handshake failed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use tokio_test::assert_ok;
    use tokio_tungstenite::tungstenite::Message;

    /// Accept one WebSocket connection and return the first text frame.
    async fn ws_server_once() -> (String, JoinHandle<Option<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.ok()?;
            let mut ws = tokio_tungstenite::accept_async(stream).await.ok()?;
            while let Some(msg) = ws.next().await {
                if let Ok(Message::Text(text)) = msg {
                    return Some(text);
                }
            }
            None
        });

        (format!("ws://{addr}"), handle)
    }

    #[tokio::test]
    async fn test_notify_sends_single_json_frame() {
        let (endpoint, server) = ws_server_once().await;

        let notifier = Notifier::new(endpoint);
        tokio_test::assert_ok!(notifier.notify("x").await);

        let received = server.await.unwrap();
        assert_eq!(received.as_deref(), Some(r#"{"button":"x"}"#));
    }

    #[tokio::test]
    async fn test_notify_unreachable_endpoint_errors() {
        // Bind and drop to get a loopback port with no listener
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = Notifier::new(format!("ws://{addr}"));
        let err = notifier.notify("x").await.unwrap_err();
        assert!(matches!(err, NotifyError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_notify_times_out_on_stalled_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept the TCP connection but never answer the upgrade request
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let notifier =
            Notifier::new(format!("ws://{addr}")).with_timeout(Duration::from_millis(100));
        let err = notifier.notify("x").await.unwrap_err();
        assert!(matches!(err, NotifyError::Timeout { .. }));

        server.abort();
    }
}
