//! Client for the NBFC service.
//!
//! Wraps codec and transport into the two requests the service understands.
//! The client holds no connection; every call opens its own.

use std::path::PathBuf;

use bytes::Bytes;
use nbfc_types::{Command, FanSpeed, StatusSnapshot};

use crate::codec::{decode, encode};
use crate::error::Result;
use crate::transport::{Transport, TransportOptions, UnixTransport};

/// Client for communicating with the NBFC service
#[derive(Debug, Clone)]
pub struct NbfcClient<T = UnixTransport> {
    transport: T,
}

impl NbfcClient<UnixTransport> {
    /// Client for the service at the default socket path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TransportOptions::default())
    }

    /// Client for the service at a custom socket path.
    #[must_use]
    pub fn connect_to(path: impl Into<PathBuf>) -> Self {
        Self::with_options(TransportOptions::with_socket_path(path))
    }

    #[must_use]
    pub fn with_options(options: TransportOptions) -> Self {
        Self::with_transport(UnixTransport::new(options))
    }
}

impl Default for NbfcClient<UnixTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> NbfcClient<T> {
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a command and return the raw reply.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if the command cannot be serialized and
    /// `Error::Transport` if the exchange fails.
    pub async fn send(&self, command: &Command) -> Result<Bytes> {
        let payload = encode(command)?;
        tracing::debug!("Sending {}", command);
        Ok(self.transport.send(payload).await?)
    }

    /// Request the current service status.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the service cannot be reached and
    /// `Error::Decode` if the reply holds no readable status.
    pub async fn status(&self) -> Result<StatusSnapshot> {
        let raw = self.send(&Command::status()).await?;
        let snapshot = decode(&raw)?;
        tracing::debug!(
            "Status: {:.1}°C, {} fans, config '{}'",
            snapshot.temperature,
            snapshot.fans.len(),
            snapshot.config
        );
        Ok(snapshot)
    }

    /// Set one fan to a fixed speed or hand it back to the service.
    ///
    /// The reply is not interpreted; success only means the request was
    /// delivered.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the request cannot be delivered.
    pub async fn set_fan_speed(&self, fan: usize, speed: FanSpeed) -> Result<()> {
        let raw = self.send(&Command::set_fan_speed(fan, speed)).await?;
        tracing::trace!("Ignoring {} byte set-fan-speed reply", raw.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)] // Exact float comparisons are intentional in tests

    use super::*;
    use crate::error::Error;
    use crate::transport::{Stage, TransportError};
    use std::sync::{Arc, Mutex};

    /// Records every payload and answers with a canned reply
    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<Bytes>>>,
        reply: Option<&'static [u8]>,
    }

    impl Transport for RecordingTransport {
        async fn send(&self, payload: Bytes) -> std::result::Result<Bytes, TransportError> {
            self.sent.lock().unwrap().push(payload);
            match self.reply {
                Some(reply) => Ok(Bytes::from_static(reply)),
                None => Err(TransportError::Timeout(Stage::Connect)),
            }
        }
    }

    #[test]
    fn test_connect_to_uses_socket_path() {
        let client = NbfcClient::connect_to("/run/nbfc-dev.sock");
        assert_eq!(
            client.transport().socket_path(),
            std::path::Path::new("/run/nbfc-dev.sock")
        );
    }

    #[tokio::test]
    async fn test_status_sends_status_command() {
        let transport = RecordingTransport {
            reply: Some(br#"{"pid":3,"temperature":40.5,"fans":[]}"#),
            ..Default::default()
        };
        let client = NbfcClient::with_transport(transport.clone());

        let snapshot = client.status().await.unwrap();
        assert_eq!(snapshot.pid, 3);
        assert_eq!(snapshot.temperature, 40.5);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(&sent[0][..], b"{\"command\":\"status\"}\n");
    }

    #[tokio::test]
    async fn test_set_fan_speed_ignores_reply() {
        let transport = RecordingTransport {
            reply: Some(b"garbage without braces"),
            ..Default::default()
        };
        let client = NbfcClient::with_transport(transport.clone());

        client.set_fan_speed(1, FanSpeed::percent(42.0)).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(
            &sent[0][..],
            b"{\"command\":\"set-fan-speed\",\"fan\":1,\"speed\":42}\n"
        );
    }

    #[tokio::test]
    async fn test_status_decode_failure() {
        let transport = RecordingTransport {
            reply: Some(b"Connection refused"),
            ..Default::default()
        };
        let client = NbfcClient::with_transport(transport);

        let err = client.status().await.unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_status_transport_failure() {
        let client = NbfcClient::with_transport(RecordingTransport::default());

        let err = client.status().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Timeout(Stage::Connect))
        ));
    }
}
