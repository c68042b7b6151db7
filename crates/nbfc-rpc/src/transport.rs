//! Socket transport for the NBFC service.
//!
//! Every request uses its own connection:
//!
//! 1. connect to the service socket
//! 2. write the encoded request and half-close the write side
//! 3. read until the service closes the connection or goes idle
//!
//! Nothing is pooled or multiplexed, so a slow reply only delays the call
//! that is waiting for it.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

/// Well-known socket of the NBFC service
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/nbfc_service.socket";

/// Environment variable that overrides [`DEFAULT_SOCKET_PATH`]
pub const SOCKET_ENV_VAR: &str = "NBFC_SOCKET";

/// Maximum response size (1 MiB)
const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

const READ_CHUNK_SIZE: usize = 4096;

/// Get the socket path for the NBFC service.
///
/// Prefers `$NBFC_SOCKET` when set, so a development daemon can listen
/// somewhere other than `/var/run`.
#[must_use]
pub fn default_socket_path() -> PathBuf {
    std::env::var_os(SOCKET_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH), PathBuf::from)
}

/// Sends one request and returns the raw reply bytes.
///
/// Implemented by [`UnixTransport`] for the real service; tests provide
/// in-memory implementations.
pub trait Transport: Send + Sync {
    fn send(&self, payload: Bytes) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}

/// Connection settings for [`UnixTransport`]
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub socket_path: PathBuf,

    /// Bound on connecting and on writing the request
    pub connect_timeout: Duration,

    /// Reading stops once no bytes arrive for this long
    pub idle_timeout: Duration,

    pub max_response_size: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            connect_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_millis(500),
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl TransportOptions {
    #[must_use]
    pub fn with_socket_path(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Self::default()
        }
    }
}

/// Unix socket transport, one connection per request
#[derive(Debug, Clone)]
pub struct UnixTransport {
    options: Arc<TransportOptions>,
}

impl UnixTransport {
    #[must_use]
    pub fn new(options: TransportOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.options.socket_path
    }

    #[must_use]
    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    async fn connect(&self) -> Result<UnixStream, TransportError> {
        let path = &self.options.socket_path;
        timeout(self.options.connect_timeout, UnixStream::connect(path))
            .await
            .map_err(|_| TransportError::Timeout(Stage::Connect))?
            .map_err(|source| TransportError::Connect {
                path: path.clone(),
                source,
            })
    }

    async fn read_response(&self, stream: &mut UnixStream) -> Result<Bytes, TransportError> {
        let mut response = BytesMut::with_capacity(READ_CHUNK_SIZE);

        loop {
            response.reserve(READ_CHUNK_SIZE);
            match timeout(self.options.idle_timeout, stream.read_buf(&mut response)).await {
                Err(_) => {
                    tracing::debug!(
                        "Idle for {:?}, keeping {} bytes",
                        self.options.idle_timeout,
                        response.len()
                    );
                    break;
                }
                Ok(Ok(0)) => break,
                Ok(Ok(_)) => {
                    if response.len() > self.options.max_response_size {
                        return Err(TransportError::ResponseTooLarge(
                            self.options.max_response_size,
                        ));
                    }
                }
                Ok(Err(e)) => return Err(TransportError::Io(e)),
            }
        }

        Ok(response.freeze())
    }
}

impl Default for UnixTransport {
    fn default() -> Self {
        Self::new(TransportOptions::default())
    }
}

impl Transport for UnixTransport {
    async fn send(&self, payload: Bytes) -> Result<Bytes, TransportError> {
        let mut stream = self.connect().await?;

        timeout(self.options.connect_timeout, stream.write_all(&payload))
            .await
            .map_err(|_| TransportError::Timeout(Stage::Write))??;

        // The service may already have answered and closed; the reply is still readable
        if let Err(e) = stream.shutdown().await {
            tracing::debug!("Half-close after write failed: {}", e);
        }

        let response = self.read_response(&mut stream).await?;
        tracing::debug!(
            "Exchanged {} bytes out, {} bytes in via {}",
            payload.len(),
            response.len(),
            self.options.socket_path.display()
        );
        Ok(response)
    }
}

/// Step of a request that ran out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Connect => write!(f, "connecting"),
            Stage::Write => write!(f, "writing"),
        }
    }
}

/// Errors that can occur while exchanging bytes with the service
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Cannot connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Timed out while {0}")]
    Timeout(Stage),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Response too large: more than {0} bytes")]
    ResponseTooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_socket_path() {
        // Only meaningful when the override is not set in the test environment
        if std::env::var_os(SOCKET_ENV_VAR).is_none() {
            assert_eq!(default_socket_path(), PathBuf::from(DEFAULT_SOCKET_PATH));
        }
    }

    #[test]
    fn test_default_options() {
        let options = TransportOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(2));
        assert_eq!(options.idle_timeout, Duration::from_millis(500));
        assert_eq!(options.max_response_size, MAX_RESPONSE_SIZE);
    }

    #[test]
    fn test_options_with_socket_path() {
        let options = TransportOptions::with_socket_path("/tmp/nbfc-test.sock");
        assert_eq!(options.socket_path, PathBuf::from("/tmp/nbfc-test.sock"));
        assert_eq!(options.idle_timeout, Duration::from_millis(500));

        let transport = UnixTransport::new(options);
        assert_eq!(transport.socket_path(), Path::new("/tmp/nbfc-test.sock"));
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Timeout(Stage::Connect);
        assert_eq!(err.to_string(), "Timed out while connecting");

        let err = TransportError::Timeout(Stage::Write);
        assert_eq!(err.to_string(), "Timed out while writing");

        let err = TransportError::ResponseTooLarge(2_000_000);
        assert!(err.to_string().contains("2000000"));
        assert!(err.to_string().contains("too large"));

        let err = TransportError::Connect {
            path: PathBuf::from("/var/run/nbfc_service.socket"),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/var/run/nbfc_service.socket"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_transport_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
        let err: TransportError = io_err.into();
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[tokio::test]
    async fn test_send_to_missing_socket_fails_with_connect() {
        let path = std::env::temp_dir().join(format!(
            "nbfc-missing-{}-{}.sock",
            std::process::id(),
            line!()
        ));
        let transport = UnixTransport::new(TransportOptions::with_socket_path(&path));

        let result = transport.send(Bytes::from_static(b"{}\n")).await;
        match result {
            Err(TransportError::Connect { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected Connect error, got {other:?}"),
        }
    }
}
