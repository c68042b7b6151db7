//! Client-side protocol for the NBFC fan service.
//!
//! This crate provides the wire codec, the socket transport, and a small
//! client for talking to the NBFC service over its Unix socket.
//!
//! # Architecture
//!
//! - [`codec`]: JSON encoding of commands and noise-tolerant decoding of status replies
//! - [`transport`]: One short-lived socket connection per request
//! - [`client`]: `status` and `set-fan-speed` on top of codec and transport
//! - [`error`]: Unified error type and `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use nbfc_rpc::{FanSpeed, NbfcClient};
//!
//! # async fn example() -> nbfc_rpc::Result<()> {
//! let client = NbfcClient::new();
//!
//! let status = client.status().await?;
//! println!("Temperature: {:.1}°C", status.temperature);
//!
//! client.set_fan_speed(0, FanSpeed::Auto).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod transport;

// Re-export main client types
pub use client::NbfcClient;

// Re-export codec entry points
pub use codec::{DecodeError, EncodeError, LINE_TERMINATOR, decode, encode};

// Re-export error types
pub use error::{Error, Result};

// Re-export transport types
pub use transport::{
    DEFAULT_SOCKET_PATH, SOCKET_ENV_VAR, Stage, Transport, TransportError, TransportOptions,
    UnixTransport, default_socket_path,
};

// Re-export wire types from nbfc-types
pub use nbfc_types::{Command, CommandKind, FanSpeed, FanStatus, StatusSnapshot};
