//! Error types for the nbfc-rpc crate.
//!
//! This module provides a unified error type for all client operations.

use crate::codec::{DecodeError, EncodeError};
use crate::transport::TransportError;

/// Unified error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl Error {
    /// The service could not be reached or the exchange broke off.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The service answered, but not with a readable status.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
