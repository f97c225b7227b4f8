//! Error types for the driver
//!
//! - [`HandshakeFailure`]: why a connection handshake did not complete
//! - [`TransportError`]: failures of the transport carrying bytecode
//! - [`DriverError`]: what a submitting caller sees

use crate::types::ChannelId;
use trav_core::{CompileError, ConfigError, ExecutionError};

/// Reason a handshake failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandshakeFailure {
    /// No completion within the configured window
    #[error("handshake not completed in stipulated time=[{timeout_ms}]ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Channel went inactive while the handshake was pending
    #[error("Channel=[{channel}] closed before the handshake could complete")]
    ChannelClosed {
        /// Channel that closed
        channel: ChannelId,
    },

    /// Exception raised on the channel during the handshake
    #[error("handshake failed: {0}")]
    Protocol(String),
}

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Remote side rejected the program
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Program failed while executing
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Channel unusable
    #[error("channel {channel} unavailable: {reason}")]
    Unavailable {
        /// Affected channel
        channel: ChannelId,
        /// What went wrong
        reason: String,
    },
}

/// Errors surfaced to callers submitting bytecode
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Submission attempted before the handshake completed
    #[error("handshake on channel {channel} has not completed")]
    HandshakePending {
        /// Channel still negotiating
        channel: ChannelId,
    },

    /// The handshake failed; the channel cannot carry requests
    #[error(transparent)]
    HandshakeFailed(#[from] HandshakeFailure),

    /// The transport failed the request
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}
