//! Client-side handshake event handling
//!
//! The protocol layer reports handshake progress as [`ClientEvent`]s. The
//! handler settles the channel's [`HandshakeFuture`] from them and tells the
//! caller what to pass further down the pipeline.

use crate::config::DriverConfig;
use crate::error::HandshakeFailure;
use crate::handshake::HandshakeFuture;
use crate::types::ChannelId;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events delivered to the handler by the protocol layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Server accepted the handshake
    HandshakeComplete,
    /// Handshake window elapsed
    HandshakeTimeout,
    /// Error raised on the channel
    ExceptionCaught(String),
    /// Channel closed
    ChannelInactive,
    /// Anything the handler does not interpret
    Other(String),
}

/// What continues downstream after the handler ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forward {
    /// Event consumed
    Nothing,
    /// Pass the exception on for logging and cleanup
    Exception(String),
    /// Pass the inactivity notice on
    Inactive,
    /// Pass an uninterpreted event on unchanged
    Event(String),
}

/// Settles a channel's handshake from protocol events
#[derive(Debug, Clone)]
pub struct ClientHandshakeHandler {
    handshake: HandshakeFuture,
    timeout: Duration,
}

impl ClientHandshakeHandler {
    /// Handler for `channel` with a handshake window of `timeout`
    #[must_use]
    pub fn new(channel: ChannelId, timeout: Duration) -> Self {
        Self {
            handshake: HandshakeFuture::new(channel),
            timeout,
        }
    }

    /// Handler using the configured handshake window
    #[must_use]
    pub fn from_config(channel: ChannelId, config: &DriverConfig) -> Self {
        Self::new(channel, config.handshake_timeout())
    }

    /// The handshake this handler settles
    #[inline]
    #[must_use]
    pub fn handshake(&self) -> &HandshakeFuture {
        &self.handshake
    }

    /// Handshake window
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Apply one event
    ///
    /// Only the first completion, timeout, exception or closure settles the
    /// handshake. Exceptions and closures are forwarded either way.
    pub fn handle(&self, event: ClientEvent) -> Forward {
        match event {
            ClientEvent::HandshakeComplete => {
                self.handshake.try_succeed();
                Forward::Nothing
            }
            ClientEvent::HandshakeTimeout => {
                if self.handshake.try_fail(HandshakeFailure::Timeout {
                    timeout_ms: self.timeout_ms(),
                }) {
                    tracing::warn!(channel = %self.handshake.channel(), timeout_ms = self.timeout_ms(), "handshake timed out");
                }
                Forward::Nothing
            }
            ClientEvent::ExceptionCaught(reason) => {
                self.handshake
                    .try_fail(HandshakeFailure::Protocol(reason.clone()));
                Forward::Exception(reason)
            }
            ClientEvent::ChannelInactive => {
                let channel = self.handshake.channel();
                if self.handshake.try_fail(HandshakeFailure::ChannelClosed { channel }) {
                    tracing::warn!(%channel, "channel closed during handshake");
                }
                Forward::Inactive
            }
            ClientEvent::Other(event) => Forward::Event(event),
        }
    }

    /// Fire [`ClientEvent::HandshakeTimeout`] once the window elapses
    ///
    /// The timer stops early if the handshake settles first.
    pub fn arm_timeout(&self) -> JoinHandle<()> {
        let handler = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = handler.handshake.wait() => {}
                () = tokio::time::sleep(handler.timeout) => {
                    handler.handle(ClientEvent::HandshakeTimeout);
                }
            }
        })
    }

    /// Apply events until the sender side closes, forwarding what remains
    pub async fn run(
        self,
        mut events: mpsc::Receiver<ClientEvent>,
        downstream: mpsc::Sender<Forward>,
    ) {
        while let Some(event) = events.recv().await {
            let forward = self.handle(event);
            if forward != Forward::Nothing && downstream.send(forward).await.is_err() {
                tracing::debug!(channel = %self.handshake.channel(), "downstream closed");
                break;
            }
        }
    }
}
