//! One-shot handshake completion
//!
//! A [`HandshakeFuture`] starts [`HandshakeState::Pending`] and leaves it at
//! most once. The transition is a check-and-set under the state lock, so of
//! several racing writers exactly one wins and the rest observe `false`.

use crate::error::HandshakeFailure;
use crate::types::ChannelId;
use std::sync::Arc;
use tokio::sync::watch;

/// Handshake progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    /// Negotiation in progress
    Pending,
    /// Channel ready for requests
    Succeeded,
    /// Channel unusable
    Failed(HandshakeFailure),
}

impl HandshakeState {
    /// Whether the handshake is still in progress
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether a result has been recorded
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// The recorded result, if any
    #[must_use]
    pub fn outcome(&self) -> Option<Result<(), HandshakeFailure>> {
        match self {
            Self::Pending => None,
            Self::Succeeded => Some(Ok(())),
            Self::Failed(failure) => Some(Err(failure.clone())),
        }
    }
}

/// Shared completion signal for one channel's handshake
///
/// Clones observe and settle the same handshake.
#[derive(Debug, Clone)]
pub struct HandshakeFuture {
    channel: ChannelId,
    state: Arc<watch::Sender<HandshakeState>>,
}

impl HandshakeFuture {
    /// Pending handshake for `channel`
    #[must_use]
    pub fn new(channel: ChannelId) -> Self {
        let (state, _) = watch::channel(HandshakeState::Pending);
        Self {
            channel,
            state: Arc::new(state),
        }
    }

    /// Channel being negotiated
    #[inline]
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.state.borrow().clone()
    }

    /// Whether a result has been recorded
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.borrow().is_settled()
    }

    /// Record success; `false` if a result was already recorded
    pub fn try_succeed(&self) -> bool {
        self.settle(HandshakeState::Succeeded)
    }

    /// Record failure; `false` if a result was already recorded
    pub fn try_fail(&self, failure: HandshakeFailure) -> bool {
        self.settle(HandshakeState::Failed(failure))
    }

    fn settle(&self, next: HandshakeState) -> bool {
        let mut ignored = None;
        let settled = self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = next;
                true
            } else {
                ignored = Some(next);
                false
            }
        });
        if settled {
            let state = self.state();
            tracing::debug!(channel = %self.channel, state = ?state, "handshake settled");
        } else {
            tracing::trace!(channel = %self.channel, ignored = ?ignored, "handshake already settled");
        }
        settled
    }

    /// Wait until a result is recorded
    ///
    /// # Errors
    /// The recorded [`HandshakeFailure`].
    pub async fn wait(&self) -> Result<(), HandshakeFailure> {
        let mut receiver = self.state.subscribe();
        let outcome = receiver
            .wait_for(HandshakeState::is_settled)
            .await
            .ok()
            .and_then(|state| state.outcome());
        outcome.unwrap_or_else(|| Err(HandshakeFailure::Protocol("handshake abandoned".into())))
    }
}
