//! Traversal machine driver (trav-driver)
//!
//! Client-side plumbing for carrying bytecode to an execution host:
//! 1. **Handshake**: a [`ClientHandshakeHandler`] settles the channel's
//!    [`HandshakeFuture`] exactly once, from completion, timeout, exception
//!    or closure events
//! 2. **Submission**: a [`Client`] refuses to send until that handshake has
//!    succeeded, and reports why when it has not
//!
//! # Quick Start
//!
//! ```rust
//! use trav_driver::{Client, ClientEvent, ClientHandshakeHandler, ChannelId, LocalTransport};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handler = ClientHandshakeHandler::new(ChannelId::new(), Duration::from_millis(100));
//! let client = Client::new(LocalTransport::default(), handler.handshake().clone());
//!
//! handler.handle(ClientEvent::HandshakeComplete);
//! let out = client.submit(&trav_core::Bytecode::new()).await.unwrap();
//! assert_eq!(out, vec![trav_core::Value::Null]);
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod handshake;
pub mod types;

// Re-exports
pub use client::{Client, LocalTransport, Transport};
pub use config::DriverConfig;
pub use error::{DriverError, HandshakeFailure, TransportError};
pub use handler::{ClientEvent, ClientHandshakeHandler, Forward};
pub use handshake::{HandshakeFuture, HandshakeState};
pub use types::ChannelId;
