//! Bytecode submission gated on the handshake

use crate::error::{DriverError, HandshakeFailure, TransportError};
use crate::handshake::{HandshakeFuture, HandshakeState};
use crate::types::ChannelId;
use async_trait::async_trait;
use futures::future::join_all;
use trav_core::{Bytecode, Compiler, Value};

/// Carries bytecode to an execution host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Channel the transport writes to
    fn channel(&self) -> ChannelId;

    /// Execute `bytecode` remotely and collect its results
    async fn send(&self, bytecode: &Bytecode) -> Result<Vec<Value>, TransportError>;
}

/// Compiles and runs bytecode in process, seeded with a single `null`
///
/// Every send compiles afresh; parallel programs reuse the compiler's pool.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    channel: ChannelId,
    compiler: Compiler,
}

impl LocalTransport {
    /// Transport on a fresh channel
    #[must_use]
    pub fn new(compiler: Compiler) -> Self {
        Self {
            channel: ChannelId::new(),
            compiler,
        }
    }

    /// The compiler every send goes through
    #[inline]
    #[must_use]
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new(Compiler::with_defaults())
    }
}

#[async_trait]
impl Transport for LocalTransport {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    async fn send(&self, bytecode: &Bytecode) -> Result<Vec<Value>, TransportError> {
        let compiler = self.compiler.clone();
        let bytecode = bytecode.clone();
        let channel = self.channel;
        tokio::task::spawn_blocking(move || -> Result<Vec<Value>, TransportError> {
            let program = compiler.compile(&bytecode)?;
            Ok(program.evaluate_objects(vec![Value::Null])?)
        })
        .await
        .map_err(|e| TransportError::Unavailable {
            channel,
            reason: e.to_string(),
        })?
    }
}

/// Submits bytecode once the channel handshake has succeeded
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    handshake: HandshakeFuture,
}

impl<T: Transport> Client<T> {
    /// Client writing through `transport`, gated by `handshake`
    pub fn new(transport: T, handshake: HandshakeFuture) -> Self {
        Self {
            transport,
            handshake,
        }
    }

    /// The gating handshake
    #[inline]
    pub fn handshake(&self) -> &HandshakeFuture {
        &self.handshake
    }

    /// The transport
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check the submission precondition
    ///
    /// # Errors
    /// `HandshakePending` while negotiating, `HandshakeFailed` after a failure.
    pub fn ensure_ready(&self) -> Result<(), DriverError> {
        match self.handshake.state() {
            HandshakeState::Succeeded => Ok(()),
            HandshakeState::Pending => Err(DriverError::HandshakePending {
                channel: self.handshake.channel(),
            }),
            HandshakeState::Failed(failure) => Err(DriverError::HandshakeFailed(failure)),
        }
    }

    /// Submit now; the handshake must already have succeeded
    ///
    /// # Errors
    /// See [`Client::ensure_ready`]; otherwise the transport's error.
    pub async fn submit(&self, bytecode: &Bytecode) -> Result<Vec<Value>, DriverError> {
        self.ensure_ready()?;
        tracing::debug!(channel = %self.transport.channel(), bytecode = %bytecode, "submit");
        Ok(self.transport.send(bytecode).await?)
    }

    /// Wait for the handshake, then submit
    ///
    /// # Errors
    /// The handshake failure, or the transport's error.
    pub async fn submit_when_ready(&self, bytecode: &Bytecode) -> Result<Vec<Value>, DriverError> {
        self.handshake.wait().await.map_err(DriverError::from)?;
        self.submit(bytecode).await
    }

    /// Submit several programs concurrently, results in input order
    pub async fn submit_all(&self, programs: &[Bytecode]) -> Vec<Result<Vec<Value>, DriverError>> {
        join_all(programs.iter().map(|bytecode| self.submit(bytecode))).await
    }
}

impl<T> Client<T> {
    /// Failure recorded on the handshake, if any
    #[must_use]
    pub fn failure(&self) -> Option<HandshakeFailure> {
        match self.handshake.state() {
            HandshakeState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trav_core::{Instruction, MachineConfig, Strategy};

    fn program() -> Bytecode {
        Bytecode::new().step(Instruction::new("inject").arg(1i64))
    }

    #[tokio::test]
    async fn pending_handshake_blocks_submission() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();
        let handshake = HandshakeFuture::new(ChannelId::new());
        let client = Client::new(transport, handshake.clone());

        let err = client.submit(&program()).await.unwrap_err();
        assert!(matches!(err, DriverError::HandshakePending { channel } if channel == handshake.channel()));
    }

    #[tokio::test]
    async fn failed_handshake_blocks_submission() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();
        let handshake = HandshakeFuture::new(ChannelId::new());
        handshake.try_fail(HandshakeFailure::Timeout { timeout_ms: 100 });
        let client = Client::new(transport, handshake);

        let err = client.submit(&program()).await.unwrap_err();
        assert_eq!(err.to_string(), "handshake not completed in stipulated time=[100]ms");
        assert_eq!(client.failure(), Some(HandshakeFailure::Timeout { timeout_ms: 100 }));
    }

    #[tokio::test]
    async fn ready_client_sends_once() {
        let channel = ChannelId::new();
        let mut transport = MockTransport::new();
        transport.expect_channel().return_const(channel);
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(vec![Value::Long(1)]));
        let handshake = HandshakeFuture::new(channel);
        handshake.try_succeed();
        let client = Client::new(transport, handshake);

        assert_eq!(client.submit(&program()).await.unwrap(), vec![Value::Long(1)]);
    }

    #[tokio::test]
    async fn transport_errors_surface() {
        let channel = ChannelId::new();
        let mut transport = MockTransport::new();
        transport.expect_channel().return_const(channel);
        transport.expect_send().returning(move |_| {
            Err(TransportError::Unavailable {
                channel,
                reason: "broken pipe".into(),
            })
        });
        let handshake = HandshakeFuture::new(channel);
        handshake.try_succeed();
        let client = Client::new(transport, handshake);

        let err = client.submit(&program()).await.unwrap_err();
        assert!(matches!(err, DriverError::Transport(TransportError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn local_transport_runs_bytecode() {
        let transport = LocalTransport::default();
        let bytecode = program().step(Instruction::new("incr"));
        assert_eq!(transport.send(&bytecode).await.unwrap(), vec![Value::Long(2)]);
    }

    #[tokio::test]
    async fn local_transport_reports_compile_errors() {
        let transport = LocalTransport::default();
        let bytecode = Bytecode::new().step(Instruction::new("teleport"));
        let err = transport.send(&bytecode).await.unwrap_err();
        assert!(matches!(err, TransportError::Compile(_)));
    }

    #[tokio::test]
    async fn local_transport_reuses_one_worker_pool() {
        let compiler = Compiler::with_defaults().with_config(
            MachineConfig::new()
                .with_strategy(Strategy::Parallel)
                .with_worker_threads(2),
        );
        let transport = LocalTransport::new(compiler);
        let bytecode = program().step(Instruction::new("incr"));
        assert_eq!(transport.send(&bytecode).await.unwrap(), vec![Value::Long(2)]);
        let pool = transport.compiler().worker_pool().unwrap();
        assert_eq!(transport.send(&bytecode).await.unwrap(), vec![Value::Long(2)]);
        assert!(Arc::ptr_eq(&pool, &transport.compiler().worker_pool().unwrap()));
    }
}
