//! Channel handshake gating and driver configuration

use std::time::Duration;
use tokio::time::{advance, sleep};
use trav_driver::{
    ChannelId, Client, ClientEvent, ClientHandshakeHandler, DriverConfig, DriverError,
    HandshakeFailure, HandshakeState,
};
use trav_test_utils::{longs, union_of_noops, RecordingTransport};

fn handler(timeout_ms: u64) -> ClientHandshakeHandler {
    let config = DriverConfig::new().with_handshake_timeout_ms(timeout_ms);
    ClientHandshakeHandler::from_config(ChannelId::new(), &config)
}

#[tokio::test(start_paused = true)]
async fn test_completion_before_timeout_stays_successful() {
    let handler = handler(100);
    let timer = handler.arm_timeout();

    sleep(Duration::from_millis(50)).await;
    handler.handle(ClientEvent::HandshakeComplete);
    advance(Duration::from_millis(200)).await;
    timer.await.unwrap();

    // a late timeout event is a no-op as well
    handler.handle(ClientEvent::HandshakeTimeout);
    assert_eq!(handler.handshake().state(), HandshakeState::Succeeded);
    assert_eq!(handler.handshake().wait().await, Ok(()));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_handshake_times_out_with_configured_value() {
    let handler = handler(100);
    let timer = handler.arm_timeout();
    timer.await.unwrap();

    let err = handler.handshake().wait().await.unwrap_err();
    assert_eq!(err, HandshakeFailure::Timeout { timeout_ms: 100 });
    assert!(err.to_string().contains("100"));
}

#[tokio::test(start_paused = true)]
async fn test_closure_before_completion_is_not_overwritten() {
    let handler = handler(100);
    let channel = handler.handshake().channel();
    let timer = handler.arm_timeout();

    sleep(Duration::from_millis(30)).await;
    handler.handle(ClientEvent::ChannelInactive);
    handler.handle(ClientEvent::HandshakeComplete);
    timer.await.unwrap();

    let err = handler.handshake().wait().await.unwrap_err();
    assert_eq!(err, HandshakeFailure::ChannelClosed { channel });
    assert!(err.to_string().contains(&channel.to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_submit_when_ready_waits_for_handshake() {
    let handler = handler(100);
    let client = Client::new(RecordingTransport::new(longs(&[7])), handler.handshake().clone());

    let completer = {
        let handler = handler.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(20)).await;
            handler.handle(ClientEvent::HandshakeComplete);
        })
    };

    let out = client.submit_when_ready(&union_of_noops()).await.unwrap();
    completer.await.unwrap();
    assert_eq!(out, longs(&[7]));
    assert_eq!(client.transport().sent(), vec![union_of_noops()]);
}

#[tokio::test(start_paused = true)]
async fn test_submit_when_ready_reports_timeout() {
    let handler = handler(100);
    let client = Client::new(RecordingTransport::new(Vec::new()), handler.handshake().clone());
    let _timer = handler.arm_timeout();

    let err = client.submit_when_ready(&union_of_noops()).await.unwrap_err();
    assert!(matches!(
        err,
        DriverError::HandshakeFailed(HandshakeFailure::Timeout { timeout_ms: 100 })
    ));
    assert!(client.transport().sent().is_empty());
}

#[tokio::test]
async fn test_submit_all_preserves_order() {
    let handler = handler(100);
    handler.handle(ClientEvent::HandshakeComplete);
    let client = Client::new(RecordingTransport::new(longs(&[1])), handler.handshake().clone());

    let programs = vec![union_of_noops(), trav_core::Bytecode::new()];
    let results = client.submit_all(&programs).await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(client.transport().sent(), programs);
}

#[test]
fn test_handler_window_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("driver.toml");
    std::fs::write(&path, "host = \"graph.local\"\nhandshake_timeout_ms = 250\n").unwrap();

    let config = DriverConfig::from_file(&path).unwrap();
    let handler = ClientHandshakeHandler::from_config(ChannelId::new(), &config);
    assert_eq!(handler.timeout(), Duration::from_millis(250));
    assert_eq!(config.url(), "ws://graph.local:8182/gremlin");
}

#[test]
fn test_missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DriverConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, trav_core::ConfigError::Io { .. }));
    assert!(matches!(DriverError::from(err), DriverError::Config(_)));
}
