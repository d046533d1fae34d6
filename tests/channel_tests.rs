#![allow(dead_code, unused_imports)]
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockElm;
use scantool::elm::ElmChannel;
use scantool::Error;

static CONCURRENT_TIMEOUT_MS: u64 = 1000;

#[tokio::test]
async fn channel_test_execute_round_trip() {
    let mock = MockElm::new();
    let state = mock.state();
    let channel = ElmChannel::new(mock);

    assert_eq!(channel.execute("ATI").await.unwrap(), "OK");
    assert_eq!(channel.execute("010C").await.unwrap(), "410C1AF8");
    assert_eq!(state.lock().unwrap().commands, vec!["ATI", "010C"]);

    channel.close();
}

/// Issues a pile of overlapping requests and checks every caller gets the reply to
/// its own command. The adapter is half duplex, so any interleaving on the wire
/// would garble the replies.
#[tokio::test]
async fn channel_test_concurrent_commands_serialize() {
    let mock = MockElm::new();
    let state = mock.state();
    let channel = ElmChannel::new(mock);

    let requests: Vec<_> = (0..4)
        .flat_map(|_| ["010C", "010D", "0105"])
        .map(|command| channel.execute(command))
        .collect();

    let replies = tokio::time::timeout(
        Duration::from_millis(CONCURRENT_TIMEOUT_MS),
        futures::future::join_all(requests),
    )
    .await
    .unwrap();

    for (i, reply) in replies.into_iter().enumerate() {
        let expected = match i % 3 {
            0 => "410C1AF8",
            1 => "410D41",
            _ => "410573",
        };
        assert_eq!(reply.unwrap(), expected);
    }
    assert_eq!(state.lock().unwrap().commands.len(), 12);

    channel.close();
}

#[tokio::test]
async fn channel_test_silent_adapter_times_out() {
    let mock = MockElm::new();
    let state = mock.state();
    state.lock().unwrap().stall_command = Some("010C".into());
    let channel = ElmChannel::new(mock);

    match channel.execute("010C").await {
        Err(Error::Timeout) => {}
        other => panic!("Expected Timeout error, got {:?}", other),
    }

    // A timeout only fails the one exchange, the channel stays usable.
    assert_eq!(channel.execute("010D").await.unwrap(), "410D41");

    channel.close();
}

#[tokio::test]
async fn channel_test_close_rejects_commands() {
    let channel = ElmChannel::new(MockElm::new());

    assert!(channel.is_connected());
    channel.close();
    channel.close();
    assert!(!channel.is_connected());

    match channel.execute("010C").await {
        Err(Error::NotConnected) => {}
        other => panic!("Expected NotConnected error, got {:?}", other),
    }
}

#[tokio::test]
async fn channel_test_close_interrupts_stalled_exchange() {
    let mock = MockElm::new();
    let state = mock.state();
    state.lock().unwrap().stall_command = Some("010C".into());
    let channel = Arc::new(ElmChannel::new(mock));

    let in_flight = tokio::spawn({
        let channel = channel.clone();
        async move { channel.execute("010C").await }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    channel.close();

    match in_flight.await.unwrap() {
        Err(Error::ConnectionClosed) => {}
        other => panic!("Expected ConnectionClosed error, got {:?}", other),
    }
}
