//! End-to-end sync tests against an in-process WebSocket server.
//!
//! Each test binds a real listener on 127.0.0.1:0, scripts the frames the
//! server pushes per accepted connection, and asserts that the registry
//! converges to server truth.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use meetsync::config::SyncConfig;
use meetsync::meeting::{ActiveMeetingRegistry, Meeting, MeetingStatus, Platform};
use meetsync::sync::{
    ConnectionManager, ConnectionStatusHandle, EventDispatcher, SyncNotification,
};

const WAIT: Duration = Duration::from_secs(5);

/// Everything a test needs to drive one connection manager.
struct Harness {
    registry: ActiveMeetingRegistry,
    status: ConnectionStatusHandle,
    notifications: broadcast::Receiver<SyncNotification>,
    shutdown: watch::Sender<bool>,
    manager: tokio::task::JoinHandle<()>,
}

fn test_config(heartbeat_interval_ms: u64) -> SyncConfig {
    SyncConfig {
        reconnect_delay_ms: 100,
        heartbeat_interval_ms,
    }
}

fn start_manager(ws_url: String, config: SyncConfig) -> Harness {
    let registry = ActiveMeetingRegistry::default();
    let status = ConnectionStatusHandle::default();
    let (notify_tx, notifications) = broadcast::channel(64);
    let (shutdown, shutdown_rx) = watch::channel(false);

    let dispatcher = EventDispatcher::new(registry.clone(), status.clone(), notify_tx.clone());
    let manager = ConnectionManager::new(
        ws_url,
        &config,
        dispatcher,
        status.clone(),
        notify_tx,
        shutdown_rx,
    );

    Harness {
        registry,
        status,
        notifications,
        shutdown,
        manager: tokio::spawn(manager.run()),
    }
}

async fn accept_ws(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    timeout(WAIT, tokio_tungstenite::accept_async(stream))
        .await
        .unwrap()
        .unwrap()
}

/// Poll until `check` returns true or the deadline passes.
async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if check().await {
            return;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("condition not reached within {:?}", WAIT);
        }
        sleep(Duration::from_millis(20)).await;
    }
}

async fn shutdown_and_join(harness: Harness) {
    let _ = harness.shutdown.send(true);
    timeout(WAIT, harness.manager).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_incremental_events_update_registry() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());

    let harness = start_manager(ws_url, test_config(30000));

    let mut ws = accept_ws(&listener).await;
    ws.send(Message::Text(
        r#"{"type":"meeting_started","meeting":{"meeting_id":"m1","title":"Standup","platform":"zoom","start_time":"2024-01-01T09:00:00Z"}}"#.to_string().into(),
    ))
    .await
    .unwrap();
    ws.send(Message::Text(
        r#"{"type":"meeting_started","meeting":{"meeting_id":"m2","title":"Retro","platform":"google_meet"}}"#.to_string().into(),
    ))
    .await
    .unwrap();

    let registry = harness.registry.clone();
    wait_until(|| {
        let registry = registry.clone();
        async move { registry.len().await == 2 }
    })
    .await;

    let meeting = harness.registry.get("m1").await.unwrap();
    assert_eq!(meeting.title, "Standup");
    assert_eq!(meeting.platform, Platform::Zoom);
    assert_eq!(meeting.status, MeetingStatus::Active);

    ws.send(Message::Text(
        r#"{"type":"meeting_ended","meeting_id":"m1"}"#.to_string().into(),
    ))
    .await
    .unwrap();

    let registry = harness.registry.clone();
    wait_until(|| {
        let registry = registry.clone();
        async move { registry.get("m1").await.is_none() }
    })
    .await;
    assert_eq!(harness.registry.len().await, 1);

    shutdown_and_join(harness).await;
}

#[tokio::test]
async fn test_full_snapshot_overwrites_local_state() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());

    let harness = start_manager(ws_url, test_config(30000));

    // Local state has drifted: m3 is still present on our side
    harness
        .registry
        .upsert(Meeting {
            meeting_id: "m3".to_string(),
            title: "Stale".to_string(),
            platform: Platform::Teams,
            start_time: None,
            status: MeetingStatus::Active,
        })
        .await;

    let mut ws = accept_ws(&listener).await;
    ws.send(Message::Text(
        r#"{"type":"meetings_update","meetings":[{"meeting_id":"m1"},{"meeting_id":"m2"}]}"#
            .to_string()
            .into(),
    ))
    .await
    .unwrap();

    let registry = harness.registry.clone();
    wait_until(|| {
        let registry = registry.clone();
        async move {
            registry.len().await == 2 && registry.get("m3").await.is_none()
        }
    })
    .await;

    let ids: Vec<String> = harness
        .registry
        .snapshot()
        .await
        .into_iter()
        .map(|m| m.meeting_id)
        .collect();
    assert_eq!(ids, vec!["m1", "m2"]);

    shutdown_and_join(harness).await;
}

#[tokio::test]
async fn test_reconnects_after_server_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());

    let mut harness = start_manager(ws_url, test_config(30000));

    // First session: one event, then the server drops the connection
    let mut ws = accept_ws(&listener).await;
    ws.send(Message::Text(
        r#"{"type":"meeting_started","meeting":{"meeting_id":"m1"}}"#
            .to_string()
            .into(),
    ))
    .await
    .unwrap();
    let registry = harness.registry.clone();
    wait_until(|| {
        let registry = registry.clone();
        async move { registry.len().await == 1 }
    })
    .await;
    ws.close(None).await.unwrap();
    drop(ws);

    // Second session after the fixed reconnect delay
    let mut ws = accept_ws(&listener).await;
    ws.send(Message::Text(
        r#"{"type":"meeting_started","meeting":{"meeting_id":"m2"}}"#
            .to_string()
            .into(),
    ))
    .await
    .unwrap();

    let registry = harness.registry.clone();
    wait_until(|| {
        let registry = registry.clone();
        async move { registry.len().await == 2 }
    })
    .await;

    // Both sessions announced themselves
    let mut connects = 0;
    while let Ok(notification) = harness.notifications.try_recv() {
        if matches!(notification, SyncNotification::Connected) {
            connects += 1;
        }
    }
    assert_eq!(connects, 2);

    shutdown_and_join(harness).await;
}

#[tokio::test]
async fn test_bad_frames_do_not_poison_the_stream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());

    let harness = start_manager(ws_url, test_config(30000));

    let mut ws = accept_ws(&listener).await;
    for frame in [
        "not json at all",
        r#"{"no_type_field":true}"#,
        r#"{"type":"speaker_changed","speaker":"alice"}"#,
        r#"{"type":"meeting_started","meeting":{"meeting_id":"m1"}}"#,
    ] {
        ws.send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    let registry = harness.registry.clone();
    wait_until(|| {
        let registry = registry.clone();
        async move { registry.len().await == 1 }
    })
    .await;
    assert!(harness.registry.get("m1").await.is_some());

    shutdown_and_join(harness).await;
}

#[tokio::test]
async fn test_heartbeat_probes_only_while_open() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());

    // Fast heartbeat so the test observes several probes
    let harness = start_manager(ws_url, test_config(50));

    let received = Arc::new(Mutex::new(Vec::<String>::new()));
    let server_frames = received.clone();
    let mut ws = accept_ws(&listener).await;
    let server = tokio::spawn(async move {
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                server_frames.lock().await.push(text.to_string());
            }
        }
    });

    let frames = received.clone();
    wait_until(|| {
        let frames = frames.clone();
        async move { frames.lock().await.len() >= 2 }
    })
    .await;

    for frame in received.lock().await.iter() {
        let value: serde_json::Value = serde_json::from_str(frame).unwrap();
        assert_eq!(value["type"], "ping");
        assert!(value["timestamp"].is_i64());
    }

    // After shutdown the session is closed and probes stop
    shutdown_and_join(harness).await;
    timeout(WAIT, server).await.unwrap().unwrap();

    let count = received.lock().await.len();
    sleep(Duration::from_millis(200)).await;
    assert_eq!(received.lock().await.len(), count);
}

#[tokio::test]
async fn test_shutdown_cancels_pending_reconnect() {
    // Nothing is listening here, so every connect attempt fails and the
    // manager sits in its reconnect delay
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let harness = start_manager(ws_url, test_config(30000));
    sleep(Duration::from_millis(50)).await;

    let _ = harness.shutdown.send(true);
    timeout(WAIT, harness.manager).await.unwrap().unwrap();

    let status = harness.status.get().await;
    assert_eq!(status.state.as_str(), "closed");
    assert!(status.last_error.is_some());
}
