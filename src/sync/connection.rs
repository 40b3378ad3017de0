//! WebSocket connection lifecycle.
//!
//! Owns the single live session against the backend push stream:
//! connect → dispatch inbound frames → emit heartbeat probes → detect
//! closure → reconnect after a fixed delay. A shutdown signal cancels any
//! pending reconnect and closes an open session cleanly.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;

use super::dispatcher::EventDispatcher;
use super::heartbeat::Heartbeat;
use super::status::{ConnectionStatusHandle, SessionId};
use super::{SyncError, SyncNotification};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct ConnectionManager {
    ws_url: String,
    reconnect_delay: Duration,
    heartbeat_interval: Duration,
    dispatcher: EventDispatcher,
    status: ConnectionStatusHandle,
    notify: broadcast::Sender<SyncNotification>,
    shutdown: watch::Receiver<bool>,
}

impl ConnectionManager {
    pub fn new(
        ws_url: String,
        config: &SyncConfig,
        dispatcher: EventDispatcher,
        status: ConnectionStatusHandle,
        notify: broadcast::Sender<SyncNotification>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ws_url,
            reconnect_delay: config.reconnect_delay(),
            heartbeat_interval: config.heartbeat_interval(),
            dispatcher,
            status,
            notify,
            shutdown,
        }
    }

    /// Connect and keep reconnecting until shutdown. One session is live at
    /// a time; a new one is only opened after the previous closed.
    pub async fn run(self) {
        info!("Connecting to meeting stream at {}", self.ws_url);

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            self.status.set_connecting().await;
            match connect_async(self.ws_url.as_str()).await {
                Ok((ws, _response)) => {
                    let session = SessionId::new();
                    self.status.set_open(session).await;
                    let _ = self.notify.send(SyncNotification::Connected);
                    info!("Meeting stream connected (session {})", session);

                    let reason = self.run_session(ws, session).await;
                    self.status
                        .set_closed(reason.as_ref().map(|e| e.to_string()))
                        .await;
                    let _ = self.notify.send(SyncNotification::Disconnected);

                    match reason {
                        Some(reason) => warn!("Meeting stream disconnected: {}", reason),
                        // No reason means we closed it ourselves on shutdown
                        None => break,
                    }
                }
                Err(e) => {
                    self.status.set_closed(Some(e.to_string())).await;
                    warn!("Failed to connect to meeting stream: {}", e);
                }
            }

            if *self.shutdown.borrow() {
                break;
            }
            debug!("Reconnecting in {:?}", self.reconnect_delay);
            let mut shutdown = self.shutdown.clone();
            tokio::select! {
                _ = sleep(self.reconnect_delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("Meeting stream connection manager stopped");
    }

    /// Drive one open session until it ends. Returns the close reason, or
    /// `None` when the session was closed by shutdown.
    async fn run_session(&self, ws: WsStream, session: SessionId) -> Option<SyncError> {
        let (mut sink, mut stream) = ws.split();
        let heartbeat = Heartbeat::new(self.status.clone());
        let mut shutdown = self.shutdown.clone();

        // First probe one full interval after open, never at connect time
        let mut probes = interval_at(
            Instant::now() + self.heartbeat_interval,
            self.heartbeat_interval,
        );
        probes.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // The flag only ever flips to true; a dropped sender also
                // means the service is going down
                _ = shutdown.changed() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return None;
                }
                _ = probes.tick() => {
                    let frame = heartbeat.probe().await;
                    if let Err(e) = sink.send(Message::Text(frame.into())).await {
                        return Some(SyncError::Transport(format!("heartbeat send failed: {}", e)));
                    }
                }
                inbound = stream.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        self.dispatcher.dispatch(session, text.as_str()).await;
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            return Some(SyncError::Transport("pong send failed".to_string()));
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        return Some(SyncError::Transport("closed by server".to_string()));
                    }
                    Some(Ok(other)) => {
                        debug!("Ignoring non-text frame: {:?}", other);
                    }
                    Some(Err(e)) => {
                        return Some(e.into());
                    }
                    None => {
                        return Some(SyncError::Transport("stream ended".to_string()));
                    }
                }
            }
        }
    }
}
