use crate::api::ApiServer;
use crate::backend::{AgentClient, MeetingBackend};
use crate::config::Config;
use crate::meeting::ActiveMeetingRegistry;
use crate::sync::{ConnectionManager, ConnectionStatusHandle, EventDispatcher, SyncNotification};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

pub async fn run_service() -> Result<()> {
    info!("Starting meetsync service");

    let config = Config::load()?;

    let registry = ActiveMeetingRegistry::default();
    let status = ConnectionStatusHandle::default();
    let (notify_tx, _) = broadcast::channel::<SyncNotification>(64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let backend: Arc<dyn MeetingBackend> = Arc::new(AgentClient::from_config(&config.server));

    let dispatcher = EventDispatcher::new(registry.clone(), status.clone(), notify_tx.clone());
    let manager = ConnectionManager::new(
        config.server.ws_url(),
        &config.sync,
        dispatcher,
        status.clone(),
        notify_tx.clone(),
        shutdown_rx,
    );
    let manager_handle = tokio::spawn(manager.run());

    let api_server = ApiServer::new(registry.clone(), status.clone(), backend.clone(), &config);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("meetsync is ready");

    let mut notifications = notify_tx.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
            notification = notifications.recv() => match notification {
                Ok(SyncNotification::Connected) => info!("Connected to meeting stream"),
                Ok(SyncNotification::Disconnected) => info!("Disconnected from meeting stream"),
                Ok(SyncNotification::MeetingStarted { meeting_id }) => {
                    info!("Meeting {} is now active", meeting_id);
                }
                Ok(SyncNotification::MeetingEnded { meeting_id }) => {
                    info!("Meeting {} ended", meeting_id);
                    refresh_history(backend.clone());
                }
                Ok(SyncNotification::MeetingsUpdated { count }) => {
                    debug!("Active meeting list reconciled ({} meetings)", count);
                }
                Ok(SyncNotification::TranscriptUpdate { text }) => {
                    debug!("Transcript update received ({} chars)", text.len());
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Notification loop lagged, {} notifications dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = manager_handle.await;

    Ok(())
}

/// A meeting just ended, so the backend's history has a new entry. Fetch it
/// in the background; failure here is a transient notice, nothing more.
fn refresh_history(backend: Arc<dyn MeetingBackend>) {
    tokio::spawn(async move {
        match backend.list_meetings().await {
            Ok(meetings) => info!("Meeting history refreshed ({} meetings)", meetings.len()),
            Err(e) => warn!("Failed to refresh meeting history: {}", e),
        }
    });
}
