//! CLI handler for the status command.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::cli::base_url;

pub async fn handle_status_command() -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/status", base_url()))
        .send()
        .await
        .context("Failed to connect to meetsync service. Is it running?")?;

    let json: Value = response.json().await?;

    let state = json
        .get("state")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let active = json
        .get("active_meetings")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    println!("Connection: {}", state);

    if let Some(connected_at) = json.get("connected_at").and_then(|v| v.as_str()) {
        println!("Connected since: {}", connected_at);
    }

    println!("Active meetings: {}", active);

    if let Some(error) = json.get("last_error").and_then(|v| v.as_str()) {
        println!("Last error: {}", error);
    }

    Ok(())
}
