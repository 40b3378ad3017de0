//! CLI handlers for meeting commands.
//!
//! All commands communicate with the running service via its HTTP API.

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::cli::args::{EndCliArgs, JoinCliArgs, MeetingsCliArgs, TranscriptCliArgs};
use crate::cli::base_url;

pub async fn handle_meetings_command(args: MeetingsCliArgs) -> Result<()> {
    if args.all {
        list_history().await
    } else {
        list_active().await
    }
}

async fn list_active() -> Result<()> {
    let json = get_json("/meetings/active").await?;

    let meetings = json
        .get("meetings")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if meetings.is_empty() {
        println!("No active meetings.");
        return Ok(());
    }

    println!("Active meetings:");
    for meeting in &meetings {
        print_meeting_line(meeting);
    }

    Ok(())
}

async fn list_history() -> Result<()> {
    let json = get_json("/meetings").await?;

    let meetings = json
        .get("meetings")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if meetings.is_empty() {
        println!("No meetings recorded yet.");
        return Ok(());
    }

    for meeting in &meetings {
        print_meeting_line(meeting);
    }

    Ok(())
}

pub async fn handle_join_command(args: JoinCliArgs) -> Result<()> {
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "meeting_url": args.meeting_url,
        "platform": crate::meeting::Platform::parse(&args.platform),
        "title": args.title,
    });

    let response = client
        .post(format!("{}/meetings/join", base_url()))
        .json(&body)
        .send()
        .await
        .context("Failed to connect to meetsync service. Is it running?")?;

    let status = response.status();
    let json: Value = response.json().await?;

    if !status.is_success() {
        bail!(
            "Failed to join meeting: {}",
            json.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
        );
    }

    println!(
        "Agent is joining the meeting (id: {})",
        json.get("meeting_id").and_then(|v| v.as_str()).unwrap_or("?")
    );

    Ok(())
}

pub async fn handle_end_command(args: EndCliArgs) -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/meetings/{}/end", base_url(), args.meeting_id))
        .send()
        .await
        .context("Failed to connect to meetsync service. Is it running?")?;

    let status = response.status();
    let json: Value = response.json().await?;

    if !status.is_success() {
        bail!(
            "Failed to end meeting: {}",
            json.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
        );
    }

    println!("Agent is leaving meeting {}", args.meeting_id);

    Ok(())
}

pub async fn handle_transcript_command(args: TranscriptCliArgs) -> Result<()> {
    let json = get_json(&format!("/meetings/{}/transcript", args.meeting_id)).await?;

    match json.get("transcript").and_then(|v| v.as_str()) {
        Some(transcript) if !transcript.is_empty() => println!("{}", transcript),
        _ => println!("No transcript available for meeting {}.", args.meeting_id),
    }

    Ok(())
}

async fn get_json(path: &str) -> Result<Value> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}{}", base_url(), path))
        .send()
        .await
        .context("Failed to connect to meetsync service. Is it running?")?;

    let status = response.status();
    let json: Value = response.json().await?;

    if !status.is_success() {
        bail!(
            "Request failed: {}",
            json.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
        );
    }

    Ok(json)
}

fn print_meeting_line(meeting: &Value) {
    let id = meeting
        .get("meeting_id")
        .and_then(|v| v.as_str())
        .unwrap_or("?");
    let title = meeting
        .get("title")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled");
    let platform = meeting
        .get("platform")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let status = meeting
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let started = meeting
        .get("start_time")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    println!("{} {} [{} / {}] {}", id, title, platform, status, started);
}
