use anyhow::Result;
use clap::Parser;
use meetsync::{
    app,
    cli::{
        handle_end_command, handle_join_command, handle_meetings_command, handle_status_command,
        handle_transcript_command, Cli, CliCommand,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("meetsync {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Status) => {
            return handle_status_command().await;
        }
        Some(CliCommand::Meetings(args)) => {
            return handle_meetings_command(args).await;
        }
        Some(CliCommand::Join(args)) => {
            return handle_join_command(args).await;
        }
        Some(CliCommand::End(args)) => {
            return handle_end_command(args).await;
        }
        Some(CliCommand::Transcript(args)) => {
            return handle_transcript_command(args).await;
        }
        None => {}
    }

    app::run_service().await
}
