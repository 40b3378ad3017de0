//! Command-line interface.
//!
//! Subcommands talk to the running service through its local HTTP API, so
//! they work from any shell while the daemon owns the sync state.

pub mod args;
pub mod meeting;
pub mod status;

pub use args::{Cli, CliCommand};
pub use meeting::{
    handle_end_command, handle_join_command, handle_meetings_command, handle_transcript_command,
};
pub use status::handle_status_command;

/// Base URL of the local API, honoring a configured port.
pub fn base_url() -> String {
    let port = crate::config::Config::load()
        .map(|config| config.api.port)
        .unwrap_or_else(|_| crate::config::ApiConfig::default().port);
    format!("http://127.0.0.1:{}", port)
}
