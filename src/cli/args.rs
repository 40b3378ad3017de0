use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "meetsync")]
#[command(about = "Real-time meeting sync companion for Meeting Copilot", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// Show the sync connection status of the running service
    Status,
    /// List meetings (active by default, full history with --all)
    Meetings(MeetingsCliArgs),
    /// Ask the backend agent to join a meeting
    Join(JoinCliArgs),
    /// Ask the backend agent to leave a meeting
    End(EndCliArgs),
    /// Print the transcript of a captured meeting
    Transcript(TranscriptCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct MeetingsCliArgs {
    /// Show the full meeting history instead of active meetings
    #[arg(long)]
    pub all: bool,
}

#[derive(ClapArgs, Debug)]
pub struct JoinCliArgs {
    /// URL of the meeting to join
    pub meeting_url: String,
    /// Platform the meeting runs on (zoom, google_meet, teams)
    #[arg(short, long, default_value = "zoom")]
    pub platform: String,
    /// Display title for the meeting
    #[arg(short, long)]
    pub title: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct EndCliArgs {
    /// ID of the meeting to end
    pub meeting_id: String,
}

#[derive(ClapArgs, Debug)]
pub struct TranscriptCliArgs {
    /// ID of the meeting to fetch the transcript for
    pub meeting_id: String,
}
