use std::path::PathBuf;

use clap::Parser;

/// Check a hotel booking confirmation against the initial quote by streaming
/// screenshots to the analysis service.
#[derive(Debug, Clone, Parser)]
#[command(name = "bookcheck", version)]
pub struct Cli {
    /// Screenshots to upload: at least one quote and one booking confirmation.
    pub images: Vec<PathBuf>,

    /// Optional free-text context about the booking.
    #[arg(short, long)]
    pub context: Option<String>,

    /// Base URL of the analysis service.
    #[arg(long, env = "BOOKCHECK_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// RON settings file (defaults to ./bookcheck.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stop reading the stream after this many seconds.
    #[arg(long)]
    pub stream_timeout_secs: Option<u64>,

    /// Where operational logs are written.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Also print operational logs to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}
