use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Headless host that plays a stage cutscene script frame by frame",
    version
)]
pub struct Args {
    /// JSON script to play (defaults to the built-in rooftop demo)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Optional JSON stage config (layout and timings); missing fields keep defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame rate of the fixed-step clock
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Stop after this many frames even if the script is still running
    #[arg(long, default_value_t = 100_000)]
    pub max_frames: u64,

    /// Path to write the stage event timeline as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write per-frame actor positions as JSON
    #[arg(long)]
    pub trace_json: Option<PathBuf>,

    /// Print every stage event as it happens
    #[arg(long)]
    pub verbose: bool,
}
