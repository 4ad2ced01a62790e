use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shorts")]
#[command(about = "A terminal viewer for a paginated shorts video feed", long_about = None)]
pub struct Cli {
    /// Base URL of the feed server (default: http://localhost:8080)
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Number of items requested per page
    #[arg(short = 's', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Command used to play videos (receives the video URL as its argument)
    #[arg(short, long, value_name = "CMD")]
    pub player: Option<String>,

    /// Play each short as soon as it is shown
    #[arg(short, long)]
    pub autoplay: bool,

    /// Give up on a feed request after this many seconds (default: no timeout)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Theme name
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/shorts)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,
}
