//! CLI argument parsing for nbfc-tui.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nbfc-tui")]
#[command(
    about = "Terminal control panel for NBFC - typically invoked via 'nbfc-panel tui'",
    version
)]
pub struct Cli {
    /// Config file (default: ~/.config/nbfc-panel/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Service socket, overrides the config file
    #[arg(short, long)]
    pub socket: Option<PathBuf>,

    /// Enable debug logging (logs to /tmp/nbfc-tui.log)
    #[arg(short, long)]
    pub debug: bool,
}
