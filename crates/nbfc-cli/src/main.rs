//! NBFC panel CLI
//!
//! Unified entry point for the NBFC panel. Provides:
//! - Default: Start the TUI panel
//! - Subcommands for one-shot status queries and speed changes

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use nbfc_core::config::{Config, Directories};
use nbfc_core::reconcile::format_temperature;
use nbfc_core::{FanSpeed, FanStatus, FanUpdate, StatusSnapshot, worker};
use nbfc_rpc::{NbfcClient, Transport};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Find a binary, preferring the dev build in target/debug if it exists
fn find_binary(name: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let dev_binary = dir.join(name);
        if dev_binary.exists() {
            return dev_binary;
        }
    }
    // Fall back to PATH lookup
    PathBuf::from(name)
}

/// Run a binary in the foreground, bailing on failure
fn run_foreground(name: &str, args: &[String]) -> Result<()> {
    let binary = find_binary(name);
    let status = Command::new(&binary)
        .args(args)
        .status()
        .with_context(|| format!("Failed to start {}. Is it installed?", binary.display()))?;
    if !status.success() {
        bail!("{name} exited with status: {status}");
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "nbfc-panel")]
#[command(about = "Control panel for the NBFC fan service", version)]
#[command(after_help = "\
Examples:
  nbfc-panel                  Open the terminal panel
  nbfc-panel status           Show temperature and fan speeds
  nbfc-panel status --json    Same, as JSON
  nbfc-panel set 0 60         Run fan 0 at 60%
  nbfc-panel set 1 auto       Hand fan 1 back to the service
  nbfc-panel watch            Print status every 2 seconds

The service socket defaults to /var/run/nbfc_service.socket and can be
changed with --socket, $NBFC_SOCKET, or socketPath in the config file.
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.config/nbfc-panel/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Service socket, overrides the config file
    #[arg(short, long, global = true)]
    socket: Option<PathBuf>,

    /// Log requests and replies to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI panel
    Tui,

    /// Show the current service status
    Status {
        /// Print the raw status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a fan to a fixed speed or back to auto
    Set {
        /// Fan index as numbered by the service
        fan: usize,

        /// Percentage 0-100, or "auto"
        speed: FanSpeed,
    },

    /// Print status periodically until interrupted
    Watch {
        /// Interval between polls
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Directories::resolve()?.config_file,
    };

    let mut config =
        Config::load(&path).with_context(|| format!("Failed to load {}", path.display()))?;
    if let Some(socket) = &cli.socket {
        config.socket_path.clone_from(socket);
    }
    Ok(config)
}

/// Arguments forwarded to nbfc-tui
fn tui_args(cli: &Cli) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(config) = &cli.config {
        args.push("--config".to_string());
        args.push(config.display().to_string());
    }
    if let Some(socket) = &cli.socket {
        args.push("--socket".to_string());
        args.push(socket.display().to_string());
    }
    if cli.verbose {
        args.push("--debug".to_string());
    }
    args
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        None | Some(Commands::Tui) => run_foreground("nbfc-tui", &tui_args(&cli)),
        Some(Commands::Status { json }) => run_status(&load_config(&cli)?, json).await,
        Some(Commands::Set { fan, speed }) => run_set(&load_config(&cli)?, fan, speed).await,
        Some(Commands::Watch { interval_ms }) => {
            run_watch(&load_config(&cli)?, Duration::from_millis(interval_ms.max(100))).await
        }
    }
}

async fn run_status(config: &Config, json: bool) -> Result<()> {
    let client = NbfcClient::with_options(config.transport_options());
    let snapshot = client
        .status()
        .await
        .with_context(|| format!("Status request to {} failed", config.socket_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", format_status(&snapshot));
    }
    Ok(())
}

async fn run_set(config: &Config, fan: usize, speed: FanSpeed) -> Result<()> {
    let client = NbfcClient::with_options(config.transport_options());
    client
        .set_fan_speed(fan, speed)
        .await
        .with_context(|| format!("Failed to set fan {fan} to {speed}"))?;

    println!("Fan {fan} set to {speed}");
    Ok(())
}

async fn run_watch(config: &Config, interval: Duration) -> Result<()> {
    let client = NbfcClient::with_options(config.transport_options());
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        }
    };

    watch(&client, interval, interrupted, |line| println!("{line}")).await;
    Ok(())
}

/// Poll every `interval` until `stop` completes, even mid-poll
async fn watch<T: Transport>(
    client: &NbfcClient<T>,
    interval: Duration,
    stop: impl Future<Output = ()>,
    mut emit: impl FnMut(String),
) {
    let mut ticker = tokio::time::interval(interval);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut stop => break,
        }

        let line = tokio::select! {
            snapshot = worker::poll_once(client) => snapshot.map_or_else(
                || "-- service unavailable --".to_string(),
                |snapshot| format_watch_line(&snapshot),
            ),
            () = &mut stop => break,
        };
        emit(line);
    }
}

fn fan_update(index: usize, fan: &FanStatus) -> FanUpdate {
    FanUpdate {
        fan_index: index,
        current_speed: fan.current_speed,
        target_speed: fan.target_speed,
        auto_mode: fan.auto_mode,
    }
}

fn format_status(snapshot: &StatusSnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!("Service: running (pid {})\n", snapshot.pid));
    if snapshot.read_only {
        out.push_str(&format!("Config: {} (read-only)\n", snapshot.config));
    } else {
        out.push_str(&format!("Config: {}\n", snapshot.config));
    }
    out.push_str(&format!(
        "Temperature: {}\n",
        format_temperature(snapshot.temperature)
    ));

    for (index, fan) in snapshot.fans.iter().enumerate() {
        let update = fan_update(index, fan);
        let critical = if fan.critical { "  CRITICAL" } else { "" };
        out.push_str(&format!(
            "Fan {index} ({}): {}  {}  {}{critical}\n",
            fan.name,
            update.speed_text(),
            update.target_text(),
            update.auto_text()
        ));
    }

    out
}

fn format_watch_line(snapshot: &StatusSnapshot) -> String {
    let mut line = format_temperature(snapshot.temperature);
    for (index, fan) in snapshot.fans.iter().enumerate() {
        let update = fan_update(index, fan);
        let mode = if update.auto_mode { "auto" } else { "manual" };
        line.push_str(&format!(
            "  fan{index} {:.1}% ({mode})",
            update.current_speed
        ));
    }
    line
}
