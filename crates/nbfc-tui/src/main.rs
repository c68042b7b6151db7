//! NBFC TUI - Terminal control panel for the NBFC service.
//!
//! Shows one slider and auto toggle per configured fan plus the status the
//! service reports. Socket traffic runs on background workers; this task
//! owns the panel and applies polled status between key presses.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use nbfc_core::config::{Config, Directories};
use nbfc_core::{StatusSnapshot, worker};
use nbfc_rpc::NbfcClient;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::io;

mod app;
mod cli;
mod colors;
mod render;

use app::App;
use cli::Cli;

fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("nbfc-tui-{timestamp}.log");
    let log_path = std::path::Path::new("/tmp").join(&log_filename);

    let symlink_path = std::path::Path::new("/tmp/nbfc-tui.log");
    let _ = std::fs::remove_file(symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, symlink_path);

    let file_appender = tracing_appender::rolling::never("/tmp", &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
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

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = load_config(&cli)?;
    tracing::info!(
        "Starting with socket {}, {} fan slots",
        config.socket_path.display(),
        config.fans.len()
    );

    let client = NbfcClient::with_options(config.transport_options());
    let (panel, snapshots, workers) =
        worker::start(client, config.poll_interval(), config.fan_controls());

    let mut app = App::new(panel, config.slider_step());

    // Fill the status block right away rather than after the first tick
    if config.poll_interval().is_none() {
        app.panel.on_refresh_requested();
    }

    let result = run_tui(&mut app, snapshots).await;

    // Let the last key presses reach the service before the runtime goes
    workers.shutdown(app.panel).await;
    result
}

async fn run_tui(app: &mut App, mut snapshots: mpsc::UnboundedReceiver<StatusSnapshot>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, &mut snapshots).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    snapshots: &mut mpsc::UnboundedReceiver<StatusSnapshot>,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| render::render(f, app))?;
            needs_render = false;
        }

        tokio::select! {
            Some(snapshot) = snapshots.recv() => {
                app.apply_status(&snapshot);
                needs_render = true;
            }

            Some(event_result) = event_stream.next() => {
                let event = match event_result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::error!("Event stream error: {}", e);
                        continue;
                    }
                };

                match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        tracing::debug!("KEY EVENT: code={:?}", key.code);
                        needs_render |= app.handle_key(key.code);
                    }
                    Event::Resize(..) => needs_render = true,
                    _ => {}
                }
            }

            else => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
