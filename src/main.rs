#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use clap::Parser;
use fltk::app;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shard::app::domain::messages::Message;
use shard::app::domain::settings::EditorSettings;
use shard::app::infrastructure::error::AppError;
use shard::app::infrastructure::shell::{register_open_with, unregister_open_with};
use shard::app::services::instance::{absolute_paths, HandoffRequest, InstanceChannel, POLL_INTERVAL};
use shard::app::state::AppState;

/// Shard - a terminal-styled plain-text editor
#[derive(Parser, Debug)]
#[command(name = "shard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to open, one window each
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Add Shard to the Explorer "Open With" menu for the current user
    #[arg(long, conflicts_with = "unregister_shell")]
    register_shell: bool,

    /// Remove the "Open With" entry again
    #[arg(long)]
    unregister_shell: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::from_level(log_level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn run_shell_command(args: &Args) -> Option<ExitCode> {
    if !args.register_shell && !args.unregister_shell {
        return None;
    }

    let result = if args.register_shell {
        std::env::current_exe()
            .map_err(AppError::from)
            .and_then(|exe| register_open_with(&exe))
    } else {
        unregister_open_with()
    };

    Some(match result {
        Ok(()) => {
            tracing::info!("Shell integration updated");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("shard: {}", e);
            ExitCode::FAILURE
        }
    })
}

enum Launch {
    /// This process runs the event loop; `None` when the hand-off
    /// directory is unusable.
    Primary(Option<InstanceChannel>),
    /// A running Shard took the files.
    Forwarded,
}

/// Hand the files to a running Shard if there is one.
fn claim_or_forward(files: &[PathBuf]) -> Launch {
    let mut channel = InstanceChannel::new(InstanceChannel::default_dir());

    if channel.primary_alive(SystemTime::now()) {
        let cwd = std::env::current_dir().unwrap_or_default();
        let request = HandoffRequest {
            paths: absolute_paths(files, &cwd),
        };
        match channel.enqueue(&request) {
            Ok(()) => {
                tracing::info!(files = files.len(), "forwarded to running instance");
                return Launch::Forwarded;
            }
            Err(e) => tracing::warn!("Could not reach running instance: {}", e),
        }
    }

    match channel.claim() {
        Ok(()) => Launch::Primary(Some(channel)),
        Err(e) => {
            tracing::warn!("Running without single-instance support: {}", e);
            Launch::Primary(None)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    tracing::info!("Starting Shard v{}", env!("CARGO_PKG_VERSION"));

    if let Some(code) = run_shell_command(&args) {
        return code;
    }

    let instance = match claim_or_forward(&args.files) {
        Launch::Primary(instance) => instance,
        Launch::Forwarded => return ExitCode::SUCCESS,
    };

    let app = app::App::default().load_system_fonts();
    let (s, r) = app::channel::<Message>();

    // Timeouts also fire inside alerts, file choosers and dialog loops, so
    // the heartbeat stays fresh while the dispatch loop is blocked.
    if let Some(mut heartbeat) = instance.clone() {
        app::add_timeout3(POLL_INTERVAL, move |handle| {
            if let Err(e) = heartbeat.heartbeat(SystemTime::now()) {
                tracing::warn!("Failed to refresh instance heartbeat: {}", e);
            }
            s.send(Message::PollInstanceQueue);
            app::repeat_timeout3(POLL_INTERVAL, handle);
        });
    }

    let mut state = AppState::new(EditorSettings::load(), s, instance);
    state.open_paths(&args.files);
    state.ensure_window();

    while app.wait() {
        if let Some(msg) = r.recv() {
            match msg {
                Message::FileNew(_) => state.file_new(),
                Message::FileOpen(id) => state.file_open(id),
                Message::FileSave(id) => {
                    state.file_save(id);
                }
                Message::FileSaveAs(id) => {
                    state.file_save_as(id);
                }
                Message::WindowClose(id) => {
                    if state.close_window(id) {
                        break;
                    }
                }
                Message::OpenSettings(id) => state.open_settings(id),
                Message::TogglePin(id) => state.toggle_pin(id),
                Message::BufferModified(id) => state.on_buffer_modified(id),
                Message::CursorMoved(id) => state.on_cursor_moved(id),
                Message::PollInstanceQueue => state.poll_instance_queue(),
            }
        }
    }

    state.shutdown();
    tracing::info!("Shard exiting");
    ExitCode::SUCCESS
}
