//! Playout Scheduler (playout-sched) - Main entry point
//!
//! Plans, exports and runs timed playlists. `run` drives the logging
//! (dry-run) scene switcher and takes operator commands on stdin.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use playout_common::{format_hms, parse_hms, ScheduleEvent};
use playout_sched::broadcast::{BroadcastStatus, ControllerSettings};
use playout_sched::config::TomlConfig;
use playout_sched::export::write_exports;
use playout_sched::ingest::{ingest, FfprobeProbe};
use playout_sched::switcher::DryRunSwitcher;
use playout_sched::{BroadcastController, Entry, SystemClock, Timeline, EMERGENCY_SCENE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Command-line arguments for playout-sched
#[derive(Parser, Debug)]
#[command(name = "playout-sched")]
#[command(about = "Timed playlist scheduler for unattended playout")]
#[command(version)]
struct Args {
    /// Config file (overrides PLAYOUT_CONFIG and the per-user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "PLAYOUT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the inputs and print the schedule
    Plan {
        /// Media files and/or folders, in playout order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Write an M3U playlist and a JSON schedule
    Export {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Playlist path; the schedule goes to <stem>_schedule.json beside it
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run a broadcast against the dry-run scene switcher
    Run {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Schedule position to start at ([-]HH:MM:SS, MM:SS or seconds)
        #[arg(long, default_value = "0", allow_hyphen_values = true, value_parser = parse_offset)]
        start_offset: f64,

        /// Create scenes and media sources before starting
        #[arg(long)]
        prepare: bool,
    },
}

/// Filter level until the config file has been read
const DEFAULT_LOG_LEVEL: &str = "info";

fn filter_directive(level: &str) -> String {
    format!("playout_sched={level},playout_common={level}")
}

/// Level from `[logging].level`, if RUST_LOG and --log-level both left it open
fn config_level_override<'a>(
    env_filter_set: bool,
    cli_level: Option<&str>,
    config_level: &'a str,
) -> Option<&'a str> {
    if env_filter_set || cli_level.is_some() || config_level == DEFAULT_LOG_LEVEL {
        return None;
    }
    Some(config_level)
}

fn parse_offset(value: &str) -> std::result::Result<f64, String> {
    parse_hms(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing comes up before the config load so its logs are kept;
    // `[logging].level` is swapped in afterwards through the reload handle.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().ok();
    let env_filter_set = env_filter.is_some();
    let startup_level = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| filter_directive(startup_level).into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) =
        config_level_override(env_filter_set, args.log_level.as_deref(), &config.logging.level)
    {
        if let Err(e) = filter_handle.reload(filter_directive(level)) {
            warn!("Failed to apply log level {:?} from config: {}", level, e);
        }
    }

    info!("Starting playout-sched v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Plan { inputs } => {
            let timeline = load_timeline(&inputs, &config).await?;
            print_plan(&timeline, &config);
        }
        Command::Export { inputs, output } => {
            let timeline = load_timeline(&inputs, &config).await?;
            let paths = write_exports(&timeline, &config.naming.scene_naming(), &output)
                .context("Failed to export schedule")?;
            println!("M3U file:      {}", paths.m3u.display());
            println!("JSON schedule: {}", paths.schedule_json.display());
            println!(
                "Total: {} entries, {}",
                timeline.len(),
                format_hms(timeline.total_duration())
            );
        }
        Command::Run {
            inputs,
            start_offset,
            prepare,
        } => {
            let timeline = load_timeline(&inputs, &config).await?;
            run_broadcast(timeline, &config, start_offset, prepare).await?;
        }
    }

    Ok(())
}

async fn load_timeline(inputs: &[PathBuf], config: &TomlConfig) -> Result<Timeline> {
    let probe = FfprobeProbe::new(&config.probe);
    let entries: Vec<Entry> = ingest(inputs, &probe)
        .await
        .context("Failed to ingest media")?;
    Ok(Timeline::from_entries(entries))
}

fn print_plan(timeline: &Timeline, config: &TomlConfig) {
    let naming = config.naming.scene_naming();
    println!(
        "{:>4}  {:<32} {:>9} {:>9} {:>9}  {}",
        "#", "File", "Duration", "Start", "End", "Scene"
    );
    for (index, entry) in timeline.entries().iter().enumerate() {
        let start = timeline.cumulative_starts()[index];
        let end = timeline.cumulative_ends()[index];
        println!(
            "{:>4}  {:<32} {:>9} {:>9} {:>9}  {}",
            index + 1,
            entry.display_name(),
            format_hms(entry.duration_seconds()),
            format_hms(start),
            format_hms(end),
            naming.scene_name(index, entry.display_name())
        );
    }
    println!(
        "Total: {} entries, {}",
        timeline.len(),
        format_hms(timeline.total_duration())
    );
}

/// What the stdin loop should do after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

async fn run_broadcast(
    timeline: Timeline,
    config: &TomlConfig,
    start_offset: f64,
    prepare: bool,
) -> Result<()> {
    let controller = BroadcastController::new(
        timeline,
        Arc::new(DryRunSwitcher::new()),
        Arc::new(SystemClock),
        ControllerSettings::from_config(config),
    );

    if prepare {
        let report = controller.prepare().await.context("Prepare failed")?;
        info!(
            "Prepared {} scenes, {} failures",
            report.prepared,
            report.failures.len()
        );
    }

    let mut events = controller.subscribe();
    controller
        .start(start_offset)
        .await
        .context("Failed to start broadcast")?;

    println!("Commands: skip | jump <n> | emergency | status | stop");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            event = events.recv() => match event {
                Ok(event) => {
                    let ended = matches!(event, ScheduleEvent::BroadcastStopped { .. });
                    log_event(&event);
                    if ended {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => warn!("Status channel lagged, {} events dropped", n),
                Err(RecvError::Closed) => break,
            },

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if handle_command(&controller, line.trim()).await == Flow::Stop {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed; broadcast continues until Ctrl+C");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
        }
    }

    controller.stop().await.context("Failed to stop broadcast")?;
    info!("Broadcast finished");
    Ok(())
}

async fn handle_command(controller: &BroadcastController, line: &str) -> Flow {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Flow::Continue;
    };

    let result = match command.to_ascii_lowercase().as_str() {
        "skip" => controller.skip_to_next().await.map(|next| match next {
            Some(index) => println!("Skipping to entry {}", index + 1),
            None => println!("Already at the last entry"),
        }),
        "jump" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(position) if position >= 1 => controller
                .jump_to(position - 1)
                .await
                .map(|()| println!("Jumping to entry {}", position)),
            _ => {
                println!("Usage: jump <n>  (1-based entry number)");
                Ok(())
            }
        },
        "emergency" => controller.emergency_override(EMERGENCY_SCENE).await,
        "status" => {
            println!("{}", status_line(&controller.status().await));
            Ok(())
        }
        "stop" | "quit" => return Flow::Stop,
        other => {
            println!("Unknown command: {}", other);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{} failed: {}", command, e);
    }
    Flow::Continue
}

fn status_line(status: &BroadcastStatus) -> String {
    let or_dash = |seconds: Option<f64>| seconds.map_or_else(|| "-".to_string(), format_hms);
    format!(
        "running={} entry={} elapsed={} remaining={} total={} offset={:+.1}s",
        status.running,
        status
            .display_position()
            .map_or_else(|| "-".to_string(), |p| format!("{}/{}", p, status.entry_count)),
        or_dash(status.elapsed_seconds),
        or_dash(status.remaining_seconds()),
        format_hms(status.total_seconds),
        status.manual_offset_seconds.unwrap_or(0.0)
    )
}

fn log_event(event: &ScheduleEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!("event {}", json),
        Err(_) => info!("event {}", event.event_type()),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping broadcast");
        },
        _ = terminate => {
            info!("Received terminate signal, stopping broadcast");
        },
    }
}
