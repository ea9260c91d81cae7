//! eventreplay CLI.
//!
//! - `eventreplay check session.json` prints what a log contains
//! - `eventreplay play session.json --fast --record out.json` replays a log headlessly
//!   and writes the re-recorded result
//! - `eventreplay record --out pad.json --seconds 10` records live gamepad input
//!   (requires the `gamepad` feature)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use eventreplay::backends::probe_backend;
use eventreplay::config::PacingMode;
use eventreplay::{DecodePolicy, EventKind, EventLog, Session, SessionConfig, VirtualBackend};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser)]
#[command(name = "eventreplay")]
#[command(about = "Record and replay input session logs")]
#[command(version)]
struct Cli {
    /// Session config (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a log and summarize it
    Check(CheckArgs),

    /// Replay a log through a headless session
    Play(PlayArgs),

    /// Record live gamepad input
    Record(RecordArgs),
}

#[derive(Args)]
struct CheckArgs {
    file: PathBuf,

    /// Skip entries that fail to decode instead of failing
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Args)]
struct PlayArgs {
    file: PathBuf,

    /// Do not wait for recorded durations
    #[arg(long)]
    fast: bool,

    /// Where to write the re-recorded log (defaults to the config's `record`)
    #[arg(long, value_name = "OUT")]
    record: Option<PathBuf>,
}

#[derive(Args)]
struct RecordArgs {
    #[arg(long)]
    out: PathBuf,

    /// How long to record for
    #[arg(long, default_value_t = 10)]
    seconds: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    match cli.command {
        Commands::Check(args) => check(args, &config),
        Commands::Play(args) => play(args, config),
        Commands::Record(args) => record(args, &config),
    }
}

fn check(args: CheckArgs, config: &SessionConfig) -> Result<()> {
    let policy = if args.skip_invalid {
        DecodePolicy::SkipInvalid
    } else {
        config.decode_policy
    };
    let log = EventLog::load_with(&args.file, policy)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for kind in log.iter().filter_map(|event| event.kind()) {
        *counts.entry(kind.name()).or_default() += 1;
    }

    println!("{}: {} event(s)", args.file.display(), log.len());
    for kind in EventKind::ALL {
        if let Some(count) = counts.get(kind.name()) {
            println!("  {:<24} {}", kind.name(), count);
        }
    }
    println!("  total elapsed            {:?}", log.total_elapsed());
    Ok(())
}

fn play(args: PlayArgs, mut config: SessionConfig) -> Result<()> {
    if args.fast {
        config.pacing = PacingMode::FastForward;
    }
    let log = EventLog::load_with(&args.file, config.decode_policy)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    info!("Playing {} event(s) from {}", log.len(), args.file.display());

    let mut session = Session::new(VirtualBackend::new(), &config).with_replay(log);
    while session.is_replaying() {
        session.tick();
    }
    if !session.is_open() {
        info!("Replay closed the window");
    }

    let recorded = session.finish();
    if let Some(out) = args.record.or(config.record) {
        recorded
            .save(&out)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!("Wrote {} event(s) to {}", recorded.len(), out.display());
    }
    Ok(())
}

fn record(args: RecordArgs, config: &SessionConfig) -> Result<()> {
    let backend = probe_backend().context("no live input backend available")?;
    let mut session = Session::new(backend, config);

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    info!("Recording for {}s", args.seconds);
    while session.is_open() && Instant::now() < deadline {
        session.tick();
        std::thread::sleep(Duration::from_millis(1));
    }

    let recorded = session.finish();
    recorded
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    info!("Wrote {} event(s) to {}", recorded.len(), args.out.display());
    Ok(())
}
