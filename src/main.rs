//! pvpd - interactive arena console

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use pvp_arena::combat::SeededRoll;
use pvp_arena::console::{Console, Roster};
use pvp_arena::{ArenaConfig, PvpEngine};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn-based PvP arena console
#[derive(Parser, Debug)]
#[command(name = "pvpd", version, about = "Run PvP matches from the terminal")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TOML roster of players and units
    #[arg(short, long)]
    roster: PathBuf,

    /// Seed the damage roll for a replayable session
    #[arg(long)]
    seed: Option<u64>,

    /// Print JSON lines instead of chat text, and log as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ArenaConfig::load(args.config.as_deref())?;

    let json = args.json || config.json_output;

    // Initialize tracing; logs follow the output mode
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    if !args.roster.exists() {
        bail!("Roster file not found: {}", args.roster.display());
    }
    let roster = Roster::load(&args.roster)?;

    let rules = config.rules.clone();
    let engine = match args.seed {
        Some(seed) => {
            info!(seed, "using seeded damage rolls");
            PvpEngine::with_roller(rules, SeededRoll::new(seed))?
        }
        None => PvpEngine::new(rules)?,
    };
    info!(rules = ?engine.rules(), "arena ready");

    let console = Console::new(Arc::new(engine), roster, json);
    console
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
