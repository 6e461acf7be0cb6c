use anyhow::{Context, Result};
use clap::Parser;
use round_snake::game::GameConfig;
use round_snake::modes::HumanMode;
use round_snake::storage::FileScoreStore;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "round_snake")]
#[command(version, about = "Snake on a round board")]
struct Cli {
    /// JSON game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board radius in cells
    #[arg(long)]
    radius: Option<i32>,

    /// Starting snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Milliseconds between snake steps
    #[arg(long)]
    refresh_ms: Option<u32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "highscore.txt")]
    highscore_file: PathBuf,

    /// Set the stored high score to 0 and exit
    #[arg(long)]
    reset_highscore: bool,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(radius) = self.radius {
            config.border_radius = radius;
        }
        if let Some(length) = self.initial_length {
            config.initial_length = length;
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.refresh_interval_ms = refresh_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    if cli.reset_highscore {
        FileScoreStore::new(&cli.highscore_file)
            .reset()
            .context("Failed to reset high score")?;
        println!("High score in {:?} reset to 0", cli.highscore_file);
        return Ok(());
    }

    let config = cli.game_config()?;
    tracing::info!(?config, "starting");

    let mut human_mode = HumanMode::new(config, cli.highscore_file);
    human_mode.run().await?;

    Ok(())
}
