use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::games::GameKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Five neon arcade classics in your terminal", long_about = None)]
pub struct Cli {
    #[arg(long, value_enum, help = "Open this game directly instead of the home screen")]
    pub game: Option<GameKind>,
    #[arg(long, help = "Seed every random source for a reproducible run")]
    pub seed: Option<u64>,
    #[arg(long, help = "Path to a JSON settings file")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Log file (defaults to neoncade.log in the temp dir)")]
    pub log_file: Option<PathBuf>,
    #[arg(long, help = "Turn off decorative particles", default_value_t = false)]
    pub no_particles: bool,
}

impl Cli {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("neoncade.log"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Redraw interval of the UI in milliseconds
    pub frame_ms: u64,
    /// Decorative particle effects
    pub particles: bool,
    /// Fixed seed; `None` draws one from the OS
    pub seed: Option<u64>,
    pub pong_winning_score: u32,
    pub breakout_lives: u32,
    pub shooter_health: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            particles: true,
            seed: None,
            pong_winning_score: 10,
            breakout_lives: 3,
            shooter_health: 100,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if cli.no_particles {
            settings.particles = false;
        }
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }
        Ok(settings.sanitized())
    }

    /// Clamp values that would stall or break a game.
    pub fn sanitized(mut self) -> Self {
        self.frame_ms = self.frame_ms.clamp(5, 100);
        self.pong_winning_score = self.pong_winning_score.max(1);
        self.breakout_lives = self.breakout_lives.max(1);
        self.shooter_health = self.shooter_health.max(1);
        self
    }

    /// Per-game seed so each game gets its own stream from one `--seed`.
    pub fn seed_for(&self, kind: GameKind) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(kind.index() as u64))
    }
}
