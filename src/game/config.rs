use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest disk the display can show: a 120 pixel radius at one pixel per cell.
pub const MAX_BORDER_RADIUS: i32 = 120;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Radius of the playing disk, in cells
    pub border_radius: i32,
    /// Initial length of the snake
    pub initial_length: usize,
    /// Milliseconds between simulation steps
    pub refresh_interval_ms: u32,
    /// Random food samples tried before falling back to a scan of the disk
    pub max_food_attempts: u32,
    /// Seed for food placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_display(120, 10)
    }
}

impl GameConfig {
    /// Create a new configuration with a custom border radius
    pub fn new(border_radius: i32) -> Self {
        Self {
            border_radius,
            initial_length: 2,
            refresh_interval_ms: 70,
            max_food_attempts: 1000,
            seed: None,
        }
    }

    /// Derive the border radius from a round display and the pixel size of one cell
    pub fn from_display(screen_radius: u32, cell_size: u32) -> Self {
        Self::new((screen_radius / cell_size.max(1)) as i32)
    }

    /// Create a small disk for testing
    pub fn small() -> Self {
        Self::new(5)
    }

    /// Read a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.border_radius < 1 {
            bail!("border radius must be at least 1, got {}", self.border_radius);
        }
        if self.border_radius > MAX_BORDER_RADIUS {
            bail!(
                "border radius must be at most {}, got {}",
                MAX_BORDER_RADIUS,
                self.border_radius
            );
        }
        if self.initial_length == 0 {
            bail!("initial snake length must be at least 1");
        }
        // The starting body runs from the origin along +x.
        if self.initial_length as i64 - 1 > self.border_radius as i64 {
            bail!(
                "initial snake length {} does not fit in a disk of radius {}",
                self.initial_length,
                self.border_radius
            );
        }
        if self.refresh_interval_ms == 0 {
            bail!("refresh interval must be positive");
        }
        Ok(())
    }
}
