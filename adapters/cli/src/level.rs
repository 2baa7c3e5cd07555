//! TOML level files.
//!
//! A level names its path in grid tiles, optional tower tiles, the spawner
//! cadence and the host's game rules. Every section except `waypoints` may be
//! omitted:
//!
//! ```toml
//! waypoints = [[0, 4], [4, 4], [4, 2]]
//! towers = [[2, 3]]
//!
//! [config]
//! enemy_speed = 80.0
//!
//! [spawning]
//! interval_ms = 1500
//! min_health = 80.0
//! max_health = 120.0
//!
//! [rules]
//! lives = 10
//! ```

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use waypoint_defence_core::{ConfigError, SimulationConfig, Waypoint, WorldPoint};
use waypoint_defence_system_spawning::Config as SpawnConfig;

/// Path used when no level file is given.
const DEFAULT_WAYPOINTS: [[i32; 2]; 6] = [[0, 4], [4, 4], [4, 2], [9, 2], [9, 6], [14, 6]];
/// Tiles beside the default path that start with a tower.
const DEFAULT_TOWERS: [[i32; 2]; 3] = [[2, 3], [6, 3], [10, 4]];

const DEFAULT_SPAWN_INTERVAL_MS: u64 = 1_200;
const DEFAULT_LIVES: u32 = 20;
const DEFAULT_CURRENCY: u32 = 100;
const DEFAULT_KILL_REWARD: u32 = 10;

/// Errors raised while loading a level.
#[derive(Debug, Error)]
pub(crate) enum LevelError {
    /// The level file could not be read.
    #[error("failed to read level file {path}")]
    Read {
        /// Location of the level file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The level file is not valid TOML or has unexpected fields.
    #[error("failed to parse level file")]
    Parse(#[from] toml::de::Error),
    /// A value in the level is out of range.
    #[error("invalid level")]
    Invalid(#[from] ConfigError),
}

/// Spawner cadence and health roll range.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawnSettings {
    /// Milliseconds between spawns; zero disables the spawner.
    pub(crate) interval_ms: u64,
    /// Lowest starting health; defaults to the configured enemy health.
    pub(crate) min_health: Option<f32>,
    /// Highest starting health; defaults to the configured enemy health.
    pub(crate) max_health: Option<f32>,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            min_health: None,
            max_health: None,
        }
    }
}

/// Lives and currency kept by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameRules {
    /// Lives at the start of the run.
    pub(crate) lives: u32,
    /// Currency at the start of the run.
    pub(crate) currency: u32,
    /// Currency awarded per kill.
    pub(crate) kill_reward: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            currency: DEFAULT_CURRENCY,
            kill_reward: DEFAULT_KILL_REWARD,
        }
    }
}

/// Parsed level description.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Level {
    /// Simulation constants; omitted keys keep their defaults.
    #[serde(default)]
    pub(crate) config: SimulationConfig,
    /// Path as `[column, row]` tiles.
    pub(crate) waypoints: Vec<[i32; 2]>,
    /// Tiles that start with a tower.
    #[serde(default)]
    pub(crate) towers: Vec<[i32; 2]>,
    #[serde(default)]
    pub(crate) spawning: SpawnSettings,
    #[serde(default)]
    pub(crate) rules: GameRules,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            config: SimulationConfig::default(),
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
            towers: DEFAULT_TOWERS.to_vec(),
            spawning: SpawnSettings::default(),
            rules: GameRules::default(),
        }
    }
}

impl Level {
    /// Reads and validates a level from `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses and validates a level from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, LevelError> {
        let level: Self = toml::from_str(text)?;
        level.config.validate()?;
        if level.waypoints.is_empty() {
            return Err(ConfigError::EmptyPath.into());
        }
        let _ = level.spawn_config(0)?;
        Ok(level)
    }

    /// Path waypoints in travel order.
    pub(crate) fn waypoints(&self) -> Vec<Waypoint> {
        self.waypoints
            .iter()
            .map(|&[x, y]| Waypoint::new(x, y))
            .collect()
    }

    /// World positions of the initial towers, centred on their tiles.
    pub(crate) fn tower_positions(&self) -> Vec<WorldPoint> {
        self.towers
            .iter()
            .map(|&[x, y]| Waypoint::new(x, y).world_center(self.config.tile_size))
            .collect()
    }

    /// Spawner configuration seeded with `seed`.
    pub(crate) fn spawn_config(&self, seed: u64) -> Result<SpawnConfig, ConfigError> {
        let health = self.config.enemy_health;
        let min = self.spawning.min_health.unwrap_or(health);
        let max = self.spawning.max_health.unwrap_or(health);
        SpawnConfig::new(
            Duration::from_millis(self.spawning.interval_ms),
            seed,
            health,
        )?
        .with_health_range(min, max)
    }
}
