//! Startup configuration shared by the world and every system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of a path tile in world units.
pub const DEFAULT_TILE_SIZE: f32 = 64.0;
/// Enemy travel speed in world units per simulated second.
pub const DEFAULT_ENEMY_SPEED: f32 = 60.0;
/// Hit points assigned to enemies spawned without an explicit value.
pub const DEFAULT_ENEMY_HEALTH: f32 = 100.0;
/// Radius within which towers acquire targets.
pub const DEFAULT_TOWER_RANGE: f32 = 150.0;
/// Projectile travel speed in world units per simulated second.
pub const DEFAULT_PROJECTILE_SPEED: f32 = 300.0;
/// Damage applied by a single projectile hit.
pub const DEFAULT_PROJECTILE_DAMAGE: f32 = 25.0;
/// Edge length of a spatial index cell in world units.
pub const DEFAULT_CELL_SIZE: f32 = 128.0;
/// Simulated seconds a tower waits between shots.
pub const DEFAULT_FIRE_INTERVAL: f32 = 0.8;
/// Distance below which an enemy counts as standing on its waypoint.
pub const DEFAULT_ARRIVAL_EPSILON: f32 = 2.0;

/// Scalar tuning constants fixed when the simulation boots.
///
/// Every field must be finite and strictly positive; see
/// [`SimulationConfig::validate`]. Missing fields fall back to the defaults
/// when deserialised, so level files only need to list overrides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Side length of a path tile in world units.
    pub tile_size: f32,
    /// Enemy travel speed in world units per second.
    pub enemy_speed: f32,
    /// Default enemy hit points.
    pub enemy_health: f32,
    /// Tower targeting radius in world units.
    pub tower_range: f32,
    /// Projectile travel speed in world units per second.
    pub projectile_speed: f32,
    /// Damage applied by each projectile hit.
    pub projectile_damage: f32,
    /// Spatial index cell edge length in world units.
    pub cell_size: f32,
    /// Seconds between consecutive shots of a single tower.
    pub fire_interval: f32,
    /// Arrival threshold used by path following.
    pub arrival_epsilon: f32,
}

impl SimulationConfig {
    /// Checks that every scalar is finite and greater than zero.
    ///
    /// A zero cell size, tile size or speed would otherwise surface much
    /// later as a division by zero or an enemy that never arrives.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("tile_size", self.tile_size),
            ("enemy_speed", self.enemy_speed),
            ("enemy_health", self.enemy_health),
            ("tower_range", self.tower_range),
            ("projectile_speed", self.projectile_speed),
            ("projectile_damage", self.projectile_damage),
            ("cell_size", self.cell_size),
            ("fire_interval", self.fire_interval),
            ("arrival_epsilon", self.arrival_epsilon),
        ];

        for (field, value) in fields {
            ensure_positive(field, value)?;
        }

        Ok(())
    }

    /// Returns the configuration after validating it.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            enemy_speed: DEFAULT_ENEMY_SPEED,
            enemy_health: DEFAULT_ENEMY_HEALTH,
            tower_range: DEFAULT_TOWER_RANGE,
            projectile_speed: DEFAULT_PROJECTILE_SPEED,
            projectile_damage: DEFAULT_PROJECTILE_DAMAGE,
            cell_size: DEFAULT_CELL_SIZE,
            fire_interval: DEFAULT_FIRE_INTERVAL,
            arrival_epsilon: DEFAULT_ARRIVAL_EPSILON,
        }
    }
}

/// Validates a single named scalar.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

/// Reasons a configuration is rejected at startup.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The named value is NaN or infinite.
    #[error("configuration value `{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f32,
    },
    /// The named value is zero or negative.
    #[error("configuration value `{field}` must be greater than zero, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f32,
    },
    /// A path was declared without waypoints.
    #[error("path must contain at least one waypoint")]
    EmptyPath,
}
