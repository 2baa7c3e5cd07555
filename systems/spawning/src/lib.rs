#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use waypoint_defence_core::{config::ensure_positive, Command, ConfigError, Health};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
    min_health: f32,
    max_health: f32,
}

impl Config {
    /// Creates a configuration with the given cadence and seed.
    ///
    /// Every enemy starts with `health` hit points until a range is set with
    /// [`Config::with_health_range`]. Fails when `health` is not a finite
    /// positive number.
    pub fn new(spawn_interval: Duration, rng_seed: u64, health: f32) -> Result<Self, ConfigError> {
        ensure_positive("health", health)?;
        Ok(Self {
            spawn_interval,
            rng_seed,
            min_health: health,
            max_health: health,
        })
    }

    /// Draws each spawned enemy's hit points uniformly from `min..=max`.
    ///
    /// The bounds are swapped when given in descending order.
    pub fn with_health_range(self, min: f32, max: f32) -> Result<Self, ConfigError> {
        ensure_positive("min_health", min)?;
        ensure_positive("max_health", max)?;
        let (min_health, max_health) = if min <= max { (min, max) } else { (max, min) };
        Ok(Self {
            min_health,
            max_health,
            ..self
        })
    }

    /// Time between consecutive spawns; zero disables spawning.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Seed of the health generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Pure system that emits a spawn command each time an interval elapses.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
    min_health: f32,
    max_health: f32,
    spawned: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            min_health: config.min_health,
            max_health: config.max_health,
            spawned: 0,
        }
    }

    /// Accumulates `dt` and pushes one [`Command::SpawnEnemy`] per elapsed
    /// interval.
    pub fn handle(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if self.spawn_interval.is_zero() || dt.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let spawn_attempts = self.resolve_spawn_attempts();

        for _ in 0..spawn_attempts {
            let max_health = self.next_health();
            self.spawned += 1;
            debug!(
                "spawn #{} scheduled with {} hp",
                self.spawned,
                max_health.get()
            );
            out.push(Command::SpawnEnemy { max_health });
        }
    }

    /// Number of spawn commands emitted so far.
    #[must_use]
    pub const fn spawned(&self) -> u64 {
        self.spawned
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn next_health(&mut self) -> Health {
        if self.min_health >= self.max_health {
            return Health::new(self.max_health);
        }
        Health::new(self.rng.gen_range(self.min_health..=self.max_health))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_spawn_attempts_without_interval() {
        let mut spawning = Spawning::new(Config::new(Duration::ZERO, 1, 100.0).expect("config"));
        spawning.accumulator = Duration::from_secs(10);
        assert_eq!(spawning.resolve_spawn_attempts(), 0);
    }

    #[test]
    fn descending_health_bounds_are_swapped() {
        let config = Config::new(Duration::from_secs(1), 7, 100.0)
            .expect("config")
            .with_health_range(120.0, 80.0)
            .expect("range");
        assert_eq!(config.min_health, 80.0);
        assert_eq!(config.max_health, 120.0);
    }

    #[test]
    fn non_positive_health_is_rejected() {
        let result = Config::new(Duration::from_secs(1), 7, 100.0)
            .expect("config")
            .with_health_range(0.0, 10.0);
        assert!(matches!(
            result,
            Err(ConfigError::NonPositive {
                field: "min_health",
                ..
            })
        ));
    }

    #[test]
    fn base_health_must_be_positive() {
        for health in [0.0, -5.0] {
            assert!(matches!(
                Config::new(Duration::from_secs(1), 7, health),
                Err(ConfigError::NonPositive {
                    field: "health",
                    ..
                })
            ));
        }
        for health in [f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Config::new(Duration::from_secs(1), 7, health),
                Err(ConfigError::NonFinite {
                    field: "health",
                    ..
                })
            ));
        }
    }
}
