#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Waypoint Defence.
//!
//! The world exclusively owns the path, the enemy set and the tower set.
//! Adapters mutate it through [`apply`]; per-tick systems borrow its parts
//! through [`World::parts_mut`] so ownership stays explicit and there is no
//! process-wide entity list.

pub mod enemies;
pub mod path;
pub mod towers;

use log::{debug, warn};
use waypoint_defence_core::{
    Command, ConfigError, EnemyView, Event, SimulationConfig, TowerView, Waypoint, WELCOME_BANNER,
};

pub use enemies::{DamageOutcome, Enemy, EnemySet, EnemyState};
pub use path::Path;
pub use towers::{Tower, TowerSet};

/// Represents the authoritative Waypoint Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    path: Path,
    enemies: EnemySet,
    towers: TowerSet,
}

impl World {
    /// Creates a world over the provided path.
    ///
    /// The configuration is validated up front so that a zero speed or cell
    /// size surfaces here rather than as a stalled simulation.
    pub fn new(config: SimulationConfig, waypoints: Vec<Waypoint>) -> Result<Self, ConfigError> {
        config.validate()?;
        let path = Path::new(waypoints, config.tile_size)?;

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            path,
            enemies: EnemySet::new(),
            towers: TowerSet::new(),
        })
    }

    /// Splits the world into the borrows a simulation step needs.
    pub fn parts_mut(&mut self) -> WorldPartsMut<'_> {
        WorldPartsMut {
            config: &self.config,
            path: &self.path,
            enemies: &mut self.enemies,
            towers: &mut self.towers,
        }
    }
}

/// Disjoint borrows of the world handed to systems during a step.
#[derive(Debug)]
pub struct WorldPartsMut<'world> {
    /// Validated configuration.
    pub config: &'world SimulationConfig,
    /// Read-only path.
    pub path: &'world Path,
    /// Enemy set.
    pub enemies: &'world mut EnemySet,
    /// Tower set.
    pub towers: &'world mut TowerSet,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnEnemy { max_health } => {
            if max_health.is_depleted() {
                warn!("ignoring enemy spawn without hit points");
                return;
            }
            let position = world.path.spawn_point();
            let enemy = world.enemies.spawn(position, max_health);
            out_events.push(Event::EnemySpawned { enemy, position });
        }
        Command::PlaceTower { position } => {
            if !position.is_finite() {
                warn!("ignoring tower placement at non-finite position {position:?}");
                return;
            }
            let tower = world.towers.place(position);
            out_events.push(Event::TowerPlaced { tower, position });
        }
        Command::DamageEnemy { enemy, amount } => {
            let Some(outcome) = world.enemies.apply_damage(enemy, amount) else {
                debug!("damage for missing enemy {} dropped", enemy.get());
                return;
            };
            out_events.push(Event::EnemyDamaged {
                enemy,
                remaining: outcome.remaining,
            });
            if outcome.killed {
                out_events.push(Event::EnemyKilled { enemy });
                let _ = world.enemies.compact();
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{EnemySet, Path, TowerSet, World};
    use waypoint_defence_core::{EnemyView, SimulationConfig, TowerView};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the validated configuration.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Provides read-only access to the path.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Provides read-only access to the enemy set.
    #[must_use]
    pub fn enemies(world: &World) -> &EnemySet {
        &world.enemies
    }

    /// Provides read-only access to the tower set.
    #[must_use]
    pub fn towers(world: &World) -> &TowerSet {
        &world.towers
    }

    /// Captures a read-only view of the active enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        super::enemy_view(&world.enemies)
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        super::tower_view(&world.towers)
    }
}

fn enemy_view(enemies: &EnemySet) -> EnemyView {
    EnemyView::from_snapshots(
        enemies
            .iter()
            .filter(|enemy| enemy.is_active())
            .map(Enemy::snapshot)
            .collect(),
    )
}

fn tower_view(towers: &TowerSet) -> TowerView {
    TowerView::from_snapshots(towers.iter().map(Tower::snapshot).collect())
}
