#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Waypoint Defence simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the per-tick systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and every step reports [`Event`]
//! values so hosts can react (lose a life, award currency) without touching
//! simulation state themselves.

pub mod config;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, SimulationConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Waypoint Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Requests a new enemy at the first waypoint of the path.
    SpawnEnemy {
        /// Hit points the enemy starts with.
        max_health: Health,
    },
    /// Requests placement of a tower at the provided world position.
    PlaceTower {
        /// Centre of the tower in world units.
        position: WorldPoint,
    },
    /// Applies damage to an enemy on behalf of the combat resolver.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Amount of hit points removed.
        amount: Health,
    },
}

/// Events broadcast by the world and systems while a step executes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Simulated seconds that elapsed in the step.
        dt_seconds: f32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Position the enemy occupies after spawning.
        position: WorldPoint,
    },
    /// Reports that an enemy arrived at a waypoint and now heads for the next one.
    WaypointReached {
        /// Enemy that arrived.
        enemy: EnemyId,
        /// Index of the waypoint the enemy arrived at.
        waypoint: usize,
    },
    /// Reports that an enemy walked past the final waypoint.
    EnemyReachedBase {
        /// Enemy that left the path.
        enemy: EnemyId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Centre of the tower in world units.
        position: WorldPoint,
    },
    /// Reports that a tower released a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes on.
        target: EnemyId,
    },
    /// Reports that a projectile struck its target.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Hit points left after the hit.
        remaining: Health,
    },
    /// Reports that an enemy ran out of hit points.
    EnemyKilled {
        /// Enemy that was destroyed.
        enemy: EnemyId,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hit points carried by an enemy or removed by a hit.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Health(f32);

impl Health {
    /// Depleted health.
    pub const ZERO: Self = Self(0.0);

    /// Creates a health value, clamping negative and NaN input to zero.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value > 0.0 {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Retrieves the raw hit point count.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Subtracts `amount`, never dropping below zero.
    #[must_use]
    pub fn saturating_sub(self, amount: Health) -> Self {
        Self::new(self.0 - amount.0)
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.0 <= 0.0
    }

    /// Fraction of `max` this value represents, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn fraction_of(&self, max: Health) -> f32 {
        if max.0 <= 0.0 {
            return 0.0;
        }
        (self.0 / max.0).clamp(0.0, 1.0)
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance between two points.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Reports whether both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Moves from `self` toward `target` by at most `max_distance`.
    ///
    /// The result never passes `target`; a zero-length segment yields
    /// `target` without dividing.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, max_distance: f32) -> WorldPoint {
        let distance = self.distance(target);
        if distance <= max_distance || distance <= f32::EPSILON {
            return target;
        }

        let scale = max_distance / distance;
        WorldPoint::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }
}

/// Path waypoint expressed in whole grid tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Waypoint {
    /// Zero-based tile column.
    pub grid_x: i32,
    /// Zero-based tile row.
    pub grid_y: i32,
}

impl Waypoint {
    /// Creates a waypoint at the provided tile coordinates.
    #[must_use]
    pub const fn new(grid_x: i32, grid_y: i32) -> Self {
        Self { grid_x, grid_y }
    }

    /// World-space centre of the waypoint's tile.
    #[must_use]
    pub fn world_center(&self, tile_size: f32) -> WorldPoint {
        let half = tile_size / 2.0;
        WorldPoint::new(
            self.grid_x as f32 * tile_size + half,
            self.grid_y as f32 * tile_size + half,
        )
    }
}

/// Request for the projectile collaborator emitted when a tower fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpawn {
    /// Tower that fired.
    pub tower: TowerId,
    /// Launch position, the tower's centre.
    pub origin: WorldPoint,
    /// Enemy the projectile should home on.
    pub target: EnemyId,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current world position.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points the enemy spawned with.
    pub max_health: Health,
    /// Index of the waypoint the enemy is walking toward.
    pub target_waypoint: usize,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots listed in insertion order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Centre of the tower in world units.
    pub position: WorldPoint,
    /// Seconds left before the tower may fire again.
    pub cooldown_remaining: f32,
}

impl TowerSnapshot {
    /// Reports whether the tower may fire during the next step.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view, ordering snapshots by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}
