#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile resolver that turns tower shots into damage commands.
//!
//! Projectiles home on their target's current position at a fixed speed and
//! resolve across however many steps the flight takes. Hits are reported as
//! [`Command::DamageEnemy`] so the world stays the only place hit points
//! change.

use std::time::Duration;

use log::trace;
use waypoint_defence_core::{
    Command, EnemyId, Health, ProjectileId, ProjectileSpawn, SimulationConfig, TowerId, WorldPoint,
};
use waypoint_defence_world::EnemySet;

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    tower: TowerId,
    position: WorldPoint,
    target: EnemyId,
}

impl Projectile {
    /// Identifier allocated at launch.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Tower that launched the projectile.
    #[must_use]
    pub const fn tower(&self) -> TowerId {
        self.tower
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Enemy the projectile homes on.
    #[must_use]
    pub const fn target(&self) -> EnemyId {
        self.target
    }
}

/// Owns every projectile in flight and resolves hits.
#[derive(Debug)]
pub struct TowerCombat {
    projectiles: Vec<Projectile>,
    next_projectile_id: ProjectileId,
    speed: f32,
    damage: Health,
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates an empty resolver from a validated configuration.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
            speed: config.projectile_speed,
            damage: Health::new(config.projectile_damage),
            scratch: Vec::new(),
        }
    }

    /// Launches a projectile for a tower's spawn request.
    pub fn spawn(&mut self, request: ProjectileSpawn) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        self.projectiles.push(Projectile {
            id,
            tower: request.tower,
            position: request.origin,
            target: request.target,
        });
        id
    }

    /// Moves projectiles by `dt` and queues damage for every hit.
    ///
    /// A projectile whose target has left the path or died is discarded
    /// without effect.
    pub fn advance(&mut self, dt: Duration, enemies: &EnemySet, out: &mut Vec<Command>) {
        if self.projectiles.is_empty() {
            return;
        }

        let travel = self.speed * dt.as_secs_f32();
        let damage = self.damage;
        let scratch = &mut self.scratch;
        scratch.clear();

        self.projectiles.retain_mut(|projectile| {
            let Some(enemy) = enemies
                .get(projectile.target)
                .filter(|enemy| enemy.is_active())
            else {
                trace!(
                    "projectile {} lost enemy {}",
                    projectile.id.get(),
                    projectile.target.get()
                );
                return false;
            };

            let destination = enemy.position();
            projectile.position = projectile.position.step_toward(destination, travel);
            if projectile.position != destination {
                return true;
            }

            scratch.push(Command::DamageEnemy {
                enemy: projectile.target,
                amount: damage,
            });
            false
        });

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    /// Iterator over projectiles in launch order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}
