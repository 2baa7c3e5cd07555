#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Waypoint Defence adapters.
//!
//! A [`Scene`] is a read-only copy of everything a frame needs. Backends only
//! ever see the scene, so presenting a frame cannot mutate the simulation.

pub mod text;

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt};
use waypoint_defence_core::{EnemyId, ProjectileId, TowerId, WorldPoint};
use waypoint_defence_system_tower_combat::TowerCombat;
use waypoint_defence_world::{query, World};

pub use text::TextBackend;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Blends towards `other`; `amount` is clamped to 0.0..=1.0.
    #[must_use]
    pub fn lerp(self, other: Self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lerp_channel(self.red, other.red, amount),
            green: lerp_channel(self.green, other.green, amount),
            blue: lerp_channel(self.blue, other.blue, amount),
            alpha: lerp_channel(self.alpha, other.alpha, amount),
        }
    }
}

fn lerp_channel(from: f32, to: f32, amount: f32) -> f32 {
    from * (1.0 - amount) + to * amount
}

/// Color of an enemy with no hit points left.
pub const WOUNDED_COLOR: Color = Color::from_rgb_u8(0xc8, 0x2a, 0x36);
/// Color of an enemy at full health.
pub const HEALTHY_COLOR: Color = Color::from_rgb_u8(0x2f, 0x95, 0x32);

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Polyline the enemies walk, in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Waypoint centres in travel order.
    pub points: Vec<Vec2>,
    /// Edge length of one grid tile.
    pub tile_size: f32,
}

/// Enemy as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Centre in world units.
    pub position: Vec2,
    /// Remaining hit points as a fraction of the maximum.
    pub health_fraction: f32,
    /// Fill color derived from `health_fraction`.
    pub color: Color,
}

impl EnemyPresentation {
    /// Creates an enemy descriptor, shading it by remaining health.
    #[must_use]
    pub fn new(id: EnemyId, position: Vec2, health_fraction: f32) -> Self {
        Self {
            id,
            position,
            health_fraction,
            color: WOUNDED_COLOR.lerp(HEALTHY_COLOR, health_fraction),
        }
    }
}

/// Tower as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Centre in world units.
    pub position: Vec2,
    /// Targeting radius.
    pub range: f32,
    /// Whether the tower can fire this tick.
    pub ready: bool,
}

/// Projectile as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Current position in world units.
    pub position: Vec2,
    /// Enemy the projectile is homing on.
    pub target: EnemyId,
}

/// Scene description combining the path and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Path the enemies follow.
    pub path: PathPresentation,
    /// Enemies currently on the path.
    pub enemies: Vec<EnemyPresentation>,
    /// Placed towers.
    pub towers: Vec<TowerPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
}

impl Scene {
    /// Captures the state of `world` and the projectiles in `combat`.
    #[must_use]
    pub fn from_world(world: &World, combat: &TowerCombat) -> Self {
        let path = query::path(world);
        let range = query::config(world).tower_range;

        Self {
            path: PathPresentation {
                points: path.world_positions().map(to_vec2).collect(),
                tile_size: path.tile_size(),
            },
            enemies: query::enemies(world)
                .iter()
                .filter(|enemy| enemy.is_active())
                .map(|enemy| {
                    EnemyPresentation::new(
                        enemy.id(),
                        to_vec2(enemy.position()),
                        enemy.health().fraction_of(enemy.max_health()),
                    )
                })
                .collect(),
            towers: query::towers(world)
                .iter()
                .map(|tower| TowerPresentation {
                    id: tower.id(),
                    position: to_vec2(tower.position()),
                    range,
                    ready: tower.is_ready(),
                })
                .collect(),
            projectiles: combat
                .projectiles()
                .map(|projectile| ProjectilePresentation {
                    id: projectile.id(),
                    position: to_vec2(projectile.position()),
                    target: projectile.target(),
                })
                .collect(),
        }
    }

    /// Extent of the play area: the furthest path tile edge or entity.
    #[must_use]
    pub fn bounds(&self) -> Vec2 {
        let half_tile = Vec2::splat(self.path.tile_size / 2.0);
        let path_extent = self
            .path
            .points
            .iter()
            .map(|point| *point + half_tile)
            .fold(Vec2::ZERO, Vec2::max);

        self.towers
            .iter()
            .map(|tower| tower.position + half_tile)
            .chain(self.enemies.iter().map(|enemy| enemy.position))
            .fold(path_extent, Vec2::max)
    }
}

/// Rendering backend capable of presenting Waypoint Defence scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Glyphs must cover a positive, finite number of world units.
    InvalidGlyphSize {
        /// Provided size that failed validation.
        glyph_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGlyphSize { glyph_size } => {
                write!(
                    f,
                    "glyph_size must be positive and finite (received {glyph_size})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::{
        Command, Health, ProjectileSpawn, SimulationConfig, Waypoint,
    };
    use waypoint_defence_world as world;

    fn world_with_enemy(health: f32) -> World {
        let mut world = World::new(
            SimulationConfig::default(),
            vec![Waypoint::new(0, 0), Waypoint::new(3, 0), Waypoint::new(3, 2)],
        )
        .expect("world");
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                max_health: Health::new(health),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlaceTower {
                position: WorldPoint::new(96.0, 96.0),
            },
            &mut events,
        );
        world
    }

    #[test]
    fn lerp_clamps_amount() {
        let blended = WOUNDED_COLOR.lerp(HEALTHY_COLOR, 4.0);
        assert_eq!(blended, HEALTHY_COLOR);
        assert_eq!(WOUNDED_COLOR.lerp(HEALTHY_COLOR, 0.0), WOUNDED_COLOR);
    }

    #[test]
    fn scene_captures_world_state() {
        let world = world_with_enemy(80.0);
        let combat = TowerCombat::new(&SimulationConfig::default());

        let scene = Scene::from_world(&world, &combat);

        assert_eq!(
            scene.path.points,
            vec![
                Vec2::new(32.0, 32.0),
                Vec2::new(224.0, 32.0),
                Vec2::new(224.0, 160.0)
            ]
        );
        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.enemies[0].position, Vec2::new(32.0, 32.0));
        assert_eq!(scene.enemies[0].health_fraction, 1.0);
        assert_eq!(scene.enemies[0].color, HEALTHY_COLOR);
        assert_eq!(scene.towers.len(), 1);
        assert_eq!(scene.towers[0].range, 150.0);
        assert!(scene.towers[0].ready);
        assert!(scene.projectiles.is_empty());
        assert_eq!(scene.bounds(), Vec2::new(256.0, 192.0));
    }

    #[test]
    fn scene_includes_projectiles_in_flight() {
        let world = world_with_enemy(80.0);
        let mut combat = TowerCombat::new(&SimulationConfig::default());
        let enemy = query::enemies(&world).iter().next().expect("enemy").id();
        let tower = query::towers(&world).iter().next().expect("tower").id();
        let projectile = combat.spawn(ProjectileSpawn {
            tower,
            origin: WorldPoint::new(96.0, 96.0),
            target: enemy,
        });

        let scene = Scene::from_world(&world, &combat);

        assert_eq!(
            scene.projectiles,
            vec![ProjectilePresentation {
                id: projectile,
                position: Vec2::new(96.0, 96.0),
                target: enemy,
            }]
        );
    }

    #[test]
    fn damaged_enemies_report_their_health_fraction() {
        let mut world = world_with_enemy(100.0);
        let enemy = query::enemies(&world).iter().next().expect("enemy").id();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::DamageEnemy {
                enemy,
                amount: Health::new(75.0),
            },
            &mut events,
        );

        let scene = Scene::from_world(&world, &TowerCombat::new(&SimulationConfig::default()));

        assert!((scene.enemies[0].health_fraction - 0.25).abs() < 1e-6);
        assert_ne!(scene.enemies[0].color, HEALTHY_COLOR);
    }
}
