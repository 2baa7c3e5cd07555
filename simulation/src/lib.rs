#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Owned simulation context that wires the world to its per-tick systems.
//!
//! A [`Simulation`] holds the [`World`] and every system explicitly; nothing
//! lives in process-wide state. [`Simulation::step`] runs the systems in a
//! fixed order:
//!
//! 1. spawning, whose commands are applied before anything moves;
//! 2. movement along the path, including removal at the base;
//! 3. a spatial index rebuild over the moved enemies;
//! 4. tower cooldowns, target acquisition and firing;
//! 5. projectile flight, whose hits are applied as damage commands.

use std::time::Duration;

use log::{trace, warn};
use waypoint_defence_core::{
    Command, ConfigError, Event, ProjectileSpawn, SimulationConfig, Waypoint,
};
use waypoint_defence_system_movement::Movement;
use waypoint_defence_system_spatial_index::SpatialIndex;
use waypoint_defence_system_spawning::Spawning;
use waypoint_defence_system_tower_combat::TowerCombat;
use waypoint_defence_system_tower_targeting::{FirstInRange, TargetSelector, TowerTargeting};
use waypoint_defence_world::{self as world, World};

/// World plus the systems that advance it.
#[derive(Debug)]
pub struct Simulation<S = FirstInRange> {
    world: World,
    movement: Movement,
    targeting: TowerTargeting<S>,
    combat: TowerCombat,
    spawning: Option<Spawning>,
    use_spatial_index: bool,
    commands: Vec<Command>,
    spawns: Vec<ProjectileSpawn>,
    ticks: u64,
    elapsed: Duration,
}

impl Simulation<FirstInRange> {
    /// Builds a simulation over `waypoints` with the default targeting policy.
    pub fn new(config: SimulationConfig, waypoints: Vec<Waypoint>) -> Result<Self, ConfigError> {
        Self::with_selector(config, waypoints, FirstInRange)
    }
}

impl<S: TargetSelector> Simulation<S> {
    /// Builds a simulation whose towers pick targets with `selector`.
    pub fn with_selector(
        config: SimulationConfig,
        waypoints: Vec<Waypoint>,
        selector: S,
    ) -> Result<Self, ConfigError> {
        let world = World::new(config, waypoints)?;

        Ok(Self {
            world,
            movement: Movement::new(&config),
            targeting: TowerTargeting::with_selector(&config, selector),
            combat: TowerCombat::new(&config),
            spawning: None,
            use_spatial_index: true,
            commands: Vec::new(),
            spawns: Vec::new(),
            ticks: 0,
            elapsed: Duration::ZERO,
        })
    }

    /// Attaches an interval spawner that feeds enemies into the path.
    #[must_use]
    pub fn with_spawning(mut self, spawning: Spawning) -> Self {
        self.spawning = Some(spawning);
        self
    }

    /// Chooses between the spatial index and a linear scan for targeting.
    pub fn use_spatial_index(&mut self, enabled: bool) {
        self.use_spatial_index = enabled;
    }

    /// Reports whether towers search through the spatial index.
    #[must_use]
    pub fn uses_spatial_index(&self) -> bool {
        self.use_spatial_index
    }

    /// Applies an external command and returns the events it raised.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    /// Advances the simulation by `dt` and returns every event raised.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        self.ticks += 1;
        self.elapsed = self.elapsed.saturating_add(dt);

        let mut events = vec![Event::TimeAdvanced {
            dt_seconds: dt.as_secs_f32(),
        }];

        self.commands.clear();
        if let Some(spawning) = self.spawning.as_mut() {
            spawning.handle(dt, &mut self.commands);
        }
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        {
            let parts = self.world.parts_mut();
            self.movement
                .advance_all(dt, parts.path, parts.enemies, &mut events);

            let index = if self.use_spatial_index {
                match SpatialIndex::build(parts.enemies.as_slice(), parts.config.cell_size) {
                    Ok(index) => Some(index),
                    Err(error) => {
                        warn!("falling back to a linear scan: {error}");
                        None
                    }
                }
            } else {
                None
            };

            self.spawns.clear();
            self.targeting.update_all(
                dt,
                parts.towers,
                parts.enemies,
                index.as_ref(),
                &mut self.spawns,
            );
        }

        for spawn in self.spawns.drain(..) {
            events.push(Event::ProjectileFired {
                tower: spawn.tower,
                target: spawn.target,
            });
            let _ = self.combat.spawn(spawn);
        }

        self.combat.advance(
            dt,
            world::query::enemies(&self.world),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        trace!("tick {} raised {} events", self.ticks, events.len());
        events
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the projectiles in flight.
    #[must_use]
    pub fn combat(&self) -> &TowerCombat {
        &self.combat
    }

    /// Spawner attached through [`Simulation::with_spawning`], if any.
    #[must_use]
    pub fn spawning(&self) -> Option<&Spawning> {
        self.spawning.as_ref()
    }

    /// Number of completed steps.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total simulated time.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
