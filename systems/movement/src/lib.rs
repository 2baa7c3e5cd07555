#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path-following system that walks enemies from waypoint to waypoint.

use std::time::Duration;

use log::{debug, trace};
use waypoint_defence_core::{Event, SimulationConfig};
use waypoint_defence_world::{EnemySet, Path};

/// Advances every active enemy toward its current waypoint.
///
/// Arrival and movement are mutually exclusive within a tick: an enemy that
/// is within the arrival threshold switches to the next waypoint and stays
/// put until the following call.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    speed: f32,
    arrival_epsilon: f32,
}

impl Movement {
    /// Creates a movement system from a validated configuration.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            speed: config.enemy_speed,
            arrival_epsilon: config.arrival_epsilon,
        }
    }

    /// Moves enemies along `path` by `dt` worth of travel.
    ///
    /// Enemies whose target waypoint lies past the end of the path are
    /// removed and reported through [`Event::EnemyReachedBase`]. Removal is
    /// deferred to a compaction pass after iteration so no enemy is skipped
    /// or visited twice.
    pub fn advance_all(
        &self,
        dt: Duration,
        path: &Path,
        enemies: &mut EnemySet,
        out: &mut Vec<Event>,
    ) {
        if enemies.is_empty() {
            return;
        }

        let travel = self.speed * dt.as_secs_f32();

        for enemy in enemies.iter_mut() {
            if !enemy.is_active() {
                continue;
            }

            let waypoint = enemy.target_waypoint();
            let Some(target) = path.waypoint_world_position(waypoint) else {
                enemy.mark_for_removal();
                debug!("enemy {} reached the base", enemy.id().get());
                out.push(Event::EnemyReachedBase { enemy: enemy.id() });
                continue;
            };

            let position = enemy.position();
            if position.distance(target) < self.arrival_epsilon {
                enemy.advance_waypoint();
                trace!("enemy {} arrived at waypoint {waypoint}", enemy.id().get());
                out.push(Event::WaypointReached {
                    enemy: enemy.id(),
                    waypoint,
                });
                continue;
            }

            enemy.relocate(position.step_toward(target, travel));
        }

        let removed = enemies.compact();
        if removed > 0 {
            trace!("compacted {removed} enemies after movement");
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
