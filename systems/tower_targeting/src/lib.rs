#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower system that counts down cooldowns, acquires targets and fires.
//!
//! Towers never apply damage; a shot is a [`ProjectileSpawn`] request for
//! the combat resolver. Target choice is delegated to a [`TargetSelector`]
//! so the policy can be swapped without touching the cooldown logic.

use std::time::Duration;

use log::trace;
use waypoint_defence_core::{ProjectileSpawn, SimulationConfig, WorldPoint};
use waypoint_defence_system_spatial_index::SpatialIndex;
use waypoint_defence_world::{Enemy, EnemySet, TowerSet};

/// Policy that picks a target among candidate enemies.
pub trait TargetSelector {
    /// Chooses a target for a tower at `origin` with the given `range`.
    ///
    /// `candidates` may contain enemies out of range or inactive ones;
    /// implementations must filter by exact distance themselves.
    fn select<'e, I>(&self, origin: WorldPoint, range: f32, candidates: I) -> Option<&'e Enemy>
    where
        I: Iterator<Item = &'e Enemy>;
}

/// Picks the first candidate in iteration order that lies within range.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstInRange;

impl TargetSelector for FirstInRange {
    fn select<'e, I>(&self, origin: WorldPoint, range: f32, mut candidates: I) -> Option<&'e Enemy>
    where
        I: Iterator<Item = &'e Enemy>,
    {
        candidates.find(|enemy| in_range(origin, range, enemy))
    }
}

/// Picks the closest candidate within range; ties keep the earlier one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestInRange;

impl TargetSelector for NearestInRange {
    fn select<'e, I>(&self, origin: WorldPoint, range: f32, candidates: I) -> Option<&'e Enemy>
    where
        I: Iterator<Item = &'e Enemy>,
    {
        let mut best: Option<(f32, &'e Enemy)> = None;
        for enemy in candidates {
            if !in_range(origin, range, enemy) {
                continue;
            }
            let distance_sq = origin.distance_squared(enemy.position());
            match best {
                Some((best_sq, _)) if best_sq <= distance_sq => {}
                _ => best = Some((distance_sq, enemy)),
            }
        }
        best.map(|(_, enemy)| enemy)
    }
}

fn in_range(origin: WorldPoint, range: f32, enemy: &Enemy) -> bool {
    enemy.is_active() && origin.distance(enemy.position()) <= range
}

/// Tower targeting system parameterised over its selection policy.
#[derive(Clone, Debug)]
pub struct TowerTargeting<S = FirstInRange> {
    selector: S,
    range: f32,
    fire_interval: f32,
}

impl TowerTargeting<FirstInRange> {
    /// Creates a targeting system using the first-in-range policy.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_selector(config, FirstInRange)
    }
}

impl<S: TargetSelector> TowerTargeting<S> {
    /// Creates a targeting system using a custom selection policy.
    #[must_use]
    pub fn with_selector(config: &SimulationConfig, selector: S) -> Self {
        Self {
            selector,
            range: config.tower_range,
            fire_interval: config.fire_interval,
        }
    }

    /// Targeting radius shared by every tower.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Updates every tower once and queues a projectile for each shot.
    ///
    /// Each tower's cooldown is reduced by `dt`; a ready tower searches the
    /// spatial `index` neighbourhood around itself when one is supplied, or
    /// the whole enemy set otherwise. Only firing resets the cooldown, so a
    /// tower with nothing in range simply tries again next call.
    pub fn update_all(
        &self,
        dt: Duration,
        towers: &mut TowerSet,
        enemies: &EnemySet,
        index: Option<&SpatialIndex<'_, Enemy>>,
        out: &mut Vec<ProjectileSpawn>,
    ) {
        let dt_seconds = dt.as_secs_f32();

        for tower in towers.iter_mut() {
            tower.tick_cooldown(dt_seconds);
            if !tower.is_ready() {
                continue;
            }

            let origin = tower.position();
            let target = match index {
                Some(index) => self.selector.select(
                    origin,
                    self.range,
                    index.neighbors_within(origin.x, origin.y, self.range),
                ),
                None => self.selector.select(origin, self.range, enemies.iter()),
            };

            let Some(target) = target else {
                continue;
            };

            trace!(
                "tower {} fires at enemy {}",
                tower.id().get(),
                target.id().get()
            );
            out.push(ProjectileSpawn {
                tower: tower.id(),
                origin,
                target: target.id(),
            });
            tower.reset_cooldown(self.fire_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::Health;

    fn enemies_at(points: &[(f32, f32)]) -> EnemySet {
        let mut enemies = EnemySet::new();
        for &(x, y) in points {
            let _ = enemies.spawn(WorldPoint::new(x, y), Health::new(10.0));
        }
        enemies
    }

    #[test]
    fn first_in_range_respects_iteration_order() {
        let enemies = enemies_at(&[(140.0, 0.0), (20.0, 0.0)]);

        let chosen = FirstInRange
            .select(WorldPoint::default(), 150.0, enemies.iter())
            .expect("target");
        assert_eq!(chosen.position(), WorldPoint::new(140.0, 0.0));
    }

    #[test]
    fn nearest_in_range_prefers_closest() {
        let enemies = enemies_at(&[(140.0, 0.0), (20.0, 0.0), (-20.0, 0.0)]);

        let chosen = NearestInRange
            .select(WorldPoint::default(), 150.0, enemies.iter())
            .expect("target");
        assert_eq!(chosen.position(), WorldPoint::new(20.0, 0.0));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let enemies = enemies_at(&[(150.0, 0.0)]);
        assert!(FirstInRange
            .select(WorldPoint::default(), 150.0, enemies.iter())
            .is_some());

        let enemies = enemies_at(&[(150.5, 0.0)]);
        assert!(NearestInRange
            .select(WorldPoint::default(), 150.0, enemies.iter())
            .is_none());
    }

    #[test]
    fn inactive_enemies_are_never_selected() {
        let mut enemies = enemies_at(&[(10.0, 0.0)]);
        for enemy in enemies.iter_mut() {
            enemy.mark_for_removal();
        }

        assert!(FirstInRange
            .select(WorldPoint::default(), 150.0, enemies.iter())
            .is_none());
    }
}
