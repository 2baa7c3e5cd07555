//! Authoritative enemy state and its lifecycle.

use log::debug;
use waypoint_defence_core::{EnemyId, EnemySnapshot, Health, WorldPoint};
use waypoint_defence_system_spatial_index::Locatable;

/// Lifecycle tag used to remove enemies without disturbing iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    /// The enemy is on the path and takes part in every system.
    Active,
    /// The enemy left the path or died and is dropped at the next compaction.
    PendingRemoval,
}

/// Single enemy walking the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    position: WorldPoint,
    health: Health,
    max_health: Health,
    target_waypoint: usize,
    state: EnemyState,
}

impl Enemy {
    fn spawn(id: EnemyId, position: WorldPoint, max_health: Health) -> Self {
        Self {
            id,
            position,
            health: max_health,
            max_health,
            target_waypoint: 1,
            state: EnemyState::Active,
        }
    }

    /// Identifier allocated when the enemy spawned.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Hit points at spawn.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        self.max_health
    }

    /// Index of the waypoint the enemy is heading for.
    #[must_use]
    pub const fn target_waypoint(&self) -> usize {
        self.target_waypoint
    }

    /// Lifecycle tag.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Whether the enemy still takes part in movement and targeting.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == EnemyState::Active && !self.health.is_depleted()
    }

    /// Moves the enemy to `position`.
    pub fn relocate(&mut self, position: WorldPoint) {
        self.position = position;
    }

    /// Switches the enemy to the next waypoint. The index never decreases.
    pub fn advance_waypoint(&mut self) {
        self.target_waypoint = self.target_waypoint.saturating_add(1);
    }

    /// Tags the enemy for removal at the next [`EnemySet::compact`].
    pub fn mark_for_removal(&mut self) {
        self.state = EnemyState::PendingRemoval;
    }

    /// Captures an immutable snapshot for queries and rendering.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            target_waypoint: self.target_waypoint,
        }
    }
}

impl Locatable for Enemy {
    type Key = EnemyId;

    fn key(&self) -> EnemyId {
        self.id
    }

    fn position(&self) -> Option<(f32, f32)> {
        self.position
            .is_finite()
            .then_some((self.position.x, self.position.y))
    }

    fn is_alive(&self) -> bool {
        self.is_active()
    }
}

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    /// Hit points left after the hit.
    pub remaining: Health,
    /// Whether this hit depleted the enemy.
    pub killed: bool,
}

/// Collection that exclusively owns every enemy, in spawn order.
#[derive(Debug)]
pub struct EnemySet {
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemySet {
    /// Creates an empty set with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Adds an enemy at `position` with full health heading for waypoint 1.
    pub fn spawn(&mut self, position: WorldPoint, max_health: Health) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        self.enemies.push(Enemy::spawn(id, position, max_health));
        debug!(
            "enemy {} spawned at ({:.1}, {:.1}) with {:.1} hp",
            id.get(),
            position.x,
            position.y,
            max_health.get()
        );
        id
    }

    /// Removes `amount` hit points from the enemy, tagging it for removal
    /// once depleted.
    ///
    /// Returns `None` when the enemy does not exist or is already pending
    /// removal.
    pub fn apply_damage(&mut self, id: EnemyId, amount: Health) -> Option<DamageOutcome> {
        let slot = self.slot_of(id)?;
        let enemy = &mut self.enemies[slot];
        if enemy.state != EnemyState::Active {
            return None;
        }

        enemy.health = enemy.health.saturating_sub(amount);
        let killed = enemy.health.is_depleted();
        if killed {
            enemy.mark_for_removal();
            debug!("enemy {} destroyed", id.get());
        }

        Some(DamageOutcome {
            remaining: enemy.health,
            killed,
        })
    }

    /// Drops every enemy tagged for removal or out of hit points, preserving
    /// the order of the rest.
    ///
    /// Returns the number of enemies removed.
    pub fn compact(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(Enemy::is_active);
        before - self.enemies.len()
    }

    /// Looks up an enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slot_of(id).map(|slot| &self.enemies[slot])
    }

    /// Identifiers increase in spawn order and compaction keeps that order,
    /// so the set is always sorted by id.
    fn slot_of(&self, id: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
    }

    /// Iterator over all enemies in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Mutable iterator over all enemies in spawn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    /// Enemies as a contiguous slice, suitable for building a spatial index.
    #[must_use]
    pub fn as_slice(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Number of enemies, including any pending removal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Reports whether the set holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

impl Default for EnemySet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_enemy_targets_second_waypoint_with_full_health() {
        let mut enemies = EnemySet::new();
        let id = enemies.spawn(WorldPoint::new(32.0, 288.0), Health::new(100.0));

        let enemy = enemies.get(id).expect("enemy");
        assert_eq!(enemy.target_waypoint(), 1);
        assert_eq!(enemy.health(), Health::new(100.0));
        assert_eq!(enemy.position(), WorldPoint::new(32.0, 288.0));
        assert!(enemy.is_active());
    }

    #[test]
    fn identifiers_are_not_reused_after_removal() {
        let mut enemies = EnemySet::new();
        let first = enemies.spawn(WorldPoint::default(), Health::new(1.0));
        let _ = enemies.apply_damage(first, Health::new(5.0));
        assert_eq!(enemies.compact(), 1);

        let second = enemies.spawn(WorldPoint::default(), Health::new(1.0));
        assert_ne!(first, second);
    }

    #[test]
    fn lethal_damage_marks_enemy_until_compaction() {
        let mut enemies = EnemySet::new();
        let id = enemies.spawn(WorldPoint::default(), Health::new(30.0));

        let outcome = enemies.apply_damage(id, Health::new(25.0)).expect("hit");
        assert!(!outcome.killed);
        assert_eq!(outcome.remaining, Health::new(5.0));

        let outcome = enemies.apply_damage(id, Health::new(25.0)).expect("hit");
        assert!(outcome.killed);
        assert_eq!(outcome.remaining, Health::ZERO);
        assert_eq!(enemies.len(), 1);
        assert!(!enemies.get(id).expect("pending").is_active());

        assert_eq!(enemies.apply_damage(id, Health::new(1.0)), None);
        assert_eq!(enemies.compact(), 1);
        assert!(enemies.is_empty());
    }

    #[test]
    fn compaction_preserves_order_of_survivors() {
        let mut enemies = EnemySet::new();
        let ids: Vec<_> = (0..5)
            .map(|_| enemies.spawn(WorldPoint::default(), Health::new(10.0)))
            .collect();

        for enemy in enemies.iter_mut() {
            if enemy.id() == ids[1] || enemy.id() == ids[3] {
                enemy.mark_for_removal();
            }
        }
        assert_eq!(enemies.compact(), 2);

        let remaining: Vec<_> = enemies.iter().map(Enemy::id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[4]]);
    }

    #[test]
    fn waypoint_index_only_grows() {
        let mut enemies = EnemySet::new();
        let _ = enemies.spawn(WorldPoint::default(), Health::new(10.0));
        let enemy = enemies.iter_mut().next().expect("enemy");

        enemy.advance_waypoint();
        enemy.advance_waypoint();
        assert_eq!(enemy.target_waypoint(), 3);
    }

    #[test]
    fn non_finite_positions_are_not_locatable() {
        let mut enemies = EnemySet::new();
        let _ = enemies.spawn(WorldPoint::new(f32::NAN, 0.0), Health::new(10.0));
        let enemy = enemies.iter().next().expect("enemy");

        assert_eq!(Locatable::position(enemy), None);
    }

    #[test]
    fn compaction_drops_enemies_without_hit_points() {
        let mut enemies = EnemySet::new();
        let empty = enemies.spawn(WorldPoint::default(), Health::ZERO);
        let alive = enemies.spawn(WorldPoint::default(), Health::new(10.0));

        assert!(!enemies.get(empty).expect("spawned").is_active());
        assert_eq!(enemies.compact(), 1);
        assert_eq!(enemies.get(empty), None);
        assert!(enemies.get(alive).is_some());
    }

    #[test]
    fn lookup_finds_survivors_after_compaction() {
        let mut enemies = EnemySet::new();
        let ids: Vec<_> = (0..64)
            .map(|_| enemies.spawn(WorldPoint::default(), Health::new(10.0)))
            .collect();
        for id in ids.iter().step_by(3) {
            let _ = enemies.apply_damage(*id, Health::new(10.0));
        }
        let _ = enemies.compact();

        for (index, id) in ids.iter().enumerate() {
            let found = enemies.get(*id).map(Enemy::id);
            if index % 3 == 0 {
                assert_eq!(found, None);
                assert_eq!(enemies.apply_damage(*id, Health::new(1.0)), None);
            } else {
                assert_eq!(found, Some(*id));
            }
        }
        assert_eq!(enemies.get(EnemyId::new(1_000)), None);
    }
}
