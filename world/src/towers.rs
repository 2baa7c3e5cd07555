//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use log::debug;
use waypoint_defence_core::{TowerId, TowerSnapshot, WorldPoint};

/// Tower stored inside the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    position: WorldPoint,
    cooldown_remaining: f32,
}

impl Tower {
    /// Identifier allocated by the world for the tower.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Centre of the tower in world units.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Seconds left before the tower may fire again.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Whether the tower may attempt a shot.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Counts the cooldown down by `dt_seconds`, stopping at zero.
    pub fn tick_cooldown(&mut self, dt_seconds: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt_seconds).max(0.0);
    }

    /// Starts a new cooldown window after firing.
    pub fn reset_cooldown(&mut self, fire_interval: f32) {
        self.cooldown_remaining = fire_interval;
    }

    /// Captures an immutable snapshot for queries and rendering.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            cooldown_remaining: self.cooldown_remaining,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
///
/// Iteration follows placement order because identifiers grow monotonically.
#[derive(Debug)]
pub struct TowerSet {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerSet {
    /// Creates an empty tower registry with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Places a tower that is ready to fire immediately.
    pub fn place(&mut self, position: WorldPoint) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(
            id,
            Tower {
                id,
                position,
                cooldown_remaining: 0.0,
            },
        );
        debug!(
            "tower {} placed at ({:.1}, {:.1})",
            id.get(),
            position.x,
            position.y
        );
        id
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    /// Mutable lookup by identifier.
    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Iterator over towers in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Mutable iterator over towers in placement order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Number of placed towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no tower has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TowerSet {
    fn default() -> Self {
        Self::new()
    }
}
