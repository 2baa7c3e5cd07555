//! Fixed waypoint path that enemies traverse.

use waypoint_defence_core::{
    config::{ensure_positive, ConfigError},
    Waypoint, WorldPoint,
};

/// Ordered sequence of waypoints, shared read-only by every system.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    tile_size: f32,
}

impl Path {
    /// Creates a path over the provided waypoints.
    ///
    /// Fails when the list is empty or the tile size is not a positive,
    /// finite number.
    pub fn new(waypoints: Vec<Waypoint>, tile_size: f32) -> Result<Self, ConfigError> {
        ensure_positive("tile_size", tile_size)?;
        if waypoints.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        Ok(Self {
            waypoints,
            tile_size,
        })
    }

    /// World-space centre of waypoint `index`.
    ///
    /// `None` means the index lies past the final waypoint; movement treats
    /// that as the enemy having reached the base.
    #[must_use]
    pub fn waypoint_world_position(&self, index: usize) -> Option<WorldPoint> {
        self.waypoints
            .get(index)
            .map(|waypoint| waypoint.world_center(self.tile_size))
    }

    /// Position at which new enemies appear.
    #[must_use]
    pub fn spawn_point(&self) -> WorldPoint {
        self.waypoint_world_position(0).unwrap_or_default()
    }

    /// World-space centres of every waypoint in traversal order.
    pub fn world_positions(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.waypoints
            .iter()
            .map(|waypoint| waypoint.world_center(self.tile_size))
    }

    /// Grid waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Total polyline length between consecutive waypoint centres.
    #[must_use]
    pub fn length(&self) -> f32 {
        let positions: Vec<WorldPoint> = self.world_positions().collect();
        positions
            .windows(2)
            .map(|segment| segment[0].distance(segment[1]))
            .sum()
    }
}
