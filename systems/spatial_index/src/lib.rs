#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Uniform-grid spatial index rebuilt from a fresh entity snapshot every tick.
//!
//! The index borrows the snapshot it was built from and stores only source
//! positions into it, so it can never outlive the frame or be mistaken for
//! the owner of the entities it lists. Neighbourhood queries return the
//! contents of the 3×3 block of cells around a point: a cheap
//! over-approximation that callers refine with an exact distance check.

use std::{collections::HashMap, hash::Hash};

use log::trace;
use waypoint_defence_core::config::{ensure_positive, ConfigError};

pub use waypoint_defence_core::config::DEFAULT_CELL_SIZE;

/// Entity that can be placed into a [`SpatialIndex`].
pub trait Locatable {
    /// Identity used to recover the entity's source position.
    type Key: Copy + Eq + Hash;

    /// Identity of the entity within its owning collection.
    fn key(&self) -> Self::Key;

    /// World position, or `None` when the entity has no usable coordinates.
    fn position(&self) -> Option<(f32, f32)>;

    /// Whether the entity should take part in queries at all.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Integer coordinates of a grid cell.
pub type CellKey = (i64, i64);

/// Per-frame bucket grid over a borrowed entity slice.
#[derive(Debug)]
pub struct SpatialIndex<'a, T: Locatable> {
    entities: &'a [T],
    cell_size: f32,
    buckets: HashMap<CellKey, Vec<usize>>,
    source_positions: HashMap<T::Key, usize>,
    occupied: Option<CellBounds>,
}

/// Smallest rectangle of cells that holds every non-empty bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellBounds {
    min: CellKey,
    max: CellKey,
}

impl CellBounds {
    fn include(bounds: Option<Self>, cell: CellKey) -> Self {
        match bounds {
            None => Self {
                min: cell,
                max: cell,
            },
            Some(Self { min, max }) => Self {
                min: (min.0.min(cell.0), min.1.min(cell.1)),
                max: (max.0.max(cell.0), max.1.max(cell.1)),
            },
        }
    }
}

impl<'a, T: Locatable> SpatialIndex<'a, T> {
    /// Buckets every live entity with finite coordinates.
    ///
    /// Dead entities and entities without a position are skipped silently;
    /// they are absent from every query and from [`SpatialIndex::index_of`].
    pub fn build(entities: &'a [T], cell_size: f32) -> Result<Self, ConfigError> {
        ensure_positive("cell_size", cell_size)?;

        let mut buckets: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let mut source_positions = HashMap::with_capacity(entities.len());
        let mut occupied = None;

        for (source, entity) in entities.iter().enumerate() {
            if !entity.is_alive() {
                continue;
            }
            let Some((x, y)) = entity.position() else {
                continue;
            };
            let Some(cell) = cell_of(x, y, cell_size) else {
                continue;
            };

            buckets.entry(cell).or_default().push(source);
            let _ = source_positions.insert(entity.key(), source);
            occupied = Some(CellBounds::include(occupied, cell));
        }

        trace!(
            "spatial index rebuilt: {} of {} entities across {} cells",
            source_positions.len(),
            entities.len(),
            buckets.len()
        );

        Ok(Self {
            entities,
            cell_size,
            buckets,
            source_positions,
            occupied,
        })
    }

    /// Entities in the 3×3 block of cells around `(x, y)`.
    ///
    /// Cells are visited row by row from the top-left neighbour, and each
    /// bucket yields entities in snapshot order. Every entity within
    /// `cell_size` of the point is included; nothing farther than one cell in
    /// either axis is.
    pub fn neighbors(&self, x: f32, y: f32) -> impl Iterator<Item = &'a T> + '_ {
        self.neighbors_in_rings(x, y, 1)
    }

    /// Like [`SpatialIndex::neighbors`], widened so that no entity within
    /// `radius` of the point is missed even when `radius > cell_size`.
    ///
    /// The widened block is clipped to the occupied cells, and when it still
    /// covers more cells than there are buckets only the buckets are walked,
    /// so the cost never exceeds the number of occupied cells.
    pub fn neighbors_within(&self, x: f32, y: f32, radius: f32) -> impl Iterator<Item = &'a T> + '_ {
        self.neighbors_in_rings(x, y, self.rings_for(radius))
    }

    /// Source positions of the entities returned by [`SpatialIndex::neighbors`].
    pub fn neighbor_indices(&self, x: f32, y: f32) -> impl Iterator<Item = usize> + '_ {
        self.indices_in_rings(x, y, 1)
    }

    /// Position of the entity with `key` in the snapshot the index was built from.
    #[must_use]
    pub fn index_of(&self, key: T::Key) -> Option<usize> {
        self.source_positions.get(&key).copied()
    }

    /// Entity with `key`, if it was indexed.
    #[must_use]
    pub fn get(&self, key: T::Key) -> Option<&'a T> {
        self.index_of(key)
            .and_then(|source| self.entities.get(source))
    }

    /// Edge length of a single cell.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of entities that were indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source_positions.len()
    }

    /// Reports whether no entity was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_positions.is_empty()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Cell that contains `(x, y)`, or `None` for non-finite coordinates.
    #[must_use]
    pub fn cell_of(&self, x: f32, y: f32) -> Option<CellKey> {
        cell_of(x, y, self.cell_size)
    }

    fn rings_for(&self, radius: f32) -> i64 {
        if !radius.is_finite() || radius <= self.cell_size {
            return 1;
        }
        (radius / self.cell_size).ceil() as i64
    }

    fn neighbors_in_rings(&self, x: f32, y: f32, rings: i64) -> impl Iterator<Item = &'a T> + '_ {
        let entities = self.entities;
        self.indices_in_rings(x, y, rings)
            .filter_map(move |source| entities.get(source))
    }

    fn indices_in_rings(&self, x: f32, y: f32, rings: i64) -> impl Iterator<Item = usize> + '_ {
        let buckets = &self.buckets;
        self.cells_in_rings(x, y, rings)
            .into_iter()
            .filter_map(move |cell| buckets.get(&cell))
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Cells within `rings` of the point that may hold entities, row-major.
    fn cells_in_rings(&self, x: f32, y: f32, rings: i64) -> Vec<CellKey> {
        let (Some((column, row)), Some(occupied)) = (self.cell_of(x, y), self.occupied) else {
            return Vec::new();
        };

        let first_column = column.saturating_sub(rings).max(occupied.min.0);
        let last_column = column.saturating_add(rings).min(occupied.max.0);
        let first_row = row.saturating_sub(rings).max(occupied.min.1);
        let last_row = row.saturating_add(rings).min(occupied.max.1);
        if first_column > last_column || first_row > last_row {
            return Vec::new();
        }

        let width = i128::from(last_column) - i128::from(first_column) + 1;
        let height = i128::from(last_row) - i128::from(first_row) + 1;
        let scan_limit = self.buckets.len().max(9) as i128;
        if width * height <= scan_limit {
            return (first_row..=last_row)
                .flat_map(|cell_row| {
                    (first_column..=last_column).map(move |cell_column| (cell_column, cell_row))
                })
                .collect();
        }

        let mut cells: Vec<CellKey> = self
            .buckets
            .keys()
            .copied()
            .filter(|&(cell_column, cell_row)| {
                (first_column..=last_column).contains(&cell_column)
                    && (first_row..=last_row).contains(&cell_row)
            })
            .collect();
        cells.sort_unstable_by_key(|&(cell_column, cell_row)| (cell_row, cell_column));
        cells
    }
}

fn cell_of(x: f32, y: f32, cell_size: f32) -> Option<CellKey> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((
        (x / cell_size).floor() as i64,
        (y / cell_size).floor() as i64,
    ))
}
