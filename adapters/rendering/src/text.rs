//! Character-grid backend for terminals and logs.

use std::io::Write;

use anyhow::Context as _;
use glam::Vec2;

use crate::{AnyResult, RenderingBackend, RenderingError, Scene};

const EMPTY: char = ' ';
const PATH: char = '.';
const TOWER: char = 'T';
const PROJECTILE: char = '*';
const HEALTHY_ENEMY: char = 'E';
const WOUNDED_ENEMY: char = 'e';

/// Enemies above this health fraction are drawn as [`HEALTHY_ENEMY`].
const HEALTHY_THRESHOLD: f32 = 0.5;

/// Largest grid drawn; anything beyond is cropped.
const MAX_COLUMNS: f32 = 400.0;
const MAX_ROWS: f32 = 200.0;

/// Backend that rasterises scenes into rows of characters.
///
/// Each character covers a `glyph_size` square of world units. Later layers
/// overwrite earlier ones: path, towers, projectiles, enemies. Scenes larger
/// than 400 by 200 glyphs are cropped to their top-left corner.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    glyph_size: f32,
    frames: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `writer`.
    pub fn new(writer: W, glyph_size: f32) -> Result<Self, RenderingError> {
        if !glyph_size.is_finite() || glyph_size <= 0.0 {
            return Err(RenderingError::InvalidGlyphSize { glyph_size });
        }

        Ok(Self {
            writer,
            glyph_size,
            frames: 0,
        })
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Consumes the backend and hands back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Rasterises `scene` into one string per grid row.
    #[must_use]
    pub fn rasterise(&self, scene: &Scene) -> Vec<String> {
        let mut grid = Grid::new(scene.bounds(), self.glyph_size);

        for segment in scene.path.points.windows(2) {
            grid.line(segment[0], segment[1], PATH);
        }
        if let [only] = scene.path.points.as_slice() {
            grid.plot(*only, PATH);
        }
        for tower in &scene.towers {
            grid.plot(tower.position, TOWER);
        }
        for projectile in &scene.projectiles {
            grid.plot(projectile.position, PROJECTILE);
        }
        for enemy in &scene.enemies {
            let glyph = if enemy.health_fraction > HEALTHY_THRESHOLD {
                HEALTHY_ENEMY
            } else {
                WOUNDED_ENEMY
            };
            grid.plot(enemy.position, glyph);
        }

        grid.into_rows()
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let rows = self.rasterise(scene);
        self.frames += 1;

        writeln!(self.writer, "frame {}", self.frames).context("failed to write frame header")?;
        for row in rows {
            writeln!(self.writer, "{row}").context("failed to write frame row")?;
        }
        self.writer.flush().context("failed to flush frame")?;
        Ok(())
    }
}

struct Grid {
    columns: usize,
    rows: usize,
    glyph_size: f32,
    cells: Vec<char>,
}

impl Grid {
    fn new(bounds: Vec2, glyph_size: f32) -> Self {
        let extent = (bounds / glyph_size)
            .ceil()
            .clamp(Vec2::ONE, Vec2::new(MAX_COLUMNS, MAX_ROWS));
        let columns = extent.x as usize;
        let rows = extent.y as usize;

        Self {
            columns,
            rows,
            glyph_size,
            cells: vec![EMPTY; columns * rows],
        }
    }

    fn plot(&mut self, position: Vec2, glyph: char) {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return;
        }
        let cell = position / self.glyph_size;
        let (column, row) = (cell.x as usize, cell.y as usize);
        if column >= self.columns || row >= self.rows {
            return;
        }
        self.cells[row * self.columns + column] = glyph;
    }

    fn line(&mut self, from: Vec2, to: Vec2, glyph: char) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };
        let step = self.glyph_size / 2.0;
        let samples = (from.distance(to) / step).ceil().max(1.0) as usize;
        for sample in 0..=samples {
            self.plot(from.lerp(to, sample as f32 / samples as f32), glyph);
        }
    }

    /// Liang-Barsky clip of the segment against the grid area.
    fn clip(&self, from: Vec2, to: Vec2) -> Option<(Vec2, Vec2)> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        let size = Vec2::new(self.columns as f32, self.rows as f32) * self.glyph_size;
        let delta = to - from;
        let edges = [
            (-delta.x, from.x),
            (delta.x, size.x - from.x),
            (-delta.y, from.y),
            (delta.y, size.y - from.y),
        ];

        let (mut enter, mut exit) = (0.0_f32, 1.0_f32);
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
        }
        if enter > exit {
            return None;
        }
        Some((from + delta * enter, from + delta * exit))
    }

    fn into_rows(self) -> Vec<String> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().collect())
            .collect()
    }
}
