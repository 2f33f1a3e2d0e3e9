//! Tile map: static level geometry
//!
//! A fixed-size grid of cell ids built once from row-major level data.
//! Id 0 is empty; any other id is solid (the id also picks the atlas sprite,
//! which only the renderer cares about).
//!
//! Grid coordinates: `col` grows right, `row` grows DOWN from the top row.
//! World coordinates: y grows UP. `origin` is the world position of the
//! map's top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aabb::Aabb;

/// Why a level could not be turned into a map
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level data has {actual} cells, expected {width}x{height} = {expected}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("level must have at least one row and one column")]
    EmptyMap,
    #[error("tile size must be positive and finite, got {0}")]
    BadTileSize(f32),
}

/// A grid cell address (may lie outside the map)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Immutable tile grid with world-space collision queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    width: usize,
    height: usize,
    tile_size: f32,
    origin: Vec2,
    cells: Vec<u32>,
}

impl TileMap {
    /// Build a map from row-major level data
    pub fn new(
        width: usize,
        height: usize,
        cells: &[u32],
        tile_size: f32,
        origin: Vec2,
    ) -> Result<Self, LevelError> {
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyMap);
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(LevelError::BadTileSize(tile_size));
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(LevelError::SizeMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            tile_size,
            origin,
            cells: cells.to_vec(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.col >= 0
            && coord.row >= 0
            && (coord.col as usize) < self.width
            && (coord.row as usize) < self.height
    }

    /// Cell id at `coord`; cells outside the grid read as empty
    pub fn tile_id(&self, coord: TileCoord) -> u32 {
        if self.in_bounds(coord) {
            self.cells[coord.row as usize * self.width + coord.col as usize]
        } else {
            0
        }
    }

    #[inline]
    pub fn is_solid(&self, coord: TileCoord) -> bool {
        self.tile_id(coord) != 0
    }

    /// Grid cell containing a world point (not clamped to the grid)
    pub fn world_to_cell(&self, point: Vec2) -> TileCoord {
        let col = ((point.x - self.origin.x) / self.tile_size).floor() as i32;
        let row = ((self.origin.y - point.y) / self.tile_size).floor() as i32;
        TileCoord { col, row }
    }

    /// World-space rectangle covered by a cell
    pub fn cell_rect(&self, coord: TileCoord) -> Aabb {
        let ts = self.tile_size;
        let min = Vec2::new(
            self.origin.x + coord.col as f32 * ts,
            self.origin.y - (coord.row + 1) as f32 * ts,
        );
        Aabb::new(min, min + Vec2::splat(ts))
    }

    pub fn is_solid_at(&self, point: Vec2) -> bool {
        self.is_solid(self.world_to_cell(point))
    }

    /// World-space extent of the whole grid
    pub fn bounds(&self) -> Aabb {
        let size = Vec2::new(self.width as f32, self.height as f32) * self.tile_size;
        Aabb::new(
            Vec2::new(self.origin.x, self.origin.y - size.y),
            Vec2::new(self.origin.x + size.x, self.origin.y),
        )
    }

    /// Solid cells whose rectangles touch `area`, in row-major order
    pub fn solid_cells_in(&self, area: &Aabb) -> impl Iterator<Item = (TileCoord, Aabb)> + '_ {
        let top_left = self.world_to_cell(Vec2::new(area.min.x, area.max.y));
        let bottom_right = self.world_to_cell(Vec2::new(area.max.x, area.min.y));

        let max_col = self.width as i32 - 1;
        let max_row = self.height as i32 - 1;
        let (c0, c1) = (top_left.col.max(0), bottom_right.col.min(max_col));
        let (r0, r1) = (top_left.row.max(0), bottom_right.row.min(max_row));

        (r0..=r1)
            .flat_map(move |row| (c0..=c1).map(move |col| TileCoord { col, row }))
            .filter(|&coord| self.is_solid(coord))
            .map(|coord| (coord, self.cell_rect(coord)))
    }

    /// Number of solid cells (used by setup logging)
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != 0).count()
    }
}
