//! Tile grid and its rasterization into collision geometry

use rising_math::{Vec3, AABB};
use rising_physics::CollisionVolume;
use serde::{Deserialize, Serialize};

use crate::cell::CellType;
use crate::error::{LevelError, Result};

/// Default edge length of one cell in world units
pub const DEFAULT_CELL_SIZE: f32 = 1.6;

/// Read-only arena layout
///
/// Cell `(x, z)` is centered at `origin + (x * cell_size - width * cell_size / 2,
/// 0, z * cell_size - depth * cell_size / 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLevel {
    /// Row-major, `depth` rows of `width` cells
    cells: Vec<CellType>,
    width: usize,
    depth: usize,
    cell_size: f32,
    origin: Vec3,
}

impl GridLevel {
    /// Build from rows of cells
    pub fn new(rows: Vec<Vec<CellType>>, cell_size: f32) -> Result<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(LevelError::InvalidCellSize(cell_size));
        }
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(LevelError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }

        let depth = rows.len();
        Ok(Self {
            cells: rows.into_iter().flatten().collect(),
            width,
            depth,
            cell_size,
            origin: Vec3::ZERO,
        })
    }

    /// One spawn cell at the origin
    pub fn single_cell() -> Self {
        Self {
            cells: vec![CellType::PlayerSpawn],
            width: 1,
            depth: 1,
            cell_size: DEFAULT_CELL_SIZE,
            origin: Vec3::ZERO,
        }
    }

    /// Shift the whole grid in the world
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin.flat();
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn cell_at(&self, x: usize, z: usize) -> Option<&CellType> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        self.cells.get(z * self.width + x)
    }

    /// Iterate `(x, z, cell)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellType)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % width, i / width, cell))
    }

    fn offset(&self) -> (f32, f32) {
        (
            self.width as f32 * self.cell_size / 2.0,
            self.depth as f32 * self.cell_size / 2.0,
        )
    }

    /// World-space center of a cell, on the ground
    pub fn grid_to_world(&self, x: usize, z: usize) -> Vec3 {
        let (offset_x, offset_z) = self.offset();
        Vec3::new(
            self.origin.x + x as f32 * self.cell_size - offset_x,
            0.0,
            self.origin.z + z as f32 * self.cell_size - offset_z,
        )
    }

    /// Cell containing a world point, None outside the grid
    pub fn world_to_grid(&self, point: Vec3) -> Option<(usize, usize)> {
        if !point.is_finite() {
            return None;
        }
        let (offset_x, offset_z) = self.offset();
        let gx = ((point.x - self.origin.x + offset_x) / self.cell_size + 0.5).floor();
        let gz = ((point.z - self.origin.z + offset_z) / self.cell_size + 0.5).floor();
        if gx < 0.0 || gz < 0.0 || gx >= self.width as f32 || gz >= self.depth as f32 {
            return None;
        }
        Some((gx as usize, gz as usize))
    }

    /// Footprint of a cell extruded to `height`
    pub fn cell_bounds(&self, x: usize, z: usize, height: f32) -> AABB {
        let center = self.grid_to_world(x, z);
        AABB::pillar(center.x, center.z, self.cell_size / 2.0, height)
    }

    /// Rasterize into static collision volumes
    ///
    /// Blocking cells become solid boxes sized by type. Entrances become
    /// non-solid trigger boxes.
    pub fn static_volumes(&self) -> Vec<CollisionVolume> {
        let mut volumes = Vec::new();
        for (x, z, cell) in self.cells() {
            if let Some(height) = cell.solid_height() {
                volumes.push(CollisionVolume::wall(self.cell_bounds(x, z, height)));
            } else if *cell == CellType::Entrance {
                volumes.push(CollisionVolume::trigger(self.cell_bounds(x, z, 1.0)));
            }
        }
        log::debug!(
            "Rasterized {}x{} grid into {} static volumes",
            self.width,
            self.depth,
            volumes.len()
        );
        volumes
    }

    /// Player spawn point, or the center of the first walkable cell
    pub fn spawn_point(&self) -> Vec3 {
        let spawn = self
            .cells()
            .find(|(_, _, cell)| **cell == CellType::PlayerSpawn)
            .or_else(|| {
                self.cells()
                    .find(|(_, _, cell)| matches!(cell, CellType::Floor))
            });
        match spawn {
            Some((x, z, _)) => self.grid_to_world(x, z),
            None => self.origin,
        }
    }

    /// Enemy spawns as `(archetype tag, point)` in row-major order
    pub fn enemy_spawns(&self) -> Vec<(String, Vec3)> {
        self.cells()
            .filter_map(|(x, z, cell)| match cell {
                CellType::EnemySpawn(tag) => Some((tag.clone(), self.grid_to_world(x, z))),
                _ => None,
            })
            .collect()
    }
}
