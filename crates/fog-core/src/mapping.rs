//! World ↔ grid coordinate mapping.
//!
//! The grid covers the square `[center - size/2, center + size/2)` on each
//! axis. A world point is first mapped to normalized UV space
//! (`world * scale + offset`, the same parameters a shader samples with) and
//! then multiplied by the resolution to land in cell space.

use serde::{Deserialize, Serialize};

use crate::error::FogError;

/// A point in world space, projected onto the fog plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const ORIGIN: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A signed cell coordinate. May lie outside the grid; callers clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Transform parameters handed to rendering consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappingParams {
    pub resolution: u32,
    /// Per-axis world → UV scale (`1 / world_size`)
    pub scale: f32,
    /// Per-axis world → UV offset (`-center / world_size + 0.5`)
    pub offset: WorldPoint,
}

/// Largest accepted resolution. Keeps `resolution²` cells allocatable.
pub const MAX_RESOLUTION: u32 = 1 << 14;

/// The world→grid transform. Always built from validated inputs, and rebuilt
/// as a whole whenever any of them changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapping {
    resolution: u32,
    world_size: f32,
    world_center: WorldPoint,
    scale: f32,
    offset: WorldPoint,
}

impl Mapping {
    pub fn new(resolution: u32, world_size: f32, world_center: WorldPoint) -> Result<Self, FogError> {
        if resolution == 0 || resolution > MAX_RESOLUTION {
            return Err(FogError::InvalidResolution(resolution));
        }
        if !world_size.is_finite() || world_size <= 0.0 {
            return Err(FogError::InvalidWorldSize(world_size));
        }
        if !world_center.is_finite() {
            return Err(FogError::InvalidWorldCenter {
                x: world_center.x,
                y: world_center.y,
            });
        }

        let scale = 1.0 / world_size;
        let offset = WorldPoint::new(
            -world_center.x / world_size + 0.5,
            -world_center.y / world_size + 0.5,
        );
        // Tiny sizes or far-away centres can still overflow once divided.
        if !scale.is_finite() {
            return Err(FogError::InvalidWorldSize(world_size));
        }
        if !offset.is_finite() {
            return Err(FogError::InvalidWorldCenter {
                x: world_center.x,
                y: world_center.y,
            });
        }

        Ok(Self {
            resolution,
            world_size,
            world_center,
            scale,
            offset,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn world_size(&self) -> f32 {
        self.world_size
    }

    pub fn world_center(&self) -> WorldPoint {
        self.world_center
    }

    /// World-space width of a single cell.
    pub fn cell_size(&self) -> f32 {
        self.world_size / self.resolution as f32
    }

    pub fn params(&self) -> MappingParams {
        MappingParams {
            resolution: self.resolution,
            scale: self.scale,
            offset: self.offset,
        }
    }

    /// Normalized texture coordinates; `[0, 1)` inside the world bounds.
    pub fn world_to_uv(&self, point: WorldPoint) -> (f32, f32) {
        (
            point.x * self.scale + self.offset.x,
            point.y * self.scale + self.offset.y,
        )
    }

    /// Continuous cell-space coordinates.
    pub fn world_to_grid(&self, point: WorldPoint) -> (f32, f32) {
        let (u, v) = self.world_to_uv(point);
        let res = self.resolution as f32;
        (u * res, v * res)
    }

    /// The cell containing `point`. No bounds checking.
    pub fn world_to_cell(&self, point: WorldPoint) -> CellCoord {
        let (gx, gy) = self.world_to_grid(point);
        CellCoord::new(gx.floor() as i32, gy.floor() as i32)
    }

    /// World-space centre of `cell`.
    pub fn cell_center_to_world(&self, cell: CellCoord) -> WorldPoint {
        let res = self.resolution as f32;
        let u = (cell.x as f32 + 0.5) / res;
        let v = (cell.y as f32 + 0.5) / res;
        WorldPoint::new(
            (u - self.offset.x) / self.scale,
            (v - self.offset.y) / self.scale,
        )
    }

    /// Vision radius in whole cells, truncated toward zero.
    pub fn radius_in_cells(&self, radius: f32) -> i32 {
        (radius / self.world_size * self.resolution as f32).trunc() as i32
    }
}
