//! Visibility Grid
//!
//! A square, row-major buffer of [`CellState`] together with the mapping that
//! places it in the world.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FogError;
use crate::mapping::{CellCoord, Mapping, WorldPoint};

/// Visibility of a single cell. Ordered from least to most known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    /// Never seen
    #[default]
    Unexplored,
    /// Seen before, not currently in view
    Explored,
    /// In view of at least one revealer this tick
    Visible,
}

#[derive(Debug, Clone)]
pub struct VisibilityGrid {
    mapping: Mapping,
    cells: Vec<CellState>,
    dirty: bool,
}

impl VisibilityGrid {
    /// Creates a grid with every cell `Unexplored`.
    pub fn new(resolution: u32, world_size: f32, world_center: WorldPoint) -> Result<Self, FogError> {
        let mapping = Mapping::new(resolution, world_size, world_center)?;
        debug!(resolution, world_size, ?world_center, "visibility grid created");

        Ok(Self {
            mapping,
            cells: vec![CellState::Unexplored; cell_count(resolution)],
            dirty: false,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.mapping.resolution()
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Row-major cell buffer (`index = y * resolution + x`).
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn world_to_cell(&self, point: WorldPoint) -> CellCoord {
        self.mapping.world_to_cell(point)
    }

    pub fn world_to_grid(&self, point: WorldPoint) -> (f32, f32) {
        self.mapping.world_to_grid(point)
    }

    pub fn cell_center_to_world(&self, cell: CellCoord) -> WorldPoint {
        self.mapping.cell_center_to_world(cell)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let res = self.resolution() as i64;
        (0..res).contains(&(x as i64)) && (0..res).contains(&(y as i64))
    }

    pub fn get(&self, x: i32, y: i32) -> Option<CellState> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }

    /// Demotes every `Visible` cell to `Explored`. Returns how many changed.
    pub fn age_step(&mut self) -> usize {
        let mut aged = 0;
        for cell in self.cells.iter_mut() {
            if *cell == CellState::Visible {
                *cell = CellState::Explored;
                aged += 1;
            }
        }
        if aged > 0 {
            self.dirty = true;
        }
        aged
    }

    /// Marks a cell `Visible`. Out-of-bounds coordinates are ignored.
    /// Returns `true` if the cell changed.
    pub fn mark_visible(&mut self, x: i32, y: i32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        if self.cells[i] == CellState::Visible {
            return false;
        }
        self.cells[i] = CellState::Visible;
        self.dirty = true;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Changes the resolution. All cells are reset to `Unexplored`.
    pub fn resize(&mut self, resolution: u32) -> Result<(), FogError> {
        let mapping = Mapping::new(resolution, self.mapping.world_size(), self.mapping.world_center())?;
        self.mapping = mapping;
        self.cells = vec![CellState::Unexplored; cell_count(resolution)];
        self.dirty = true;
        debug!(resolution, "visibility grid resized");
        Ok(())
    }

    /// Moves or scales the covered world region. Cell states are kept; the
    /// grid is marked dirty so consumers pick up the new transform.
    pub fn set_world_bounds(&mut self, world_size: f32, world_center: WorldPoint) -> Result<(), FogError> {
        self.mapping = Mapping::new(self.mapping.resolution(), world_size, world_center)?;
        self.dirty = true;
        debug!(world_size, ?world_center, "visibility grid bounds changed");
        Ok(())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.resolution() as usize + x as usize)
    }
}

/// `resolution` is capped by `Mapping::new`, so the product cannot overflow.
fn cell_count(resolution: u32) -> usize {
    resolution as usize * resolution as usize
}
