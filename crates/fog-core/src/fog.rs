//! Fog of War
//!
//! Owns the visibility grid and the revealer registry and runs the per-tick
//! update: age, reveal, publish.
//!
//! # Example
//!
//! ```
//! use fog_core::{CellState, FogOfWar, FrameRecorder, GridSettings, WorldPoint};
//! use std::collections::HashMap;
//!
//! let mut fog = FogOfWar::init(&GridSettings::new(4, 4.0, WorldPoint::ORIGIN)).unwrap();
//! fog.register("scout", 1.0);
//!
//! let positions = HashMap::from([("scout", WorldPoint::ORIGIN)]);
//! let mut frames = FrameRecorder::new();
//! fog.tick(&positions, &mut frames);
//!
//! assert_eq!(fog.grid().count(CellState::Visible), 4);
//! assert_eq!(frames.total_published(), 1);
//! ```

use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::FogError;
use crate::frame::{GridFrame, GridSink};
use crate::grid::VisibilityGrid;
use crate::mapping::{Mapping, WorldPoint};
use crate::registry::{PositionSource, RevealerRegistry};

/// Resolution and world placement of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Cells per side
    pub resolution: u32,
    /// World-space width (and height) covered by the grid
    pub world_size: f32,
    /// World-space centre of the covered square
    pub world_center: WorldPoint,
}

impl GridSettings {
    pub fn new(resolution: u32, world_size: f32, world_center: WorldPoint) -> Self {
        Self {
            resolution,
            world_size,
            world_center,
        }
    }

    /// Checks the settings without allocating a grid.
    pub fn validate(&self) -> Result<(), FogError> {
        Mapping::new(self.resolution, self.world_size, self.world_center).map(|_| ())
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            resolution: 128,
            world_size: 100.0,
            world_center: WorldPoint::ORIGIN,
        }
    }
}

/// Summary of one call to [`FogOfWar::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Cells demoted from `Visible` to `Explored`
    pub aged: usize,
    /// Cells promoted to `Visible`
    pub revealed: usize,
    /// Revealers rasterized this tick
    pub revealers: usize,
    /// Registered revealers without a usable position
    pub skipped: usize,
    /// Whether a frame was handed to the sink
    pub published: bool,
}

/// Fog-of-war state owned by the host application.
#[derive(Debug, Clone)]
pub struct FogOfWar<K> {
    grid: VisibilityGrid,
    registry: RevealerRegistry<K>,
    tick: u64,
}

impl<K: Eq + Hash> FogOfWar<K> {
    /// Builds an all-`Unexplored` grid. Invalid settings are rejected.
    pub fn init(settings: &GridSettings) -> Result<Self, FogError> {
        let grid = VisibilityGrid::new(settings.resolution, settings.world_size, settings.world_center)?;
        debug!(resolution = settings.resolution, "fog of war initialized");

        Ok(Self {
            grid,
            registry: RevealerRegistry::new(),
            tick: 0,
        })
    }

    pub fn grid(&self) -> &VisibilityGrid {
        &self.grid
    }

    pub fn registry(&self) -> &RevealerRegistry<K> {
        &self.registry
    }

    pub fn mapping(&self) -> &Mapping {
        self.grid.mapping()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn is_dirty(&self) -> bool {
        self.grid.is_dirty()
    }

    pub fn register(&mut self, id: K, radius: f32) -> bool {
        let added = self.registry.register(id, radius);
        if added {
            debug!(radius, revealers = self.registry.len(), "revealer registered");
        }
        added
    }

    pub fn unregister(&mut self, id: &K) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            debug!(revealers = self.registry.len(), "revealer unregistered");
        }
        removed
    }

    pub fn set_radius(&mut self, id: &K, radius: f32) -> bool {
        self.registry.set_radius(id, radius)
    }

    /// Changes the grid resolution, resetting every cell to `Unexplored`.
    pub fn resize(&mut self, resolution: u32) -> Result<(), FogError> {
        self.grid.resize(resolution)
    }

    pub fn set_world_bounds(&mut self, world_size: f32, world_center: WorldPoint) -> Result<(), FogError> {
        self.grid.set_world_bounds(world_size, world_center)
    }

    /// Runs one update: age every visible cell, rasterize each revealer, and
    /// publish the grid to `sink` if anything changed.
    pub fn tick<P, S>(&mut self, positions: &P, sink: &mut S) -> TickReport
    where
        P: PositionSource<K> + ?Sized,
        S: GridSink + ?Sized,
    {
        self.tick += 1;

        let aged = self.grid.age_step();

        let mut revealed = 0;
        let mut revealers = 0;
        for revealer in self.registry.active(positions) {
            if !revealer.position.is_finite() {
                continue;
            }
            revealed += reveal_disk(&mut self.grid, revealer.position, revealer.radius);
            revealers += 1;
        }
        let skipped = self.registry.len() - revealers;

        let published = self.grid.is_dirty();
        if published {
            self.publish(sink);
        }

        let report = TickReport {
            tick: self.tick,
            aged,
            revealed,
            revealers,
            skipped,
            published,
        };
        trace!(
            tick = report.tick,
            aged,
            revealed,
            revealers,
            skipped,
            published,
            "fog tick"
        );
        report
    }

    /// Hands the current grid to `sink` regardless of the dirty flag, then
    /// clears it. Used for the initial upload.
    pub fn publish<S: GridSink + ?Sized>(&mut self, sink: &mut S) {
        sink.publish(&GridFrame {
            tick: self.tick,
            mapping: self.grid.mapping().params(),
            cells: self.grid.cells(),
        });
        self.grid.clear_dirty();
    }

    /// Drops every revealer. The grid keeps its last state.
    pub fn shutdown(&mut self) {
        debug!(
            ticks = self.tick,
            revealers = self.registry.len(),
            "fog of war shut down"
        );
        self.registry.clear();
    }
}

/// Marks the cell containing `position` and every cell whose centre lies
/// within the vision radius. Returns the number of newly visible cells.
fn reveal_disk(grid: &mut VisibilityGrid, position: WorldPoint, radius: f32) -> usize {
    let mapping = *grid.mapping();

    let center = mapping.world_to_cell(position);
    let mut revealed = usize::from(grid.mark_visible(center.x, center.y));

    let r = mapping.radius_in_cells(radius);
    if r == 0 {
        return revealed;
    }

    let (gx, gy) = mapping.world_to_grid(position);
    let r = r as f32;
    let r_sq = r * r;

    // Clip the bounding box to the grid; mark_visible still checks bounds.
    let last = mapping.resolution() as i64 - 1;
    let min_x = ((gx - r).floor() as i64).max(0);
    let max_x = ((gx + r).floor() as i64).min(last);
    let min_y = ((gy - r).floor() as i64).max(0);
    let max_y = ((gy + r).floor() as i64).min(last);

    for y in min_y..=max_y {
        let dy = y as f32 + 0.5 - gy;
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - gx;
            if dx * dx + dy * dy <= r_sq {
                revealed += usize::from(grid.mark_visible(x as i32, y as i32));
            }
        }
    }

    revealed
}
