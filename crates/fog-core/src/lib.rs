//! Fog-of-war visibility: a tri-state grid aged every tick and rasterized with
//! the vision disks of a dynamic set of revealers.
//!
//! The crate has no engine or rendering dependencies of its own. A host owns a
//! [`FogOfWar`] value, registers revealers as its entities become active, and
//! calls [`FogOfWar::tick`] once per frame. Whenever the grid changed, the tick
//! hands a [`GridFrame`] to a [`GridSink`] (a texture uploader, a recorder, a
//! network encoder).
//!
//! # Modules
//!
//! - [`mapping`]: world points, cell coordinates and the world→grid transform
//! - [`grid`]: the cell buffer, aging and revelation
//! - [`registry`]: revealer membership and live position lookup
//! - [`fog`]: the per-tick update and host lifecycle
//! - [`frame`]: what gets published to rendering consumers
//! - [`config`]: TOML configuration
//! - [`ecs`]: `bevy_ecs` components, resources and systems

pub mod config;
pub mod ecs;
pub mod error;
pub mod fog;
pub mod frame;
pub mod grid;
pub mod mapping;
pub mod registry;

pub use config::{default_config_toml, ConfigError, FogConfig};
pub use error::FogError;
pub use fog::{FogOfWar, GridSettings, TickReport};
pub use frame::{FrameRecorder, GridFrame, GridSink, RecordedFrame};
pub use grid::{CellState, VisibilityGrid};
pub use mapping::{CellCoord, Mapping, MappingParams, WorldPoint, MAX_RESOLUTION};
pub use registry::{ActiveRevealer, PositionSource, RevealerRegistry};
