//! Headless host for the fog of war.
//!
//! Loads a scenario, spawns revealers into a `bevy_ecs` world, and runs the
//! fog one tick at a time, writing every published frame to disk.
//!
//! # Modules
//!
//! - [`scenario`]: TOML scenario description
//! - [`orbit`]: circular revealer motion and the simulation clock
//! - [`runner`]: world setup and the tick loop
//! - [`output`]: JSON Lines frame files and text previews

pub mod error;
pub mod orbit;
pub mod output;
pub mod runner;
pub mod scenario;

pub use error::SimError;
pub use orbit::{Orbit, SimClock};
pub use output::{read_frames, render_ascii, FrameWriter};
pub use runner::{RunSummary, SimRunner, StepOutput};
pub use scenario::{default_scenario_toml, RandomSection, RevealerSpec, ScenarioConfig, SimulationSection};
