//! Scenario Configuration
//!
//! A scenario describes the grid, how long to run, and which revealers exist.
//! Loaded from TOML; every section is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use fog_core::{GridSettings, WorldPoint};

use crate::error::SimError;
use crate::orbit::Orbit;

/// Top-level scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub revealers: Vec<RevealerSpec>,
    #[serde(default)]
    pub random: RandomSection,
}

/// Run length and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Number of ticks to run
    pub ticks: u64,
    /// Simulated seconds per tick
    pub dt: f32,
    /// Seed for randomly placed revealers
    pub seed: u64,
    /// Write every Nth published frame (1 = all)
    pub frame_interval: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 0.05,
            seed: 42,
            frame_interval: 1,
        }
    }
}

/// A hand-placed revealer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealerSpec {
    #[serde(default)]
    pub name: String,
    pub radius: f32,
    /// Starting position; ignored when `orbit` is set
    #[serde(default)]
    pub position: WorldPoint,
    #[serde(default)]
    pub orbit: Option<Orbit>,
    /// First tick on which the revealer grants vision
    #[serde(default)]
    pub active_from: u64,
    /// First tick on which it no longer does
    #[serde(default)]
    pub active_until: Option<u64>,
}

impl RevealerSpec {
    pub fn is_active_at(&self, tick: u64) -> bool {
        tick >= self.active_from && self.active_until.map_or(true, |until| tick < until)
    }
}

/// Randomly placed orbiting revealers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSection {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for RandomSection {
    fn default() -> Self {
        Self {
            count: 0,
            min_radius: 2.0,
            max_radius: 6.0,
        }
    }
}

impl ScenarioConfig {
    /// Loads a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses a scenario from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }

    /// Checks values the grid itself does not validate.
    pub fn validate(&self) -> Result<(), SimError> {
        self.grid.validate()?;

        if !self.simulation.dt.is_finite() || self.simulation.dt < 0.0 {
            return Err(SimError::InvalidScenario(format!(
                "dt must be finite and non-negative, got {}",
                self.simulation.dt
            )));
        }
        if self.simulation.frame_interval == 0 {
            return Err(SimError::InvalidScenario(
                "frame_interval must be at least 1".to_string(),
            ));
        }

        let random = &self.random;
        if random.count > 0
            && !(random.min_radius >= 0.0
                && random.min_radius <= random.max_radius
                && random.max_radius.is_finite())
        {
            return Err(SimError::InvalidScenario(format!(
                "random radius range {}..={} is invalid",
                random.min_radius, random.max_radius
            )));
        }

        for spec in &self.revealers {
            if let Some(until) = spec.active_until {
                if until < spec.active_from {
                    return Err(SimError::InvalidScenario(format!(
                        "revealer '{}' deactivates at tick {} before activating at {}",
                        spec.name, until, spec.active_from
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Generates the built-in demo scenario.
pub fn default_scenario_toml() -> String {
    r#"# Fog of War Scenario

[grid]
resolution = 48
world_size = 96.0
world_center = { x = 0.0, y = 0.0 }

[simulation]
ticks = 600
dt = 0.05
seed = 42
frame_interval = 10

[[revealers]]
name = "watchtower"
radius = 10.0
position = { x = -24.0, y = -24.0 }

[[revealers]]
name = "scout"
radius = 8.0
orbit = { center = { x = 0.0, y = 0.0 }, distance = 30.0, angular_speed = 0.4, phase = 0.0 }

[[revealers]]
name = "patrol"
radius = 6.0
orbit = { center = { x = 20.0, y = 20.0 }, distance = 12.0, angular_speed = -0.8, phase = 1.57 }
active_from = 100
active_until = 400

[random]
count = 2
min_radius = 3.0
max_radius = 6.0
"#
    .to_string()
}
