//! Scenario Runner
//!
//! Owns the ECS world for a scenario and drives it one tick at a time:
//! apply activation changes, move orbiters, update the fog, collect frames.

use std::f32::consts::TAU;

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use fog_core::ecs::{
    add_fog_systems, insert_fog_resources, FogOfWarResource, FogUpdate, LastTickReport,
    PublishedFrames, Revealer, WorldPosition,
};
use fog_core::{CellState, FrameRecorder, RecordedFrame, TickReport, WorldPoint};

use crate::error::SimError;
use crate::orbit::{advance_orbits, Orbit, SimClock};
use crate::scenario::{RevealerSpec, ScenarioConfig};

/// Component: display name of a scenario revealer
#[derive(Component, Debug, Clone)]
pub struct RevealerName(pub String);

/// A revealer entity and the window during which it grants vision.
#[derive(Debug)]
struct ScheduledRevealer {
    entity: Entity,
    spec: RevealerSpec,
    active: bool,
}

/// Result of a single [`SimRunner::step`].
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub report: TickReport,
    /// Frames published since the previous step
    pub frames: Vec<RecordedFrame>,
}

/// Totals after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames_published: u64,
    pub visible: usize,
    pub explored: usize,
    pub unexplored: usize,
}

pub struct SimRunner {
    world: World,
    schedule: Schedule,
    revealers: Vec<ScheduledRevealer>,
}

impl SimRunner {
    pub fn new(scenario: &ScenarioConfig) -> Result<Self, SimError> {
        scenario.validate()?;

        let mut world = World::new();
        insert_fog_resources(&mut world, &scenario.grid, FrameRecorder::new())?;
        world.insert_resource(SimClock::new(scenario.simulation.dt));

        let mut schedule = Schedule::default();
        schedule.add_systems(advance_orbits.before(FogUpdate));
        add_fog_systems(&mut schedule);

        let mut specs = scenario.revealers.clone();
        specs.extend(random_revealers(scenario));

        let revealers = specs
            .into_iter()
            .map(|spec| {
                let position = spec
                    .orbit
                    .map_or(spec.position, |orbit| orbit.position_at(0.0));
                let mut entity = world.spawn((
                    RevealerName(spec.name.clone()),
                    WorldPosition(position),
                ));
                if let Some(orbit) = spec.orbit {
                    entity.insert(orbit);
                }
                ScheduledRevealer {
                    entity: entity.id(),
                    spec,
                    active: false,
                }
            })
            .collect::<Vec<_>>();

        // Initial upload of the all-unexplored grid
        world.resource_scope(|world, mut fog: Mut<FogOfWarResource>| {
            let mut frames = world.resource_mut::<PublishedFrames>();
            fog.0.publish(&mut frames.0);
        });

        info!(
            resolution = scenario.grid.resolution,
            world_size = scenario.grid.world_size,
            revealers = revealers.len(),
            "scenario loaded"
        );

        Ok(Self {
            world,
            schedule,
            revealers,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<SimClock>().tick
    }

    /// Advances the scenario by one tick.
    pub fn step(&mut self) -> StepOutput {
        let tick = self.current_tick();
        self.apply_activation(tick);

        self.schedule.run(&mut self.world);
        self.world.clear_trackers();

        self.world.resource_mut::<SimClock>().tick += 1;

        let report = self.world.resource::<LastTickReport>().0;
        let frames = self.world.resource_mut::<PublishedFrames>().0.drain();
        StepOutput { report, frames }
    }

    /// Runs `ticks` steps, passing each one to `on_step`, then shuts the fog
    /// down.
    pub fn run<F>(&mut self, ticks: u64, mut on_step: F) -> Result<RunSummary, SimError>
    where
        F: FnMut(&StepOutput) -> Result<(), SimError>,
    {
        for _ in 0..ticks {
            let output = self.step();
            on_step(&output)?;
        }

        let summary = self.summary();
        self.world.resource_mut::<FogOfWarResource>().0.shutdown();
        info!(
            ticks = summary.ticks,
            frames = summary.frames_published,
            visible = summary.visible,
            explored = summary.explored,
            unexplored = summary.unexplored,
            "scenario finished"
        );
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        let grid = self.world.resource::<FogOfWarResource>().0.grid();
        RunSummary {
            ticks: self.current_tick(),
            frames_published: self.world.resource::<PublishedFrames>().0.total_published(),
            visible: grid.count(CellState::Visible),
            explored: grid.count(CellState::Explored),
            unexplored: grid.count(CellState::Unexplored),
        }
    }

    /// Inserts or removes `Revealer` components for revealers whose window
    /// opened or closed at `tick`.
    fn apply_activation(&mut self, tick: u64) {
        for scheduled in self.revealers.iter_mut() {
            let should_be_active = scheduled.spec.is_active_at(tick);
            if should_be_active == scheduled.active {
                continue;
            }

            let Some(mut entity) = self.world.get_entity_mut(scheduled.entity) else {
                continue;
            };
            if should_be_active {
                entity.insert(Revealer::new(scheduled.spec.radius));
                debug!(tick, name = %scheduled.spec.name, "revealer activated");
            } else {
                entity.remove::<Revealer>();
                debug!(tick, name = %scheduled.spec.name, "revealer deactivated");
            }
            scheduled.active = should_be_active;
        }
    }
}

/// Orbiting revealers placed from the scenario seed.
fn random_revealers(scenario: &ScenarioConfig) -> Vec<RevealerSpec> {
    let random = &scenario.random;
    let mut rng = SmallRng::seed_from_u64(scenario.simulation.seed);
    let half = scenario.grid.world_size * 0.4;
    let center = scenario.grid.world_center;

    (0..random.count)
        .map(|i| {
            let orbit = Orbit {
                center: WorldPoint::new(
                    center.x + rng.gen_range(-half..=half),
                    center.y + rng.gen_range(-half..=half),
                ),
                distance: rng.gen_range(0.0..=half * 0.5),
                angular_speed: rng.gen_range(-1.0..=1.0),
                phase: rng.gen_range(0.0..TAU),
            };
            RevealerSpec {
                name: format!("random-{}", i),
                radius: rng.gen_range(random.min_radius..=random.max_radius),
                position: orbit.position_at(0.0),
                orbit: Some(orbit),
                active_from: 0,
                active_until: None,
            }
        })
        .collect()
}
