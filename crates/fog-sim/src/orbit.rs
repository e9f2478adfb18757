//! Orbital Motion
//!
//! Moves entities on circular paths around a fixed point so revealers sweep
//! across the fog.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use fog_core::ecs::WorldPosition;
use fog_core::WorldPoint;

/// Resource: simulation time
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    pub tick: u64,
    /// Simulated seconds per tick
    pub dt: f32,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self { tick: 0, dt }
    }

    /// Simulated seconds since tick 0.
    pub fn elapsed(&self) -> f32 {
        self.tick as f32 * self.dt
    }
}

/// Component: circular path around `center`
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub center: WorldPoint,
    pub distance: f32,
    /// Radians per simulated second; negative turns clockwise
    pub angular_speed: f32,
    /// Angle at time zero, in radians
    #[serde(default)]
    pub phase: f32,
}

impl Orbit {
    pub fn position_at(&self, elapsed: f32) -> WorldPoint {
        let angle = self.phase + self.angular_speed * elapsed;
        WorldPoint::new(
            self.center.x + self.distance * angle.cos(),
            self.center.y + self.distance * angle.sin(),
        )
    }
}

/// System to place every orbiting entity for the current tick
pub fn advance_orbits(clock: Res<SimClock>, mut query: Query<(&Orbit, &mut WorldPosition)>) {
    let elapsed = clock.elapsed();
    for (orbit, mut position) in query.iter_mut() {
        position.0 = orbit.position_at(elapsed);
    }
}
