//! ECS Integration
//!
//! Runs the fog of war inside a `bevy_ecs` world. Entities grant vision by
//! carrying a [`Revealer`] and a [`WorldPosition`]; inserting or removing the
//! `Revealer` component is the activation event that registers or
//! unregisters them.

use bevy_ecs::prelude::*;

use crate::error::FogError;
use crate::fog::{FogOfWar, GridSettings, TickReport};
use crate::frame::FrameRecorder;
use crate::mapping::WorldPoint;

/// Component: grants vision around the entity's position
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Revealer {
    pub radius: f32,
}

impl Revealer {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

/// Component: the entity's position on the fog plane
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPosition(pub WorldPoint);

/// Resource holding the fog of war, keyed by entity
#[derive(Resource, Debug)]
pub struct FogOfWarResource(pub FogOfWar<Entity>);

/// Resource receiving every frame the fog publishes
#[derive(Resource, Debug, Default)]
pub struct PublishedFrames(pub FrameRecorder);

/// Resource holding the report of the most recent tick
#[derive(Resource, Debug, Default)]
pub struct LastTickReport(pub TickReport);

/// System set containing the fog systems, in update order
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FogUpdate;

/// Inserts the fog resources into `world`.
pub fn insert_fog_resources(
    world: &mut World,
    settings: &GridSettings,
    frames: FrameRecorder,
) -> Result<(), FogError> {
    world.insert_resource(FogOfWarResource(FogOfWar::init(settings)?));
    world.insert_resource(PublishedFrames(frames));
    world.insert_resource(LastTickReport::default());
    Ok(())
}

/// Adds the fog systems to `schedule` inside [`FogUpdate`].
pub fn add_fog_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (sync_revealer_registry, update_fog)
            .chain()
            .in_set(FogUpdate),
    );
}

/// A schedule containing only the fog systems.
pub fn fog_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    add_fog_systems(&mut schedule);
    schedule
}

/// System to mirror `Revealer` components into the registry.
/// Removals are applied before additions so a component re-inserted in the
/// same frame stays registered. A newly added component is only registered,
/// not also retuned.
pub fn sync_revealer_registry(
    mut fog: ResMut<FogOfWarResource>,
    mut removed: RemovedComponents<Revealer>,
    changed: Query<(Entity, Ref<Revealer>), Changed<Revealer>>,
) {
    for entity in removed.read() {
        fog.0.unregister(&entity);
    }

    for (entity, revealer) in changed.iter() {
        if revealer.is_added() {
            fog.0.register(entity, revealer.radius);
        } else {
            fog.0.set_radius(&entity, revealer.radius);
        }
    }
}

/// System to run one fog tick using the current entity positions.
pub fn update_fog(
    mut fog: ResMut<FogOfWarResource>,
    mut frames: ResMut<PublishedFrames>,
    mut last: ResMut<LastTickReport>,
    positions: Query<&WorldPosition>,
) {
    let lookup = |entity: &Entity| positions.get(*entity).ok().map(|p| p.0);
    last.0 = fog.0.tick(&lookup, &mut frames.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;
    use bevy_ecs::schedule::ExecutorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn setup() -> (World, Schedule) {
        let mut world = World::new();
        insert_fog_resources(
            &mut world,
            &GridSettings::new(4, 4.0, WorldPoint::ORIGIN),
            FrameRecorder::new(),
        )
        .unwrap();
        (world, fog_schedule())
    }

    fn fog(world: &World) -> &FogOfWar<Entity> {
        &world.resource::<FogOfWarResource>().0
    }

    #[test]
    fn test_insert_rejects_invalid_settings() {
        let mut world = World::new();
        let result = insert_fog_resources(
            &mut world,
            &GridSettings::new(0, 4.0, WorldPoint::ORIGIN),
            FrameRecorder::new(),
        );

        assert_eq!(result, Err(FogError::InvalidResolution(0)));
        assert!(world.get_resource::<FogOfWarResource>().is_none());
    }

    #[test]
    fn test_spawned_revealer_reveals() {
        let (mut world, mut schedule) = setup();
        let scout = world
            .spawn((Revealer::new(1.0), WorldPosition(WorldPoint::ORIGIN)))
            .id();

        schedule.run(&mut world);

        assert!(fog(&world).registry().contains(&scout));
        assert_eq!(fog(&world).grid().count(CellState::Visible), 4);
        assert_eq!(world.resource::<PublishedFrames>().0.total_published(), 1);
        assert_eq!(world.resource::<LastTickReport>().0.revealers, 1);
    }

    #[test]
    fn test_removing_revealer_unregisters() {
        let (mut world, mut schedule) = setup();
        let scout = world
            .spawn((Revealer::new(1.0), WorldPosition(WorldPoint::ORIGIN)))
            .id();
        schedule.run(&mut world);

        world.entity_mut(scout).remove::<Revealer>();
        schedule.run(&mut world);

        assert!(fog(&world).registry().is_empty());
        assert_eq!(fog(&world).grid().count(CellState::Visible), 0);
        assert_eq!(fog(&world).grid().count(CellState::Explored), 4);
    }

    #[test]
    fn test_despawned_revealer_unregisters() {
        let (mut world, mut schedule) = setup();
        let scout = world
            .spawn((Revealer::new(1.0), WorldPosition(WorldPoint::ORIGIN)))
            .id();
        schedule.run(&mut world);

        world.despawn(scout);
        schedule.run(&mut world);

        assert!(fog(&world).registry().is_empty());
    }

    #[test]
    fn test_revealer_without_position_is_skipped() {
        let (mut world, mut schedule) = setup();
        let blind = world.spawn(Revealer::new(1.0)).id();

        schedule.run(&mut world);

        assert!(fog(&world).registry().contains(&blind));
        assert_eq!(world.resource::<LastTickReport>().0.skipped, 1);
        assert_eq!(fog(&world).grid().count(CellState::Unexplored), 16);
    }

    #[test]
    fn test_radius_change_is_applied() {
        let (mut world, mut schedule) = setup();
        let scout = world
            .spawn((Revealer::new(0.0), WorldPosition(WorldPoint::new(0.5, 0.5))))
            .id();
        schedule.run(&mut world);
        assert_eq!(fog(&world).grid().count(CellState::Visible), 1);

        world.get_mut::<Revealer>(scout).unwrap().radius = 4.0;
        schedule.run(&mut world);

        assert_eq!(fog(&world).registry().radius(&scout), Some(4.0));
        assert_eq!(fog(&world).grid().count(CellState::Visible), 16);
    }

    /// Counts `WARN` events emitted while it is the thread's subscriber.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_added_revealer_is_only_registered_once() {
        let (mut world, mut schedule) = setup();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        let scout = world
            .spawn((Revealer::new(-1.0), WorldPosition(WorldPoint::ORIGIN)))
            .id();

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        tracing::subscriber::with_default(subscriber, || schedule.run(&mut world));

        // One clamp warning from registration, none from a redundant retune
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
        assert_eq!(fog(&world).registry().radius(&scout), Some(0.0));
    }

    #[test]
    fn test_moving_revealer_leaves_explored_trail() {
        let (mut world, mut schedule) = setup();
        let scout = world
            .spawn((Revealer::new(0.0), WorldPosition(WorldPoint::new(-1.5, -1.5))))
            .id();
        schedule.run(&mut world);

        world.get_mut::<WorldPosition>(scout).unwrap().0 = WorldPoint::new(1.5, 1.5);
        schedule.run(&mut world);

        let grid = fog(&world).grid();
        assert_eq!(grid.get(0, 0), Some(CellState::Explored));
        assert_eq!(grid.get(3, 3), Some(CellState::Visible));
    }
}
