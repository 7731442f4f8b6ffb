//! Body spawning and the rebuild lifecycle.
//!
//! Placements from the generator are consumed exactly once to spawn rapier
//! rigid bodies; after that, bodies are only addressed through their
//! `Entity` handles. A rebuild replaces the structure wholesale: there is
//! no incremental editing.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::{PLATFORM_REST_Y, PLATFORM_SIZE, PLATFORM_THICKNESS};
use crate::generator::{generate, BodyPlacement, BuildingSpec};
use crate::quake::QuakeState;
use crate::sets::SimulationSet;

// =============================================================================
// Components and events
// =============================================================================

/// A rigid body belonging to the current structure. Rendering attaches the
/// visual mesh (and ornament children) when it sees this component appear.
#[derive(Component)]
pub struct StructureBody {
    pub placement: BodyPlacement,
}

/// Bodies the drag controller may grab.
#[derive(Component)]
pub struct Draggable;

/// The kinematic ground platform. The excitation controller is the only
/// system that moves it; `rest` is the pose every teardown returns it to.
#[derive(Component)]
pub struct GroundPlatform {
    pub rest: Vec3,
}

/// Tear down the current structure and spawn the current [`BuildingSpec`].
/// Also cancels any active quake and ends any drag (the drag controller
/// notices the stale handle on its own).
#[derive(Event, Debug, Default)]
pub struct RebuildEvent;

// =============================================================================
// Spawning
// =============================================================================

fn spawn_body(commands: &mut Commands, placement: &BodyPlacement) {
    let half = placement.extents / 2.0;
    let mut entity = commands.spawn((
        StructureBody {
            placement: placement.clone(),
        },
        Draggable,
        Collider::cuboid(half.x, half.y, half.z),
        Damping {
            linear_damping: placement.linear_damping,
            angular_damping: placement.angular_damping,
        },
        Transform::from_translation(placement.position),
    ));
    // Mass 0 marks a static body; rapier rejects zero-mass dynamics.
    if placement.mass > 0.0 {
        entity.insert((
            RigidBody::Dynamic,
            ColliderMassProperties::Mass(placement.mass),
        ));
    } else {
        entity.insert(RigidBody::Fixed);
    }
}

fn spawn_structure(commands: &mut Commands, spec: &BuildingSpec) {
    let placements = generate(spec);
    info!(
        "building {:?} with {} stories: {} bodies",
        spec.kind,
        spec.stories,
        placements.len()
    );
    for placement in &placements {
        spawn_body(commands, placement);
    }
}

/// Startup: the ground platform plus the initial structure.
pub fn init_scene(mut commands: Commands, spec: Res<BuildingSpec>) {
    let rest = Vec3::new(0.0, PLATFORM_REST_Y, 0.0);
    commands.spawn((
        GroundPlatform { rest },
        RigidBody::KinematicPositionBased,
        Collider::cuboid(
            PLATFORM_SIZE / 2.0,
            PLATFORM_THICKNESS / 2.0,
            PLATFORM_SIZE / 2.0,
        ),
        Transform::from_translation(rest),
    ));
    spawn_structure(&mut commands, &spec);
}

/// Handles [`RebuildEvent`]: despawn everything (ornament children go with
/// their parents), force the platform back to rest, cancel the quake, and
/// spawn the new spec.
pub fn handle_rebuild(
    mut commands: Commands,
    mut events: EventReader<RebuildEvent>,
    spec: Res<BuildingSpec>,
    bodies: Query<Entity, With<StructureBody>>,
    mut platform: Query<(&mut Transform, &GroundPlatform)>,
    mut quake: ResMut<QuakeState>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    for entity in &bodies {
        commands.entity(entity).despawn_recursive();
    }
    if let Ok((mut transform, ground)) = platform.get_single_mut() {
        transform.translation = ground.rest;
    }
    quake.cancel();
    spawn_structure(&mut commands, &spec);
}

pub struct StructurePlugin;

impl Plugin for StructurePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildingSpec>()
            .add_event::<RebuildEvent>()
            .add_systems(Startup, init_scene)
            .add_systems(
                Update,
                handle_rebuild.in_set(SimulationSet::StateUpdate),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rebuild_app() -> App {
        let mut app = App::new();
        app.add_event::<RebuildEvent>()
            .init_resource::<BuildingSpec>()
            .init_resource::<QuakeState>()
            .add_systems(Update, handle_rebuild);
        app.world_mut().spawn((
            GroundPlatform {
                rest: Vec3::new(0.0, PLATFORM_REST_Y, 0.0),
            },
            // Displaced, as if mid-quake.
            Transform::from_xyz(0.4, PLATFORM_REST_Y + 0.1, -0.3),
        ));
        app
    }

    #[test]
    fn test_rebuild_replaces_structure_and_resets_world() {
        let mut app = rebuild_app();

        let placement = generate(&BuildingSpec::default())[0].clone();
        let old = app
            .world_mut()
            .spawn(StructureBody { placement })
            .id();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        app.world_mut()
            .resource_mut::<QuakeState>()
            .trigger(Duration::from_secs(10), 1.0, &mut rng);

        app.world_mut().send_event(RebuildEvent);
        app.update();

        assert!(!app.world().resource::<QuakeState>().is_active());
        assert!(app.world().get::<StructureBody>(old).is_none());

        let mut platforms = app
            .world_mut()
            .query::<(&Transform, &GroundPlatform)>();
        let (transform, ground) = platforms.single(app.world());
        assert_eq!(transform.translation, ground.rest);

        let mut bodies = app.world_mut().query::<&StructureBody>();
        let expected = generate(&BuildingSpec::default()).len();
        assert_eq!(bodies.iter(app.world()).count(), expected);
    }

    #[test]
    fn test_rebuild_without_event_is_inert() {
        let mut app = rebuild_app();
        let placement = generate(&BuildingSpec::default())[0].clone();
        let body = app
            .world_mut()
            .spawn(StructureBody { placement })
            .id();

        app.update();

        assert!(app.world().get::<StructureBody>(body).is_some());
        let mut bodies = app.world_mut().query::<&StructureBody>();
        assert_eq!(bodies.iter(app.world()).count(), 1);
    }
}
