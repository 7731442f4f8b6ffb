//! Mouse drag controller: grab a body with the left button and pull it
//! around on a spherical joint.
//!
//! The grab works through a kinematic, collider-less cursor body joined to
//! the grabbed body at the exact picked point, so the pull acts through the
//! physics solver instead of teleporting the body. The cursor follows the
//! mouse ray at the pick depth; releasing the button removes the joint and
//! the cursor.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_rapier3d::prelude::*;

use simulation::structure::Draggable;

/// One live grab.
pub struct DragSession {
    /// Body being pulled.
    pub grabbed: Entity,
    /// Picked point in the grabbed body's local space. Joint anchor and
    /// gizmo endpoint both use it, so the line stays glued to the surface
    /// as the body tumbles.
    pub pivot: Vec3,
    /// Kinematic cursor body the joint hangs from.
    pub cursor: Entity,
    /// Distance along the pick ray; the cursor stays at this depth while
    /// the mouse moves.
    pub depth: f32,
}

#[derive(Resource, Default)]
pub struct DragState {
    pub session: Option<DragSession>,
}

/// Marker for the cursor body so stale ones can be swept up.
#[derive(Component)]
pub struct DragCursor;

fn cursor_ray(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Ray3d> {
    let pos = window.cursor_position()?;
    camera.viewport_to_world(camera_transform, pos).ok()
}

/// Left press over the world: ray-cast into the scene and, if a draggable
/// body is hit, start a grab session.
pub fn begin_drag(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    rapier: ReadDefaultRapierContext,
    draggable: Query<&Transform, With<Draggable>>,
    mut state: ResMut<DragState>,
) {
    if !buttons.just_pressed(MouseButton::Left) || state.session.is_some() {
        return;
    }
    if crate::egui_input_guard::egui_wants_pointer(&mut contexts) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(ray) = cursor_ray(window, camera, camera_transform) else {
        return;
    };

    let Some((entity, depth)) =
        rapier.cast_ray(ray.origin, *ray.direction, f32::MAX, true, QueryFilter::default())
    else {
        return;
    };
    // The platform and any non-draggable hit end the pick without a session.
    let Ok(grabbed_transform) = draggable.get(entity) else {
        return;
    };

    let hit_point = ray.origin + *ray.direction * depth;
    let pivot = grabbed_transform
        .compute_affine()
        .inverse()
        .transform_point3(hit_point);

    let cursor = commands
        .spawn((
            DragCursor,
            RigidBody::KinematicPositionBased,
            Transform::from_translation(hit_point),
        ))
        .id();
    let joint = SphericalJointBuilder::new()
        .local_anchor1(Vec3::ZERO)
        .local_anchor2(pivot);
    commands.entity(entity).insert(ImpulseJoint::new(cursor, joint));

    state.session = Some(DragSession {
        grabbed: entity,
        pivot,
        cursor,
        depth,
    });
    debug!("grabbed {:?} at depth {:.2}", entity, depth);
}

/// While a session is live, keep the cursor body on the mouse ray at the
/// original pick depth.
pub fn update_drag(
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    state: Res<DragState>,
    mut cursors: Query<&mut Transform, With<DragCursor>>,
) {
    let Some(session) = state.session.as_ref() else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(ray) = cursor_ray(window, camera, camera_transform) else {
        return;
    };
    if let Ok(mut transform) = cursors.get_mut(session.cursor) {
        transform.translation = ray.origin + *ray.direction * session.depth;
    }
}

/// Release ends the session wherever the pointer is, egui included.
pub fn end_drag(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    mut state: ResMut<DragState>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    let Some(session) = state.session.take() else {
        return;
    };
    if let Some(mut grabbed) = commands.get_entity(session.grabbed) {
        grabbed.remove::<ImpulseJoint>();
    }
    if let Some(mut cursor) = commands.get_entity(session.cursor) {
        cursor.despawn();
    }
}

/// A rebuild despawns the grabbed body out from under the session; drop the
/// session and sweep the orphaned cursor when that happens.
pub fn drop_stale_session(
    mut commands: Commands,
    mut state: ResMut<DragState>,
    bodies: Query<(), With<Draggable>>,
) {
    let stale = state
        .session
        .as_ref()
        .is_some_and(|session| bodies.get(session.grabbed).is_err());
    if !stale {
        return;
    }
    if let Some(session) = state.session.take() {
        if let Some(mut cursor) = commands.get_entity(session.cursor) {
            cursor.despawn();
        }
    }
}

/// Visual tether from the cursor point to the grabbed surface point.
pub fn draw_drag_line(
    state: Res<DragState>,
    cursors: Query<&Transform, With<DragCursor>>,
    bodies: Query<&GlobalTransform, With<Draggable>>,
    mut gizmos: Gizmos,
) {
    let Some(session) = state.session.as_ref() else {
        return;
    };
    let (Ok(cursor), Ok(grabbed)) = (cursors.get(session.cursor), bodies.get(session.grabbed))
    else {
        return;
    };
    let anchor = grabbed.transform_point(session.pivot);
    gizmos.line(cursor.translation, anchor, Color::srgb(1.0, 0.85, 0.2));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_roundtrips_through_body_transform() {
        let body = Transform::from_translation(Vec3::new(3.0, 2.0, -1.0))
            .with_rotation(Quat::from_rotation_y(0.7));
        let hit = Vec3::new(3.4, 2.5, -0.8);

        let pivot = body.compute_affine().inverse().transform_point3(hit);
        let back = body.compute_affine().transform_point3(pivot);

        assert!((back - hit).length() < 1e-5, "{:?} vs {:?}", back, hit);
    }
}
