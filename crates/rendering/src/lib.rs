use bevy::prelude::*;

pub mod audio_playback;
pub mod camera;
pub mod drag;
pub mod egui_input_guard;
pub mod structure_render;

use camera::{CameraOrbitDrag, CameraPanDrag};
use drag::DragState;
use simulation::SimulationSet;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraPanDrag>()
            .init_resource::<CameraOrbitDrag>()
            .init_resource::<DragState>()
            .init_resource::<structure_render::MaterialLibrary>()
            .add_plugins(audio_playback::AudioPlaybackPlugin)
            .add_systems(Startup, (camera::setup_camera, setup_lighting))
            .add_systems(
                Update,
                (
                    camera::camera_pan_keyboard,
                    camera::camera_pan_drag,
                    camera::camera_orbit_drag,
                    camera::camera_zoom,
                    camera::apply_orbit_camera,
                ),
            )
            .add_systems(
                Update,
                (
                    drag::drop_stale_session,
                    drag::begin_drag,
                    drag::update_drag,
                    drag::end_drag,
                )
                    .chain()
                    .in_set(SimulationSet::Input),
            )
            .add_systems(
                Update,
                (
                    structure_render::attach_body_visuals,
                    structure_render::attach_platform_visual,
                    drag::draw_drag_line,
                ),
            );
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 50.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
