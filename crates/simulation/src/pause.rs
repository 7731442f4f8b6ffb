//! Pause control and rapier pipeline sync.
//!
//! Pausing freezes the physics pipeline only. The quake clock, phase timers,
//! camera, and UI all keep running; when a quake is active during a pause
//! the platform keeps its scripted motion and the frozen bodies catch up on
//! resume. That asymmetry is intentional: it lets you freeze a collapse
//! mid-air and orbit around it.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::sets::SimulationSet;

#[derive(Resource, Default)]
pub struct SimControl {
    pub paused: bool,
}

/// Space toggles pause.
fn toggle_pause_key(keys: Res<ButtonInput<KeyCode>>, mut control: ResMut<SimControl>) {
    if keys.just_pressed(KeyCode::Space) {
        control.paused = !control.paused;
        info!("simulation {}", if control.paused { "paused" } else { "resumed" });
    }
}

/// Mirrors [`SimControl::paused`] into the rapier pipeline flag.
fn sync_physics_pause(
    control: Res<SimControl>,
    mut configs: Query<&mut RapierConfiguration>,
) {
    if !control.is_changed() {
        return;
    }
    for mut config in &mut configs {
        config.physics_pipeline_active = !control.paused;
    }
}

pub struct PausePlugin;

impl Plugin for PausePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimControl>()
            .add_systems(Update, toggle_pause_key.in_set(SimulationSet::Input))
            .add_systems(
                Update,
                sync_physics_pause.in_set(SimulationSet::StateUpdate),
            );
    }
}
