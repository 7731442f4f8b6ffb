//! Core simulation: building generation, physics bodies, the earthquake
//! excitation controller, pause control, and deterministic RNG.
//!
//! Rendering and UI sit in their own crates and talk to this one through
//! resources, events, and the components spawned here.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod generator;
pub mod pause;
pub mod quake;
pub mod sets;
pub mod sim_rng;
pub mod structure;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub use sets::SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .configure_sets(
                Update,
                (SimulationSet::Input, SimulationSet::StateUpdate).chain(),
            )
            .add_plugins((
                sim_rng::SimRngPlugin,
                audio::AudioSettingsPlugin,
                structure::StructurePlugin,
                quake::QuakePlugin,
                pause::PausePlugin,
            ));
    }
}
