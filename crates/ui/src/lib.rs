use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod quake_panel;
pub mod toolbar;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<quake_panel::QuakeControls>()
            .add_systems(Update, (toolbar::toolbar_ui, quake_panel::quake_panel_ui));
    }
}
