//! Top toolbar: building selection, story count, rebuild, pause, mute.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::audio::AudioSettings;
use simulation::catalog::BuildingKind;
use simulation::generator::BuildingSpec;
use simulation::pause::SimControl;
use simulation::quake::QuakeState;
use simulation::structure::RebuildEvent;

pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut spec: ResMut<BuildingSpec>,
    mut control: ResMut<SimControl>,
    mut audio: ResMut<AudioSettings>,
    quake: Res<QuakeState>,
    mut rebuild: EventWriter<RebuildEvent>,
) {
    egui::TopBottomPanel::top("toolbar").show(contexts.ctx_mut(), |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 10.0;

            for kind in BuildingKind::ALL {
                if ui
                    .selectable_label(spec.kind == kind, kind.name())
                    .clicked()
                {
                    spec.kind = kind;
                }
            }

            ui.separator();

            ui.label("Stories:");
            ui.add(egui::Slider::new(&mut spec.stories, 1..=12));

            if ui.button("Rebuild").clicked() {
                rebuild.send_default();
            }

            ui.separator();

            let pause_label = if control.paused { "Resume" } else { "Pause" };
            if ui.button(pause_label).clicked() {
                control.paused = !control.paused;
            }

            ui.checkbox(&mut audio.muted, "Mute");
            ui.add(
                egui::Slider::new(&mut audio.master_volume, 0.0..=1.0)
                    .show_value(false)
                    .text("Vol"),
            );

            ui.separator();

            if quake.is_active() {
                ui.colored_label(egui::Color32::from_rgb(230, 120, 60), "QUAKE IN PROGRESS");
            } else {
                ui.weak("ground at rest");
            }
        });
    });
}
