//! Quake trigger panel: magnitude presets plus custom power/duration
//! sliders. Everything is disabled while a quake is running; the major
//! (two-phase) triggers additionally require the bank tower.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::generator::BuildingSpec;
use simulation::quake::{QuakeState, TriggerQuakeEvent, TWO_PHASE_THRESHOLD};

/// Slider state for the custom triggers.
#[derive(Resource)]
pub struct QuakeControls {
    pub power: f32,
    pub duration_s: f32,
    pub major_power: f32,
    pub major_duration_s: f32,
}

impl Default for QuakeControls {
    fn default() -> Self {
        Self {
            power: 0.8,
            duration_s: 12.0,
            major_power: 1.5,
            major_duration_s: 30.0,
        }
    }
}

pub fn quake_panel_ui(
    mut contexts: EguiContexts,
    mut controls: ResMut<QuakeControls>,
    spec: Res<BuildingSpec>,
    quake: Res<QuakeState>,
    mut triggers: EventWriter<TriggerQuakeEvent>,
) {
    egui::SidePanel::right("quake_panel")
        .default_width(230.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Earthquake");
            ui.add_space(6.0);

            ui.add_enabled_ui(!quake.is_active(), |ui| {
                if ui.button("Magnitude 6.5  (10 s)").clicked() {
                    triggers.send(TriggerQuakeEvent {
                        duration_ms: 10_000,
                        power: 1.0,
                    });
                }

                let bank = spec.kind.supports_major_quake();
                let major = ui.add_enabled(bank, egui::Button::new("Magnitude 8.0  (30 s)"));
                if major.clicked() {
                    triggers.send(TriggerQuakeEvent {
                        duration_ms: 30_000,
                        power: 1.4,
                    });
                }
                if !bank {
                    ui.weak("major quakes need the bank tower");
                }

                ui.separator();
                ui.label("Custom");
                ui.add(egui::Slider::new(&mut controls.power, 0.2..=1.3).text("power"));
                ui.add(
                    egui::Slider::new(&mut controls.duration_s, 5.0..=60.0).text("duration (s)"),
                );
                if ui.button("Trigger").clicked() {
                    triggers.send(TriggerQuakeEvent {
                        duration_ms: (controls.duration_s * 1000.0) as u32,
                        power: controls.power,
                    });
                }

                ui.separator();
                ui.label("Custom major (two-phase)");
                ui.add_enabled_ui(bank, |ui| {
                    ui.add(
                        egui::Slider::new(&mut controls.major_power, TWO_PHASE_THRESHOLD..=1.8)
                            .text("power"),
                    );
                    ui.add(
                        egui::Slider::new(&mut controls.major_duration_s, 10.0..=60.0)
                            .text("duration (s)"),
                    );
                    if ui.button("Trigger major").clicked() {
                        triggers.send(TriggerQuakeEvent {
                            duration_ms: (controls.major_duration_s * 1000.0) as u32,
                            power: controls.major_power,
                        });
                    }
                });
            });
        });
}
