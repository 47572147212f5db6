// src/ui/hud.rs

use crate::resources::{SimulationControl, SpeedHistory};
use crate::session::SimulationSession;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use egui_plot::{Line, Plot, PlotPoints};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, hud_egui_system);
    }
}

const HELP_LINES: [&str; 5] = [
    "Scroll: spin electrons faster / reverse",
    "Drag: orbit camera",
    "Space: pause, Right: step",
    "T: periodic table",
    "Esc: clear element",
];

fn hud_egui_system(
    mut contexts: EguiContexts,
    session: Res<SimulationSession>,
    control: Res<SimulationControl>,
    history: Res<SpeedHistory>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    // --- Bottom-right: speed and session counters ---
    egui::Area::new(egui::Id::new("hud_speed_area"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
        .show(ctx, |ui| {
            let frame = egui::Frame::popup(ui.style()).fill(egui::Color32::from_black_alpha(128));
            frame.show(ui, |ui| {
                ui.set_width(240.0);
                ui.label(egui::RichText::new("Simulation").font(egui::FontId::proportional(16.0)));
                ui.separator();

                let Some(simulation) = session.active() else {
                    ui.label("No element selected");
                    return;
                };

                let speed = simulation.speed();
                let settling = if speed.decay_pending() { ", settling" } else { "" };
                ui.label(format!(
                    "Speed: {:+.2} (base {:.2}{})",
                    speed.current_speed(),
                    speed.base_speed(),
                    settling
                ));
                let clock = simulation.clock();
                let state = if clock.is_paused() { "paused" } else { "running" };
                ui.label(format!("Session Time: {:.2} s ({})", clock.elapsed_secs(), state));
                ui.label(format!("Frames: {}", clock.frame()));
                ui.label(format!(
                    "Nucleons: {}  Electrons: {}",
                    simulation.nucleus().len(),
                    simulation.orbitals().electron_count()
                ));

                let points = PlotPoints::from_iter(history.samples.iter().map(|(t, s)| [*t, *s]));
                Plot::new("speed_plot")
                    .height(80.0)
                    .show_axes([false, true])
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("speed", points));
                    });
            });
        });

    // --- Bottom-left: controls ---
    egui::Area::new(egui::Id::new("hud_help_area"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
        .show(ctx, |ui| {
            for line in HELP_LINES {
                ui.label(
                    egui::RichText::new(line)
                        .small()
                        .color(egui::Color32::from_white_alpha(160)),
                );
            }
        });

    if control.paused {
        egui::Area::new(egui::Id::new("hud_paused_text"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -100.0))
            .show(ctx, |ui| {
                let text = egui::RichText::new("PAUSED")
                    .font(egui::FontId::proportional(48.0))
                    .color(egui::Color32::from_white_alpha(180))
                    .strong();
                ui.label(text);
            });
    }
}
