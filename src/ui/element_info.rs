// src/ui/element_info.rs

use crate::catalog::ElementCatalog;
use crate::config::UNCATEGORIZED_RGB;
use crate::session::SimulationSession;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

pub struct ElementInfoPlugin;

impl Plugin for ElementInfoPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, element_info_egui_system);
    }
}

/// Card for the element on screen. Hidden when nothing is selected.
fn element_info_egui_system(
    mut contexts: EguiContexts,
    session: Res<SimulationSession>,
    catalog: Res<ElementCatalog>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Some(element) = session.element().and_then(|n| catalog.get(n)) else {
        return;
    };

    let [r, g, b] = element.category.map_or(UNCATEGORIZED_RGB, |c| c.rgb());
    let accent = egui::Color32::from_rgb(r, g, b);

    egui::Area::new(egui::Id::new("element_info_area"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .show(ctx, |ui| {
            let frame = egui::Frame::popup(ui.style()).fill(egui::Color32::from_black_alpha(128));
            frame.show(ui, |ui| {
                ui.set_width(200.0);
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&element.symbol)
                            .font(egui::FontId::proportional(36.0))
                            .color(accent)
                            .strong(),
                    );
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(&element.name).font(egui::FontId::proportional(18.0)));
                        ui.label(format!("Atomic number {}", element.atomic_number));
                        if let Some(category) = element.category {
                            ui.label(egui::RichText::new(category.label()).color(accent));
                        }
                    });
                });
                ui.separator();
                ui.label(format!("Protons: {}", element.protons));
                ui.label(format!("Neutrons: {}", element.neutrons));
                ui.label(format!("Electrons: {}", element.electron_count()));
                ui.label(format!("Shells: {}", element.electron_shells.len()));
            });
        });
}
