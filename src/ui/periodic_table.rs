// src/ui/periodic_table.rs

use super::UiState;
use crate::catalog::ElementCatalog;
use crate::config::{ElementCategory, ElementConfig, UNCATEGORIZED_RGB};
use crate::session::SimulationSession;
use crate::simulation::SelectElementEvent;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use std::collections::HashMap;

const ROWS: u32 = 9;
const COLUMNS: u32 = 18;
const CELL: egui::Vec2 = egui::vec2(34.0, 34.0);

pub struct PeriodicTablePlugin;

impl Plugin for PeriodicTablePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, periodic_table_egui_system);
    }
}

/// (row, column) of an element in the table, 1-based. Lanthanides from Ce
/// and actinides from Th sit on rows 8 and 9 starting at column 3.
pub fn grid_position(element: &ElementConfig) -> Option<(u32, u32)> {
    let n = element.atomic_number;
    match element.category {
        Some(ElementCategory::Lanthanide) if n != 57 && n >= 58 => Some((8, n - 58 + 3)),
        Some(ElementCategory::Actinide) if n != 89 && n >= 90 => Some((9, n - 90 + 3)),
        _ => Some((element.period?, element.group?)),
    }
}

fn category_color(category: Option<ElementCategory>) -> egui::Color32 {
    let [r, g, b] = category.map_or(UNCATEGORIZED_RGB, |c| c.rgb());
    egui::Color32::from_rgb(r, g, b)
}

fn periodic_table_egui_system(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    catalog: Res<ElementCatalog>,
    session: Res<SimulationSession>,
    mut select_writer: EventWriter<SelectElementEvent>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::Area::new(egui::Id::new("periodic_table_toggle"))
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 10.0))
        .show(ctx, |ui| {
            let arrow = if ui_state.table_open { "▲" } else { "▼" };
            if ui.button(format!("Periodic Table {}", arrow)).clicked() {
                ui_state.table_open = !ui_state.table_open;
            }
        });

    if !ui_state.table_open {
        return;
    }

    let current = session.element();
    let cells: HashMap<(u32, u32), &ElementConfig> = catalog
        .iter()
        .filter_map(|element| grid_position(element).map(|cell| (cell, element)))
        .collect();
    let mut picked = None;

    egui::Window::new("Periodic Table")
        .open(&mut ui_state.table_open)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 44.0))
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            if catalog.is_empty() {
                ui.label("Loading elements...");
                return;
            }
            egui::Grid::new("periodic_table_grid")
                .spacing([2.0, 2.0])
                .show(ui, |ui| {
                    for row in 1..=ROWS {
                        for column in 1..=COLUMNS {
                            let Some(element) = cells.get(&(row, column)) else {
                                ui.allocate_space(CELL);
                                continue;
                            };
                            let is_active = current == Some(element.atomic_number);
                            let mut button = egui::Button::new(
                                egui::RichText::new(&element.symbol)
                                    .color(egui::Color32::BLACK)
                                    .strong(),
                            )
                            .fill(category_color(element.category))
                            .min_size(CELL);
                            if is_active {
                                button = button.stroke(egui::Stroke::new(2.0, egui::Color32::WHITE));
                            }
                            let response = ui.add(button).on_hover_text(format!(
                                "#{} {}",
                                element.atomic_number, element.name
                            ));
                            if response.clicked() {
                                picked = Some(element.atomic_number);
                            }
                        }
                        ui.end_row();
                    }
                });
        });

    if let Some(atomic_number) = picked {
        // Picking the element already on screen clears the view.
        let request = if current == Some(atomic_number) {
            None
        } else {
            Some(atomic_number)
        };
        select_writer.write(SelectElementEvent(request));
        ui_state.table_open = false;
    }
}
