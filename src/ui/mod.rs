// src/ui/mod.rs

mod element_info;
mod hud;
mod periodic_table;

use crate::input::InputSet;
use bevy::prelude::*;
use bevy_egui::input::egui_wants_any_keyboard_input;

use element_info::ElementInfoPlugin;
use hud::HudPlugin;
use periodic_table::PeriodicTablePlugin;

/// Shared UI toggles.
#[derive(Resource, Default)]
pub struct UiState {
    pub table_open: bool,
}

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiState>()
            .add_plugins((HudPlugin, ElementInfoPlugin, PeriodicTablePlugin))
            .add_systems(
                Update,
                toggle_periodic_table
                    .in_set(InputSet)
                    .run_if(not(egui_wants_any_keyboard_input)),
            );
    }
}

fn toggle_periodic_table(keys: Res<ButtonInput<KeyCode>>, mut ui_state: ResMut<UiState>) {
    if keys.just_pressed(KeyCode::KeyT) {
        ui_state.table_open = !ui_state.table_open;
    }
}
