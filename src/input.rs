use crate::resources::SimulationControl;
use crate::session::SimulationSession;
use crate::simulation::SelectElementEvent;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_egui::input::egui_wants_any_keyboard_input;

/// Pixels per wheel line, roughly what a browser reports for one notch.
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSet;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                scroll_to_speed,
                handle_simulation_control.run_if(not(egui_wants_any_keyboard_input)),
            )
                .in_set(InputSet),
        );
    }
}

/// Wheel delta in pixels, positive when scrolling down (towards the user).
fn wheel_delta_pixels(event: &MouseWheel) -> f32 {
    let y = match event.unit {
        MouseScrollUnit::Line => event.y * PIXELS_PER_LINE,
        MouseScrollUnit::Pixel => event.y,
    };
    -y
}

fn scroll_to_speed(
    mut wheel_events: EventReader<MouseWheel>,
    mut session: ResMut<SimulationSession>,
    mut contexts: EguiContexts,
) {
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);
    for event in wheel_events.read() {
        if over_ui {
            continue;
        }
        let delta = wheel_delta_pixels(event);
        // Purely horizontal scrolling carries no vertical intent.
        if delta == 0.0 {
            continue;
        }
        session.on_wheel(delta);
    }
}

fn handle_simulation_control(
    keys: Res<ButtonInput<KeyCode>>,
    mut control: ResMut<SimulationControl>,
    mut select_writer: EventWriter<SelectElementEvent>,
) {
    if keys.just_pressed(KeyCode::Space) {
        control.paused = !control.paused;
        info!(
            "Simulation {}",
            if control.paused { "paused" } else { "resumed" }
        );
    }
    // Right arrow steps one frame when paused
    if control.paused && keys.just_pressed(KeyCode::ArrowRight) {
        control.step = true;
    }
    if keys.just_pressed(KeyCode::Escape) {
        select_writer.write(SelectElementEvent(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(unit: MouseScrollUnit, y: f32) -> MouseWheel {
        MouseWheel {
            unit,
            x: 0.0,
            y,
            window: Entity::PLACEHOLDER,
        }
    }

    #[test]
    fn line_scrolls_are_scaled_to_pixels() {
        assert_eq!(wheel_delta_pixels(&wheel(MouseScrollUnit::Line, -1.0)), 100.0);
        assert_eq!(wheel_delta_pixels(&wheel(MouseScrollUnit::Pixel, 30.0)), -30.0);
    }
}
