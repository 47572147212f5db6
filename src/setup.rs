use crate::catalog::ElementCatalog;
use crate::simulation::SelectElementEvent;
use crate::{AppState, CliArgs};
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

pub struct SetupPlugin;

impl Plugin for SetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(OnEnter(AppState::Ready), trigger_initial_selection);
    }
}

fn setup_scene(mut commands: Commands) {
    info!("Setting up scene: Camera, Lights");
    commands.spawn((
        PanOrbitCamera {
            // The wheel drives the orbit speed instead of zooming.
            zoom_sensitivity: 0.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn trigger_initial_selection(
    args: Res<CliArgs>,
    catalog: Res<ElementCatalog>,
    mut select_writer: EventWriter<SelectElementEvent>,
) {
    if args.element.eq_ignore_ascii_case("none") {
        return;
    }
    match catalog.by_symbol(&args.element) {
        Some(element) => {
            info!(
                "Sending initial selection for '{}' (#{})",
                element.symbol, element.atomic_number
            );
            select_writer.write(SelectElementEvent(Some(element.atomic_number)));
        }
        None => warn!("Unknown element symbol '{}'", args.element),
    }
}
