mod catalog;
mod clock;
mod components;
mod config;
mod errors;
mod input;
mod nucleus;
mod orbitals;
mod resources;
mod session;
mod setup;
mod simulation;
mod spawning_utils;
mod speed;
mod ui;
mod visualization;
#[cfg(target_arch = "wasm32")]
use bevy::audio::AudioPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use catalog::CatalogPlugin;
use clap::Parser;
use config::{ClockSettings, SessionSettings, SpeedSettings};
use input::InputPlugin;
use resources::SimulationControl;
use setup::SetupPlugin;
use simulation::SimulationPlugin;
use std::time::Duration;
use ui::UIPlugin;
use visualization::VisualizationPlugin;

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    LoadingCatalog,
    Ready,
}

#[derive(Resource, Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Symbol of the element shown at startup, or "none" for an empty scene.
    #[arg(short, long, default_value = "C")]
    element: String,

    /// Base URL of the element service; GET {api_url}/elements. Uses the bundled catalog when omitted.
    #[arg(long)]
    api_url: Option<String>,

    /// Electron orbit speed when the wheel is idle.
    #[arg(long, default_value_t = 0.3)]
    base_speed: f32,

    /// Longest frame delta (seconds) fed to the simulation.
    #[arg(long, default_value_t = 1.0 / 15.0)]
    max_delta: f32,

    /// Seed for nucleon placement, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Start the simulation in a paused state.
    #[arg(long, default_value_t = false)]
    paused: bool,
}

impl CliArgs {
    fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            speed: SpeedSettings {
                base_speed: self.base_speed,
                ..default()
            },
            clock: self.clock_settings(),
            seed: self.seed,
            ..default()
        }
    }

    /// Falls back to the default ceiling when the flag is not a usable duration.
    fn clock_settings(&self) -> ClockSettings {
        match Duration::try_from_secs_f32(self.max_delta.max(0.001)) {
            Ok(max_delta) => ClockSettings { max_delta },
            Err(e) => {
                warn!("Ignoring --max-delta {}: {}", self.max_delta, e);
                ClockSettings::default()
            }
        }
    }
}

fn main() {
    let args = CliArgs::parse();
    info!("CLI arguments parsed. Initial element: {}", args.element);

    let mut app = App::new();

    let default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Atom Viewer".into(),
            canvas: Some("#bevy".to_string()),
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    });

    #[cfg(target_arch = "wasm32")]
    let default_plugins = default_plugins.build().disable::<AudioPlugin>();

    app.add_plugins(default_plugins)
        .init_state::<AppState>()
        .insert_resource(ClearColor(Color::srgb_u8(0x1a, 0x1a, 0x2e)))
        .insert_resource(AmbientLight {
            brightness: 200.0,
            ..default()
        })
        .insert_resource(args.session_settings())
        .insert_resource(SimulationControl {
            paused: args.paused,
            step: false,
        })
        .insert_resource(args)
        .add_plugins((
            PanOrbitCameraPlugin,
            EguiPlugin::default(),
            CatalogPlugin,
            SimulationPlugin,
            InputPlugin,
            VisualizationPlugin,
            SetupPlugin,
            UIPlugin,
        ))
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_flow_into_session_settings() {
        let args = CliArgs::parse_from([
            "atom_viewer",
            "--element",
            "Fe",
            "--base-speed",
            "0.5",
            "--max-delta",
            "0",
            "--seed",
            "7",
        ]);
        let settings = args.session_settings();
        assert_eq!(args.element, "Fe");
        assert_eq!(settings.speed.base_speed, 0.5);
        assert_eq!(settings.clock.max_delta, Duration::from_secs_f32(0.001));
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn unrepresentable_max_delta_falls_back_to_default() {
        for value in ["inf", "1e30"] {
            let args = CliArgs::parse_from(["atom_viewer", "--max-delta", value]);
            assert_eq!(args.session_settings().clock, ClockSettings::default());
        }
    }
}
