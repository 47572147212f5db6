use crate::catalog::ElementCatalog;
use crate::config::SessionSettings;
use crate::input::InputSet;
use crate::resources::{SimulationControl, SpeedHistory};
use crate::session::{SessionPhase, SimulationSession};
use crate::visualization::VisualizationSet;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsSet;

/// Request to show an element by atomic number, or to clear the view.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectElementEvent(pub Option<u32>);

#[derive(Event, Debug, Clone, Copy)]
pub struct SessionStartedEvent(pub u32);

#[derive(Event, Debug, Clone, Copy)]
pub struct SessionDisposedEvent(pub u32);

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationSession>()
            .init_resource::<SimulationControl>()
            .init_resource::<SpeedHistory>()
            .add_event::<SelectElementEvent>()
            .add_event::<SessionStartedEvent>()
            .add_event::<SessionDisposedEvent>()
            .configure_sets(Update, (InputSet, PhysicsSet, VisualizationSet).chain())
            .add_systems(
                Update,
                (handle_element_selection, tick_session, record_speed_history)
                    .chain()
                    .in_set(PhysicsSet),
            );
    }
}

fn handle_element_selection(
    mut events: EventReader<SelectElementEvent>,
    mut session: ResMut<SimulationSession>,
    mut speed_history: ResMut<SpeedHistory>,
    mut started_writer: EventWriter<SessionStartedEvent>,
    mut disposed_writer: EventWriter<SessionDisposedEvent>,
    catalog: Res<ElementCatalog>,
    settings: Res<SessionSettings>,
) {
    // Only the latest request of the frame matters.
    let Some(SelectElementEvent(request)) = events.read().last().copied() else {
        return;
    };
    if request.is_some() && request == session.element() {
        return;
    }

    let element = match request {
        Some(atomic_number) => match catalog.get(atomic_number) {
            Some(element) => Some(element),
            None => {
                warn!("Element #{} is not in the catalog", atomic_number);
                return;
            }
        },
        None => None,
    };

    if let Some(previous) = session.dispose() {
        disposed_writer.write(SessionDisposedEvent(previous));
    }
    speed_history.clear();

    if let Some(element) = element {
        info!("Selected {} ({})", element.name, element.symbol);
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        session.activate(
            element.atomic_number,
            &element.descriptor(),
            &settings,
            &mut rng,
        );
        started_writer.write(SessionStartedEvent(element.atomic_number));
    }
}

fn tick_session(
    time: Res<Time>,
    mut session: ResMut<SimulationSession>,
    mut control: ResMut<SimulationControl>,
) {
    if session.phase() != SessionPhase::Active {
        return;
    }
    session.set_paused(control.paused);
    if std::mem::take(&mut control.step) {
        session.request_step();
    }
    if let Err(e) = session.tick(time.delta()) {
        error!("Simulation tick failed: {}", e);
    }
}

fn record_speed_history(session: Res<SimulationSession>, mut history: ResMut<SpeedHistory>) {
    let (Some(simulation), Some(speed)) = (session.active(), session.current_speed()) else {
        return;
    };
    history.record(simulation.clock().elapsed().as_secs_f64(), speed as f64);
}
