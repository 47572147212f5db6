// src/session.rs

use crate::clock::SimulationClock;
use crate::config::SessionSettings;
use crate::errors::SessionError;
use crate::nucleus::{NucleusField, Species};
use crate::orbitals::{ElectronShell, OrbitalSystem};
use crate::speed::SpeedController;
use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

/// Structural parameters of one element, as handed to the core.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDescriptor {
    pub proton_count: u32,
    pub neutron_count: u32,
    pub electron_shells: Vec<ElectronShell>,
    pub nucleus_radius: f32,
    pub particle_radius: f32,
}

/// All per-element simulation state. Created together, dropped together.
#[derive(Debug)]
pub struct AtomSimulation {
    atomic_number: u32,
    nucleus: NucleusField,
    orbitals: OrbitalSystem,
    speed: SpeedController,
    clock: SimulationClock,
}

impl AtomSimulation {
    pub fn atomic_number(&self) -> u32 {
        self.atomic_number
    }

    pub fn nucleus(&self) -> &NucleusField {
        &self.nucleus
    }

    pub fn orbitals(&self) -> &OrbitalSystem {
        &self.orbitals
    }

    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Active,
    Disposed,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Uninitialized,
    Active(Box<AtomSimulation>),
    Disposed,
}

/// The simulation for the currently displayed element.
///
/// `Uninitialized -> Active` on the first selection, `Active -> Disposed`
/// when the element is deselected or replaced. Replacing an element goes
/// through `Disposed` before the new element becomes `Active`; nothing is
/// carried over.
#[derive(Resource, Debug, Default)]
pub struct SimulationSession {
    state: SessionState,
}

impl SimulationSession {
    pub fn activate<R: Rng + ?Sized>(
        &mut self,
        atomic_number: u32,
        descriptor: &ElementDescriptor,
        settings: &SessionSettings,
        rng: &mut R,
    ) {
        self.dispose();
        let nucleus = NucleusField::scatter(
            rng,
            descriptor.proton_count as usize,
            descriptor.neutron_count as usize,
            descriptor.nucleus_radius,
            descriptor.particle_radius,
            settings.nucleus.clone(),
        );
        let orbitals = OrbitalSystem::new(&descriptor.electron_shells);
        info!(
            "Session started for element #{}: {} protons, {} neutrons, {} shells",
            atomic_number,
            descriptor.proton_count,
            descriptor.neutron_count,
            descriptor.electron_shells.len()
        );
        self.state = SessionState::Active(Box::new(AtomSimulation {
            atomic_number,
            nucleus,
            orbitals,
            speed: SpeedController::new(settings.speed.clone()),
            clock: SimulationClock::new(&settings.clock),
        }));
    }

    /// Discards all particle and orbital state. Returns the element that was
    /// active, if any.
    pub fn dispose(&mut self) -> Option<u32> {
        match std::mem::replace(&mut self.state, SessionState::Disposed) {
            SessionState::Active(mut simulation) => {
                simulation.speed.cancel();
                info!("Session for element #{} disposed", simulation.atomic_number);
                Some(simulation.atomic_number)
            }
            SessionState::Uninitialized => {
                self.state = SessionState::Uninitialized;
                None
            }
            SessionState::Disposed => None,
        }
    }

    /// Advances the active simulation by one rendered frame.
    pub fn tick(&mut self, raw_delta: Duration) -> Result<(), SessionError> {
        let simulation = match &mut self.state {
            SessionState::Active(simulation) => simulation,
            SessionState::Uninitialized => return Err(SessionError::Uninitialized),
            SessionState::Disposed => return Err(SessionError::Disposed),
        };
        let delta = simulation.clock.advance(raw_delta);
        simulation.speed.update(simulation.clock.wall());
        let speed = simulation.speed.current_speed();
        simulation.nucleus.step(delta);
        simulation.orbitals.step(delta, speed);
        Ok(())
    }

    /// Routes a wheel delta to the speed controller. Ignored without an
    /// active element.
    pub fn on_wheel(&mut self, delta_y: f32) -> bool {
        let Some(simulation) = self.active_mut() else {
            return false;
        };
        let now = simulation.clock.wall();
        let accepted = simulation.speed.on_wheel(delta_y, now);
        if accepted {
            debug!(
                "Speed impulse {:+.1} -> {:.2}",
                delta_y,
                simulation.speed.current_speed()
            );
        }
        accepted
    }

    /// Pauses or resumes the active clock. Resuming drops a pending step.
    pub fn set_paused(&mut self, paused: bool) {
        if let Some(simulation) = self.active_mut() {
            simulation.clock.set_paused(paused);
        }
    }

    /// Advances one tick on the next frame while paused.
    pub fn request_step(&mut self) {
        if let Some(simulation) = self.active_mut() {
            simulation.clock.request_step();
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Uninitialized => SessionPhase::Uninitialized,
            SessionState::Active(_) => SessionPhase::Active,
            SessionState::Disposed => SessionPhase::Disposed,
        }
    }

    pub fn active(&self) -> Option<&AtomSimulation> {
        match &self.state {
            SessionState::Active(simulation) => Some(simulation),
            _ => None,
        }
    }

    fn active_mut(&mut self) -> Option<&mut AtomSimulation> {
        match &mut self.state {
            SessionState::Active(simulation) => Some(simulation),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<u32> {
        self.active().map(|simulation| simulation.atomic_number)
    }

    pub fn current_speed(&self) -> Option<f32> {
        self.active().map(|simulation| simulation.speed.current_speed())
    }

    pub fn proton_positions(&self) -> Vec<Vec3> {
        self.nucleon_positions(Species::Proton)
    }

    pub fn neutron_positions(&self) -> Vec<Vec3> {
        self.nucleon_positions(Species::Neutron)
    }

    fn nucleon_positions(&self, species: Species) -> Vec<Vec3> {
        self.active()
            .map(|simulation| simulation.nucleus.positions(species).collect())
            .unwrap_or_default()
    }

    /// World positions of the electrons in `shell`.
    pub fn electron_positions(&self, shell: usize) -> Vec<Vec3> {
        self.active()
            .and_then(|simulation| simulation.orbitals.shell(shell))
            .map(|state| state.world_positions().collect())
            .unwrap_or_default()
    }

    /// Euler rotation (XYZ) of every orbital frame, innermost first.
    pub fn orbit_rotations(&self) -> Vec<Vec3> {
        self.active()
            .map(|simulation| {
                simulation
                    .orbitals
                    .shells()
                    .iter()
                    .map(|shell| shell.frame_rotation())
                    .collect()
            })
            .unwrap_or_default()
    }
}
