// src/orbitals.rs

use bevy::prelude::*;
use std::f32::consts::TAU;

/// Orbit-frame tumble rates (rad/s about X, Y, Z) for the innermost shell.
const FRAME_BASE_RATE: Vec3 = Vec3::new(0.3, 0.2, 0.15);
/// Added to the tumble rates for every shell further out.
const FRAME_RATE_PER_SHELL: Vec3 = Vec3::new(0.1, 0.05, 0.08);
/// Fractional slowdown of the electron advance per shell index.
const ANGULAR_DECAY_PER_SHELL: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectronShell {
    pub electron_count: u32,
    pub radius: f32,
}

/// Phase state of one shell: its electrons' angles and the Euler rotation
/// of the orbital frame that contains them.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    radius: f32,
    angles: Vec<f32>,
    frame_rotation: Vec3,
}

impl ShellState {
    fn new(shell: &ElectronShell) -> Self {
        let count = shell.electron_count as usize;
        let angles = (0..count)
            .map(|i| i as f32 / count as f32 * TAU)
            .collect();
        Self {
            radius: shell.radius,
            angles,
            frame_rotation: Vec3::ZERO,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn electron_count(&self) -> usize {
        self.angles.len()
    }

    /// XYZ Euler angles of the orbital frame, in radians.
    pub fn frame_rotation(&self) -> Vec3 {
        self.frame_rotation
    }

    pub fn frame_quat(&self) -> Quat {
        let r = self.frame_rotation;
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }

    /// Electron positions in the shell's own orbital plane (XZ).
    pub fn local_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.angles()
            .iter()
            .map(|&angle| local_position(angle, self.radius))
    }

    /// Electron positions after applying the orbital frame rotation.
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        let frame = self.frame_quat();
        self.local_positions().map(move |p| frame * p)
    }
}

fn local_position(angle: f32, radius: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Electrons circling on fixed-radius rings whose frames tumble.
#[derive(Debug, Clone, Default)]
pub struct OrbitalSystem {
    shells: Vec<ShellState>,
}

impl OrbitalSystem {
    pub fn new(shells: &[ElectronShell]) -> Self {
        Self {
            shells: shells.iter().map(ShellState::new).collect(),
        }
    }

    /// Advances every electron and orbital frame by `delta` seconds at the
    /// signed `speed` multiplier. Outer shells turn marginally slower.
    pub fn step(&mut self, delta: f32, speed: f32) {
        for (index, shell) in self.shells.iter_mut().enumerate() {
            let s = index as f32;

            let tumble = (FRAME_BASE_RATE + FRAME_RATE_PER_SHELL * s) * delta * speed;
            let r = shell.frame_rotation + tumble;
            shell.frame_rotation = Vec3::new(
                r.x.rem_euclid(TAU),
                r.y.rem_euclid(TAU),
                r.z.rem_euclid(TAU),
            );

            let advance = delta * (1.0 - s * ANGULAR_DECAY_PER_SHELL) * speed;
            for angle in &mut shell.angles {
                *angle = (*angle + advance).rem_euclid(TAU);
            }
        }
    }

    pub fn shells(&self) -> &[ShellState] {
        &self.shells
    }

    pub fn shell(&self, index: usize) -> Option<&ShellState> {
        self.shells.get(index)
    }

    pub fn electron_count(&self) -> usize {
        self.shells.iter().map(ShellState::electron_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn neon() -> OrbitalSystem {
        OrbitalSystem::new(&[
            ElectronShell {
                electron_count: 2,
                radius: 2.0,
            },
            ElectronShell {
                electron_count: 8,
                radius: 3.5,
            },
        ])
    }

    #[test]
    fn electrons_start_evenly_spaced() {
        let orbitals = neon();
        let angles = orbitals.shells()[1].angles();
        assert_eq!(angles.len(), 8);
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - TAU / 8.0).abs() < EPSILON);
        }
        assert_eq!(orbitals.electron_count(), 10);
    }

    #[test]
    fn outer_shells_advance_slower() {
        let mut orbitals = neon();
        orbitals.step(0.5, 1.0);
        let inner = orbitals.shells()[0].angles()[0];
        let outer = orbitals.shells()[1].angles()[0];
        assert!((inner - 0.5).abs() < EPSILON);
        assert!((outer - 0.45).abs() < EPSILON);
    }

    #[test]
    fn frame_tumbles_with_shell_index_and_speed() {
        let mut orbitals = neon();
        orbitals.step(1.0, 2.0);
        let inner = orbitals.shells()[0].frame_rotation();
        let outer = orbitals.shells()[1].frame_rotation();
        assert!((inner - Vec3::new(0.6, 0.4, 0.3)).length() < EPSILON);
        assert!((outer - Vec3::new(0.8, 0.5, 0.46)).length() < EPSILON);
    }

    #[test]
    fn negative_speed_runs_backwards() {
        let mut orbitals = neon();
        orbitals.step(0.25, -1.0);
        let angle = orbitals.shells()[0].angles()[0];
        assert!((angle - (TAU - 0.25)).abs() < EPSILON);
    }

    #[test]
    fn positions_lie_on_the_ring() {
        let mut orbitals = neon();
        orbitals.step(0.7, 1.3);
        for shell in orbitals.shells() {
            for p in shell.local_positions() {
                assert!(p.y.abs() < EPSILON);
                assert!((p.length() - shell.radius()).abs() < EPSILON);
            }
            for p in shell.world_positions() {
                assert!((p.length() - shell.radius()).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn phase_wraps_past_a_full_turn() {
        let mut orbitals = neon();
        let total = TAU + 1.0;
        for _ in 0..100 {
            orbitals.step(total / 100.0, 1.0);
        }
        let wrapped = local_position(1.0, 2.0);
        let derived = orbitals.shells()[0].local_positions().next().unwrap();
        assert!((derived - wrapped).length() < 1e-3);
    }

    #[test]
    fn empty_shells_contribute_nothing() {
        let mut orbitals = OrbitalSystem::new(&[ElectronShell {
            electron_count: 0,
            radius: 1.0,
        }]);
        orbitals.step(1.0 / 60.0, 1.0);
        assert_eq!(orbitals.shells()[0].local_positions().count(), 0);

        let mut none = OrbitalSystem::new(&[]);
        none.step(1.0 / 60.0, 1.0);
        assert!(none.shells().is_empty());
    }
}
