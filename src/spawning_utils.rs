// src/spawning_utils.rs

use crate::nucleus::Species;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Nucleon(Species),
    Electron,
}

/// Base colour and glow for each kind of particle.
/// This is the single source of truth for particle visuals.
pub fn get_particle_visuals(kind: ParticleKind) -> (Color, LinearRgba) {
    match kind {
        ParticleKind::Nucleon(Species::Proton) => (
            Color::srgb_u8(0xff, 0x33, 0x00),
            LinearRgba::rgb(0.8, 0.25, 0.05),
        ),
        ParticleKind::Nucleon(Species::Neutron) => (
            Color::srgb_u8(0x88, 0xcc, 0x00),
            LinearRgba::rgb(0.3, 0.5, 0.0),
        ),
        ParticleKind::Electron => (
            Color::srgb_u8(0x00, 0x88, 0xff),
            LinearRgba::rgb(0.1, 0.45, 1.0),
        ),
    }
}

pub const ELECTRON_RADIUS: f32 = 0.1;
pub const ORBIT_RING_THICKNESS: f32 = 0.015;
pub const NUCLEUS_GLOW: Color = Color::srgb(1.0, 0.6, 0.2);
