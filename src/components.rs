use crate::nucleus::Species;
use bevy::prelude::*;

/// Parent of every entity drawn for the displayed element.
#[derive(Component, Debug, Clone, Copy)]
pub struct AtomRoot {
    pub atomic_number: u32,
}

/// Sphere mirroring one nucleon, by index within its species.
#[derive(Component, Debug, Clone, Copy)]
pub struct NucleonVisual {
    pub species: Species,
    pub index: usize,
}

/// Orbit ring of one shell, rotated with the shell's frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitFrame {
    pub shell: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ElectronVisual {
    pub shell: usize,
    pub index: usize,
}
