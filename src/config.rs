use crate::errors::CatalogError;
use crate::orbitals::ElectronShell;
use crate::session::ElementDescriptor;
use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ElementCategory {
    AlkaliMetal,
    AlkalineEarth,
    TransitionMetal,
    PostTransition,
    Metalloid,
    Nonmetal,
    Halogen,
    NobleGas,
    Lanthanide,
    Actinide,
}

impl ElementCategory {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ElementCategory::AlkaliMetal => [0xff, 0x6b, 0x6b],
            ElementCategory::AlkalineEarth => [0xfe, 0xca, 0x57],
            ElementCategory::TransitionMetal => [0x48, 0xdb, 0xfb],
            ElementCategory::PostTransition => [0x1d, 0xd1, 0xa1],
            ElementCategory::Metalloid => [0x54, 0xa0, 0xff],
            ElementCategory::Nonmetal => [0x00, 0xd2, 0xd3],
            ElementCategory::Halogen => [0x5f, 0x27, 0xcd],
            ElementCategory::NobleGas => [0xc8, 0xd6, 0xe5],
            ElementCategory::Lanthanide => [0xff, 0x9f, 0xf3],
            ElementCategory::Actinide => [0xee, 0x5a, 0x6f],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ElementCategory::AlkaliMetal => "Alkali metal",
            ElementCategory::AlkalineEarth => "Alkaline earth metal",
            ElementCategory::TransitionMetal => "Transition metal",
            ElementCategory::PostTransition => "Post-transition metal",
            ElementCategory::Metalloid => "Metalloid",
            ElementCategory::Nonmetal => "Nonmetal",
            ElementCategory::Halogen => "Halogen",
            ElementCategory::NobleGas => "Noble gas",
            ElementCategory::Lanthanide => "Lanthanide",
            ElementCategory::Actinide => "Actinide",
        }
    }
}

/// Used when an element has no category.
pub const UNCATEGORIZED_RGB: [u8; 3] = [0x66, 0x7e, 0xea];

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ShellConfig {
    pub electrons: u32,
    pub radius: f32,
}

impl From<ShellConfig> for ElectronShell {
    fn from(config: ShellConfig) -> Self {
        ElectronShell {
            electron_count: config.electrons,
            radius: config.radius,
        }
    }
}

fn default_nucleus_radius() -> f32 {
    0.3
}

fn default_particle_radius() -> f32 {
    0.1
}

/// One element as served by the element service (camelCase JSON).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementConfig {
    pub atomic_number: u32,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<ElementCategory>,
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub group: Option<u32>,
    pub protons: u32,
    pub neutrons: u32,
    pub electron_shells: Vec<ShellConfig>,
    #[serde(default = "default_nucleus_radius")]
    pub nucleus_radius: f32,
    #[serde(default = "default_particle_radius")]
    pub particle_radius: f32,
}

impl ElementConfig {
    pub fn electron_count(&self) -> u32 {
        self.electron_shells.iter().map(|shell| shell.electrons).sum()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidElement {
            atomic_number: self.atomic_number,
            reason,
        };
        if !(self.nucleus_radius.is_finite() && self.nucleus_radius > 0.0) {
            return Err(invalid(format!(
                "nucleus radius must be positive, got {}",
                self.nucleus_radius
            )));
        }
        if !(self.particle_radius.is_finite() && self.particle_radius > 0.0) {
            return Err(invalid(format!(
                "particle radius must be positive, got {}",
                self.particle_radius
            )));
        }
        for (index, shell) in self.electron_shells.iter().enumerate() {
            if !(shell.radius.is_finite() && shell.radius > 0.0) {
                return Err(invalid(format!(
                    "shell {} radius must be positive, got {}",
                    index, shell.radius
                )));
            }
        }
        Ok(())
    }

    /// The structural parameters the simulation core consumes.
    pub fn descriptor(&self) -> ElementDescriptor {
        ElementDescriptor {
            proton_count: self.protons,
            neutron_count: self.neutrons,
            electron_shells: self
                .electron_shells
                .iter()
                .copied()
                .map(ElectronShell::from)
                .collect(),
            nucleus_radius: self.nucleus_radius,
            particle_radius: self.particle_radius,
        }
    }
}

/// Tuning constants for the nucleus force model. All forces are per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct NucleusParameters {
    pub repulsion_force: f32,
    pub attraction_force: f32,
    pub dampening: f32,
    pub center_force: f32,
    /// Opposite-species pairs farther apart than this do not attract.
    pub attraction_cutoff: f32,
    /// Same-species repulsion range, as a multiple of the particle radius.
    pub min_distance_factor: f32,
    /// Keeps repulsion finite for coincident particles.
    pub softening: f32,
    /// Multiplier on the normal velocity removed at the containment sphere.
    pub restitution: f32,
    pub repulsion: bool,
    pub attraction: bool,
    pub centering: bool,
}

impl Default for NucleusParameters {
    fn default() -> Self {
        Self {
            repulsion_force: 0.000009,
            attraction_force: 0.000003,
            dampening: 0.9,
            center_force: 0.000001,
            attraction_cutoff: 0.5,
            min_distance_factor: 1.35,
            softening: 0.01,
            restitution: 1.5,
            repulsion: true,
            attraction: true,
            centering: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSettings {
    pub base_speed: f32,
    pub rate_limit: Duration,
    pub decay_delay: Duration,
    /// Wheel delta that adds one unit of amplification.
    pub wheel_divisor: f32,
    pub max_amplification: f32,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            base_speed: 0.3,
            rate_limit: Duration::from_millis(50),
            decay_delay: Duration::from_millis(800),
            wheel_divisor: 20.0,
            max_amplification: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockSettings {
    /// Frame deltas above this are treated as stalls and clamped.
    pub max_delta: Duration,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            max_delta: Duration::from_secs_f64(1.0 / 15.0),
        }
    }
}

/// Everything a new session needs besides the element itself.
#[derive(Resource, Debug, Clone, Default)]
pub struct SessionSettings {
    pub nucleus: NucleusParameters,
    pub speed: SpeedSettings,
    pub clock: ClockSettings,
    /// Seeds nucleus scattering; `None` draws from the thread rng.
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARBON: &str = r#"{
        "atomicNumber": 6,
        "symbol": "C",
        "name": "Carbon",
        "category": "nonmetal",
        "period": 2,
        "group": 14,
        "protons": 6,
        "neutrons": 6,
        "electronShells": [
            { "electrons": 2, "radius": 2.0 },
            { "electrons": 4, "radius": 3.5 }
        ]
    }"#;

    #[test]
    fn parses_service_json_with_defaults() {
        let element: ElementConfig = serde_json::from_str(CARBON).unwrap();
        assert_eq!(element.atomic_number, 6);
        assert_eq!(element.category, Some(ElementCategory::Nonmetal));
        assert_eq!(element.nucleus_radius, 0.3);
        assert_eq!(element.particle_radius, 0.1);
        assert_eq!(element.electron_count(), 6);
        assert!(element.validate().is_ok());
    }

    #[test]
    fn descriptor_carries_structure() {
        let element: ElementConfig = serde_json::from_str(CARBON).unwrap();
        let descriptor = element.descriptor();
        assert_eq!(descriptor.proton_count, 6);
        assert_eq!(descriptor.neutron_count, 6);
        assert_eq!(descriptor.electron_shells.len(), 2);
        assert_eq!(descriptor.electron_shells[1].electron_count, 4);
        assert_eq!(descriptor.electron_shells[1].radius, 3.5);
    }

    #[test]
    fn rejects_non_positive_shell_radius() {
        let mut element: ElementConfig = serde_json::from_str(CARBON).unwrap();
        element.electron_shells[0].radius = 0.0;
        match element.validate() {
            Err(CatalogError::InvalidElement { atomic_number, .. }) => {
                assert_eq!(atomic_number, 6)
            }
            other => panic!("expected invalid element, got {:?}", other),
        }
    }

    #[test]
    fn rejects_nan_nucleus_radius() {
        let mut element: ElementConfig = serde_json::from_str(CARBON).unwrap();
        element.nucleus_radius = f32::NAN;
        assert!(element.validate().is_err());
    }
}
