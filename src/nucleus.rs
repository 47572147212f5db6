// src/nucleus.rs

use crate::config::NucleusParameters;
use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, ParallelSlice, TaskPool};
use rand::Rng;
use std::f32::consts::TAU;

/// Above this many nucleons the force pass is split across the compute pool.
const PARALLEL_THRESHOLD: usize = 512;
const PARALLEL_CHUNK: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Species {
    Proton,
    Neutron,
}

impl Species {
    pub fn opposite(self) -> Self {
        match self {
            Species::Proton => Species::Neutron,
            Species::Neutron => Species::Proton,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Particle {
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }
}

/// Uniform sample inside a ball. The radius is cube-root scaled so density
/// is even over the volume rather than bunched at the centre.
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    let r = rng.random::<f32>().cbrt() * radius;
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Protons and neutrons confined to the nucleus sphere.
///
/// Each tick every force is evaluated against the positions from the start of
/// the tick, then all particles are integrated and pushed back inside the
/// containment sphere. Particle order within a species never changes, so
/// indices can be used as stable handles by the renderer.
#[derive(Debug, Clone)]
pub struct NucleusField {
    protons: Vec<Particle>,
    neutrons: Vec<Particle>,
    nucleus_radius: f32,
    particle_radius: f32,
    params: NucleusParameters,
}

impl NucleusField {
    pub fn new(
        protons: Vec<Particle>,
        neutrons: Vec<Particle>,
        nucleus_radius: f32,
        particle_radius: f32,
        params: NucleusParameters,
    ) -> Self {
        Self {
            protons,
            neutrons,
            nucleus_radius,
            particle_radius,
            params,
        }
    }

    /// Scatters the nucleons uniformly through the nucleus volume, at rest.
    pub fn scatter<R: Rng + ?Sized>(
        rng: &mut R,
        proton_count: usize,
        neutron_count: usize,
        nucleus_radius: f32,
        particle_radius: f32,
        params: NucleusParameters,
    ) -> Self {
        let protons = (0..proton_count)
            .map(|_| Particle::at_rest(random_point_in_sphere(rng, nucleus_radius)))
            .collect();
        let neutrons = (0..neutron_count)
            .map(|_| Particle::at_rest(random_point_in_sphere(rng, nucleus_radius)))
            .collect();
        Self::new(protons, neutrons, nucleus_radius, particle_radius, params)
    }

    pub fn particles(&self, species: Species) -> &[Particle] {
        match species {
            Species::Proton => &self.protons,
            Species::Neutron => &self.neutrons,
        }
    }

    pub fn positions(&self, species: Species) -> impl Iterator<Item = Vec3> + '_ {
        self.particles(species).iter().map(|p| p.position)
    }

    pub fn len(&self) -> usize {
        self.protons.len() + self.neutrons.len()
    }

    pub fn nucleus_radius(&self) -> f32 {
        self.nucleus_radius
    }

    pub fn particle_radius(&self) -> f32 {
        self.particle_radius
    }

    /// Same-species particles closer than this repel.
    pub fn min_distance(&self) -> f32 {
        self.particle_radius * self.params.min_distance_factor
    }

    /// Advances every nucleon by one tick. The force constants are tuned per
    /// rendered frame, so `delta` only gates the tick: a zero delta (paused
    /// clock) leaves the field untouched.
    pub fn step(&mut self, delta: f32) {
        if delta <= 0.0 || self.len() == 0 {
            return;
        }
        let (proton_forces, neutron_forces) = if self.len() > PARALLEL_THRESHOLD {
            let pool = ComputeTaskPool::get_or_init(TaskPool::default);
            (
                self.forces_parallel(Species::Proton, pool),
                self.forces_parallel(Species::Neutron, pool),
            )
        } else {
            (
                self.forces(Species::Proton),
                self.forces(Species::Neutron),
            )
        };
        let params = &self.params;
        let radius = self.nucleus_radius;
        for (particle, force) in self.protons.iter_mut().zip(proton_forces) {
            integrate(particle, force, params, radius);
        }
        for (particle, force) in self.neutrons.iter_mut().zip(neutron_forces) {
            integrate(particle, force, params, radius);
        }
    }

    /// Net force on every particle of `species`, from the current snapshot.
    pub fn forces(&self, species: Species) -> Vec<Vec3> {
        self.particles(species)
            .iter()
            .enumerate()
            .map(|(index, particle)| self.net_force(species, index, particle.position))
            .collect()
    }

    fn forces_parallel(&self, species: Species, pool: &TaskPool) -> Vec<Vec3> {
        self.particles(species)
            .par_chunk_map(pool, PARALLEL_CHUNK, |chunk_index, chunk| {
                let offset = chunk_index * PARALLEL_CHUNK;
                chunk
                    .iter()
                    .enumerate()
                    .map(|(i, particle)| self.net_force(species, offset + i, particle.position))
                    .collect::<Vec<_>>()
            })
            .into_iter()
            .flatten()
            .collect()
    }

    fn net_force(&self, species: Species, index: usize, position: Vec3) -> Vec3 {
        let params = &self.params;
        let min_distance = self.min_distance();
        let mut force = Vec3::ZERO;

        if params.repulsion {
            for (j, other) in self.particles(species).iter().enumerate() {
                if j == index {
                    continue;
                }
                let diff = position - other.position;
                let distance = diff.length();
                if distance < min_distance {
                    force += diff.normalize_or_zero()
                        * (params.repulsion_force / (distance * distance + params.softening));
                }
            }
        }

        if params.attraction {
            for other in self.particles(species.opposite()) {
                let diff = other.position - position;
                let distance = diff.length();
                if distance > min_distance && distance < params.attraction_cutoff {
                    force += diff.normalize_or_zero() * params.attraction_force;
                }
            }
        }

        if params.centering {
            force -= position * params.center_force;
        }

        force
    }
}

fn integrate(particle: &mut Particle, force: Vec3, params: &NucleusParameters, radius: f32) {
    particle.velocity += force;
    particle.velocity *= params.dampening;
    particle.position += particle.velocity;

    let distance = particle.position.length();
    if distance > radius {
        let normal = particle.position / distance;
        particle.position = normal * radius;
        let normal_velocity = normal * particle.velocity.dot(normal);
        particle.velocity -= normal_velocity * params.restitution;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPSILON: f32 = 1e-5;

    fn scattered(seed: u64, protons: usize, neutrons: usize) -> NucleusField {
        let mut rng = StdRng::seed_from_u64(seed);
        NucleusField::scatter(
            &mut rng,
            protons,
            neutrons,
            0.3,
            0.1,
            NucleusParameters::default(),
        )
    }

    fn assert_contained(field: &NucleusField) {
        for species in [Species::Proton, Species::Neutron] {
            for position in field.positions(species) {
                assert!(
                    position.length() <= field.nucleus_radius() + EPSILON,
                    "{:?} escaped to {}",
                    species,
                    position.length()
                );
            }
        }
    }

    #[test]
    fn scatter_stays_inside_the_sphere() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert!(random_point_in_sphere(&mut rng, 0.3).length() <= 0.3 + EPSILON);
        }
    }

    #[test]
    fn scatter_fills_the_volume_evenly() {
        // A ball of half the radius holds an eighth of the volume.
        let mut rng = StdRng::seed_from_u64(11);
        let samples = 10_000;
        let inner = (0..samples)
            .filter(|_| random_point_in_sphere(&mut rng, 0.3).length() < 0.15)
            .count();
        let fraction = inner as f32 / samples as f32;
        assert!((fraction - 0.125).abs() < 0.02, "inner fraction {}", fraction);
    }

    #[test]
    fn boundary_holds_across_many_steps() {
        let mut field = scattered(1, 26, 30);
        for _ in 0..500 {
            field.step(1.0 / 60.0);
            assert_contained(&field);
        }
    }

    #[test]
    fn escaping_particle_is_clamped_and_turned_inward() {
        let params = NucleusParameters {
            repulsion: false,
            attraction: false,
            centering: false,
            ..Default::default()
        };
        let particle = Particle {
            position: Vec3::new(0.29, 0.0, 0.0),
            velocity: Vec3::new(0.2, 0.0, 0.0),
        };
        let mut field = NucleusField::new(vec![particle], Vec::new(), 0.3, 0.1, params);
        field.step(1.0 / 60.0);

        let after = field.particles(Species::Proton)[0];
        assert!((after.position.length() - 0.3).abs() < EPSILON);
        assert!(after.velocity.x < 0.0);
    }

    #[test]
    fn counts_never_change() {
        let mut field = scattered(2, 8, 8);
        for _ in 0..100 {
            field.step(1.0 / 60.0);
        }
        assert_eq!(field.particles(Species::Proton).len(), 8);
        assert_eq!(field.particles(Species::Neutron).len(), 8);
    }

    #[test]
    fn identical_inputs_give_identical_trajectories() {
        let mut a = scattered(42, 20, 22);
        let mut b = scattered(42, 20, 22);
        for frame in 0..200 {
            let delta = if frame % 3 == 0 { 1.0 / 30.0 } else { 1.0 / 60.0 };
            a.step(delta);
            b.step(delta);
        }
        assert_eq!(a.particles(Species::Proton), b.particles(Species::Proton));
        assert_eq!(a.particles(Species::Neutron), b.particles(Species::Neutron));
    }

    #[test]
    fn forces_use_the_start_of_tick_snapshot() {
        // Swapping the species must mirror the result exactly; an in-place
        // update would let whichever species goes first see stale partners.
        let protons = vec![Particle::at_rest(Vec3::new(0.1, 0.0, 0.0))];
        let neutrons = vec![Particle::at_rest(Vec3::new(-0.1, 0.0, 0.0))];
        let mut forward = NucleusField::new(
            protons.clone(),
            neutrons.clone(),
            0.3,
            0.1,
            NucleusParameters::default(),
        );
        let mut swapped =
            NucleusField::new(neutrons, protons, 0.3, 0.1, NucleusParameters::default());
        forward.step(1.0 / 60.0);
        swapped.step(1.0 / 60.0);
        assert_eq!(
            forward.particles(Species::Proton),
            swapped.particles(Species::Neutron)
        );
        assert_eq!(
            forward.particles(Species::Neutron),
            swapped.particles(Species::Proton)
        );
    }

    #[test]
    fn close_same_species_particles_push_apart() {
        let params = NucleusParameters {
            attraction: false,
            centering: false,
            ..Default::default()
        };
        let min_distance = 0.1 * params.min_distance_factor;
        let half = 0.25 * min_distance;
        let mut field = NucleusField::new(
            vec![
                Particle::at_rest(Vec3::new(-half, 0.0, 0.0)),
                Particle::at_rest(Vec3::new(half, 0.0, 0.0)),
            ],
            Vec::new(),
            0.3,
            0.1,
            params,
        );
        let before = 2.0 * half;
        field.step(1.0 / 60.0);
        let protons = field.particles(Species::Proton);
        assert!(protons[0].position.distance(protons[1].position) > before);
    }

    #[test]
    fn opposite_species_attract_inside_cutoff() {
        let params = NucleusParameters {
            repulsion: false,
            centering: false,
            ..Default::default()
        };
        let mut field = NucleusField::new(
            vec![Particle::at_rest(Vec3::new(-0.1, 0.0, 0.0))],
            vec![Particle::at_rest(Vec3::new(0.1, 0.0, 0.0))],
            0.3,
            0.1,
            params,
        );
        field.step(1.0 / 60.0);
        assert!(field.particles(Species::Proton)[0].position.x > -0.1);
        assert!(field.particles(Species::Neutron)[0].position.x < 0.1);
    }

    #[test]
    fn zero_delta_leaves_the_field_alone() {
        let mut field = scattered(3, 6, 6);
        let before = field.clone();
        field.step(0.0);
        assert_eq!(
            field.particles(Species::Proton),
            before.particles(Species::Proton)
        );
    }

    #[test]
    fn degenerate_fields_are_no_ops() {
        let mut empty = NucleusField::new(
            Vec::new(),
            Vec::new(),
            0.3,
            0.1,
            NucleusParameters::default(),
        );
        empty.step(1.0 / 60.0);
        assert_eq!(empty.len(), 0);

        let mut collapsed = scattered(4, 3, 0);
        collapsed.nucleus_radius = 0.0;
        collapsed.step(1.0 / 60.0);
        for position in collapsed.positions(Species::Proton) {
            assert!(position.length() <= EPSILON);
        }
    }

    #[test]
    fn parallel_forces_match_serial() {
        let field = scattered(5, 300, 320);
        let pool = TaskPool::new();
        assert_eq!(
            field.forces(Species::Proton),
            field.forces_parallel(Species::Proton, &pool)
        );
        assert_eq!(
            field.forces(Species::Neutron),
            field.forces_parallel(Species::Neutron, &pool)
        );
    }
}
