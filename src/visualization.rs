use crate::components::{AtomRoot, ElectronVisual, NucleonVisual, OrbitFrame};
use crate::nucleus::Species;
use crate::session::{AtomSimulation, SessionPhase, SimulationSession};
use crate::simulation::{SessionDisposedEvent, SessionStartedEvent};
use crate::spawning_utils::{
    ELECTRON_RADIUS, NUCLEUS_GLOW, ORBIT_RING_THICKNESS, ParticleKind, get_particle_visuals,
};
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualizationSet;

/// Handles shared by every element's visuals.
#[derive(Resource)]
pub struct AtomAssets {
    pub electron_mesh: Handle<Mesh>,
    pub proton_material: Handle<StandardMaterial>,
    pub neutron_material: Handle<StandardMaterial>,
    pub electron_material: Handle<StandardMaterial>,
    pub orbit_material: Handle<StandardMaterial>,
}

pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_atom_assets).add_systems(
            Update,
            (rebuild_atom_visuals, update_atom_visuals)
                .chain()
                .in_set(VisualizationSet),
        );
    }
}

fn particle_material(kind: ParticleKind) -> StandardMaterial {
    let (base_color, emissive) = get_particle_visuals(kind);
    StandardMaterial {
        base_color,
        emissive,
        perceptual_roughness: 0.4,
        ..default()
    }
}

fn setup_atom_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(AtomAssets {
        electron_mesh: meshes.add(Sphere::new(ELECTRON_RADIUS).mesh().uv(16, 16)),
        proton_material: materials.add(particle_material(ParticleKind::Nucleon(
            Species::Proton,
        ))),
        neutron_material: materials.add(particle_material(ParticleKind::Nucleon(
            Species::Neutron,
        ))),
        electron_material: materials.add(particle_material(ParticleKind::Electron)),
        orbit_material: materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.2),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        }),
    });
}

/// Tears down the previous element's entities and builds the new one.
fn rebuild_atom_visuals(
    mut commands: Commands,
    mut started: EventReader<SessionStartedEvent>,
    mut disposed: EventReader<SessionDisposedEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    assets: Res<AtomAssets>,
    session: Res<SimulationSession>,
    roots: Query<(Entity, &AtomRoot)>,
) {
    let last_disposed = disposed.read().last().copied();
    let last_started = started.read().last().copied();
    if last_disposed.is_none() && last_started.is_none() {
        return;
    }
    if let Some(SessionDisposedEvent(atomic_number)) = last_disposed {
        debug!("Session for element #{} ended", atomic_number);
    }
    for (entity, root) in &roots {
        debug!("Despawning visuals for element #{}", root.atomic_number);
        commands.entity(entity).despawn();
    }
    if let Some(SessionStartedEvent(atomic_number)) = last_started {
        if let Some(simulation) = session.active() {
            debug!("Spawning visuals for element #{}", atomic_number);
            spawn_atom(&mut commands, &mut meshes, &assets, &session, simulation);
        }
    }
}

fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

fn spawn_atom(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    assets: &AtomAssets,
    session: &SimulationSession,
    simulation: &AtomSimulation,
) {
    let nucleus = simulation.nucleus();
    let nucleon_mesh = meshes.add(Sphere::new(nucleus.particle_radius()).mesh().uv(8, 8));
    let ring_meshes: Vec<Handle<Mesh>> = simulation
        .orbitals()
        .shells()
        .iter()
        .map(|shell| {
            meshes.add(Torus {
                minor_radius: ORBIT_RING_THICKNESS,
                major_radius: shell.radius(),
            })
        })
        .collect();
    let nucleons = [
        (Species::Proton, session.proton_positions(), &assets.proton_material),
        (Species::Neutron, session.neutron_positions(), &assets.neutron_material),
    ];
    let rotations = session.orbit_rotations();

    commands
        .spawn((
            AtomRoot {
                atomic_number: simulation.atomic_number(),
            },
            Name::new(format!("Atom #{}", simulation.atomic_number())),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for (species, positions, material) in nucleons {
                for (index, position) in positions.into_iter().enumerate() {
                    parent.spawn((
                        NucleonVisual { species, index },
                        Mesh3d(nucleon_mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        Transform::from_translation(position),
                    ));
                }
            }

            parent.spawn((
                PointLight {
                    color: NUCLEUS_GLOW,
                    intensity: 150_000.0,
                    range: nucleus.nucleus_radius() * 10.0,
                    ..default()
                },
                Transform::default(),
            ));

            for (shell, (rotation, ring)) in rotations.into_iter().zip(ring_meshes).enumerate() {
                parent.spawn((
                    OrbitFrame { shell },
                    Mesh3d(ring),
                    MeshMaterial3d(assets.orbit_material.clone()),
                    Transform::from_rotation(euler_to_quat(rotation)),
                ));
                // Electrons carry world positions, so they hang off the root
                // rather than the tumbling ring.
                for (index, position) in session.electron_positions(shell).into_iter().enumerate() {
                    parent.spawn((
                        ElectronVisual { shell, index },
                        Mesh3d(assets.electron_mesh.clone()),
                        MeshMaterial3d(assets.electron_material.clone()),
                        Transform::from_translation(position),
                    ));
                }
            }
        });
}

/// Copies the session's outputs onto the entities, by index.
fn update_atom_visuals(
    session: Res<SimulationSession>,
    mut nucleons: Query<
        (&NucleonVisual, &mut Transform),
        (Without<OrbitFrame>, Without<ElectronVisual>),
    >,
    mut frames: Query<
        (&OrbitFrame, &mut Transform),
        (Without<NucleonVisual>, Without<ElectronVisual>),
    >,
    mut electrons: Query<
        (&ElectronVisual, &mut Transform),
        (Without<NucleonVisual>, Without<OrbitFrame>),
    >,
) {
    if session.phase() != SessionPhase::Active {
        return;
    }
    let protons = session.proton_positions();
    let neutrons = session.neutron_positions();
    for (visual, mut transform) in &mut nucleons {
        let positions = match visual.species {
            Species::Proton => &protons,
            Species::Neutron => &neutrons,
        };
        if let Some(&position) = positions.get(visual.index) {
            transform.translation = position;
        }
    }

    let rotations = session.orbit_rotations();
    for (frame, mut transform) in &mut frames {
        if let Some(&rotation) = rotations.get(frame.shell) {
            transform.rotation = euler_to_quat(rotation);
        }
    }

    let shells: Vec<Vec<Vec3>> = (0..rotations.len())
        .map(|shell| session.electron_positions(shell))
        .collect();
    for (visual, mut transform) in &mut electrons {
        if let Some(&position) = shells.get(visual.shell).and_then(|s| s.get(visual.index)) {
            transform.translation = position;
        }
    }
}
