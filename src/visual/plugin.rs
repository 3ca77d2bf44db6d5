use bevy::prelude::*;

use crate::input::SimulationCommand;
use crate::particles::DirtyFlags;
use crate::sim::{ParticleSession, RendererKind, SimulationConfig, TopologyConfig};
use crate::visual::gizmo::GizmoRenderPlugin;
use crate::visual::lines::{TensionLineMaterialPlugin, spawn_tension_lines, sync_tension_lines};
use crate::visual::points::{setup_point_visuals, sync_point_spheres};

/// Owns the simulation: loads the config, creates the session, drives the
/// fixed-rate step and installs the configured renderer
pub struct ParticlePlugin;

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        let config = match SimulationConfig::load() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load simulation config: {}; using defaults", e);
                SimulationConfig::default()
            }
        };
        log_config(&config);

        let session = match ParticleSession::new(config, &mut rand::rng()) {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to seed particle system: {}", e);
                panic!("Cannot start without a particle system");
            }
        };

        app.insert_resource(Time::<Fixed>::from_hz(
            config.physics.steps_per_second as f64,
        ))
        .insert_resource(session)
        .add_systems(FixedUpdate, step_simulation)
        .add_systems(Update, apply_simulation_commands);

        match config.renderer {
            RendererKind::Mesh => app.add_plugins(MeshRenderPlugin),
            RendererKind::Gizmos => app.add_plugins(GizmoRenderPlugin),
        };
    }
}

fn log_config(config: &SimulationConfig) {
    match config.topology {
        TopologyConfig::Flat => info!(
            "Flat topology, capacity {} points / {} springs",
            config.point_capacity, config.edge_capacity
        ),
        TopologyConfig::Tree {
            leaf,
            root_mass,
            initial_points,
        } => info!(
            "Tree topology (leaf {}, root mass {}, {} initial points), capacity {} points / {} springs",
            leaf, root_mass, initial_points, config.point_capacity, config.edge_capacity
        ),
    }
    info!(
        "Physics at {} Hz, renderer {:?}",
        config.physics.steps_per_second, config.renderer
    );
}

/// System: One fixed step of the force integrator
fn step_simulation(mut session: ResMut<ParticleSession>) {
    session.tick();
}

/// System: Apply keyboard commands to the session
fn apply_simulation_commands(
    mut messages: MessageReader<SimulationCommand>,
    mut session: ResMut<ParticleSession>,
) {
    let mut rng = rand::rng();

    for command in messages.read() {
        match command {
            SimulationCommand::AddPoints => match session.add_points(&mut rng) {
                Ok(added) => info!(
                    "Added points {}..{} ({} total)",
                    added.start,
                    added.end,
                    session.system().point_count()
                ),
                Err(e) => warn!("Cannot add points: {}", e),
            },
            SimulationCommand::Reset => match session.reset(&mut rng) {
                Ok(()) => info!(
                    "Reset to {} points / {} springs",
                    session.system().point_count(),
                    session.system().edge_count()
                ),
                Err(e) => error!("Reset failed: {}", e),
            },
            SimulationCommand::TogglePause => {
                let paused = session.toggle_pause();
                info!("{}", if paused { "Paused" } else { "Resumed" });
            }
            SimulationCommand::StepOnce => {
                if session.is_paused() {
                    session.step();
                    debug!("Single step ({} total)", session.steps());
                }
            }
        }
    }
}

// ============================================================================
// MESH RENDERER
// ============================================================================

/// Dirty flags taken from the system once per frame for the upload systems
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct FrameUploads(pub DirtyFlags);

/// Retained renderer: sphere entities for points plus one line-list mesh
/// carrying a per-vertex tension attribute
pub struct MeshRenderPlugin;

impl Plugin for MeshRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TensionLineMaterialPlugin)
            .init_resource::<FrameUploads>()
            .add_systems(Startup, (setup_point_visuals, spawn_tension_lines))
            .add_systems(
                Update,
                (take_frame_uploads, sync_point_spheres, sync_tension_lines)
                    .chain()
                    .after(apply_simulation_commands),
            );
    }
}

fn take_frame_uploads(mut session: ResMut<ParticleSession>, mut uploads: ResMut<FrameUploads>) {
    uploads.0 = session.system_mut().take_dirty();
}
