use bevy::asset::RenderAssetUsages;
use bevy::camera::visibility::NoFrustumCulling;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use crate::{
    particles::ParticleSystem,
    sim::ParticleSession,
    visual::{
        lines::material::{
            ATTRIBUTE_TENSION, LineMeshHandle, TensionLineMaterial, TensionLineUniform,
        },
        plugin::FrameUploads,
    },
};

fn line_positions(system: &ParticleSystem) -> Vec<[f32; 3]> {
    system.line_vertices().iter().map(|v| v.to_array()).collect()
}

/// System: Spawn the single line-list mesh that draws every spring
///
/// The mesh spans the full `2 * edge_capacity` buffer; unused slots are
/// zero-length segments at the origin.
pub fn spawn_tension_lines(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<TensionLineMaterial>>,
    session: Res<ParticleSession>,
) {
    let system = session.system();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, line_positions(system));
    mesh.insert_attribute(ATTRIBUTE_TENSION, system.tensions().to_vec());
    let mesh_handle = meshes.add(mesh);

    let material = materials.add(TensionLineMaterial {
        data: TensionLineUniform {
            alpha: session.config().line_alpha,
            ..default()
        },
    });

    commands.spawn((
        Mesh3d(mesh_handle.clone()),
        MeshMaterial3d(material),
        Transform::default(),
        // Vertices move every step; the spawn-time bounding box goes stale
        NoFrustumCulling,
    ));
    commands.insert_resource(LineMeshHandle(mesh_handle));

    info!(
        "Line mesh created: {} vertex slots",
        system.line_vertices().len()
    );
}

/// System: Re-upload line positions and tensions when the step flagged them
pub fn sync_tension_lines(
    session: Res<ParticleSession>,
    uploads: Res<FrameUploads>,
    line_mesh: Res<LineMeshHandle>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    if !uploads.0.any() {
        return;
    }

    let Some(mesh) = meshes.get_mut(&line_mesh.0) else {
        return;
    };

    let system = session.system();
    if uploads.0.positions {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, line_positions(system));
    }
    if uploads.0.tensions {
        mesh.insert_attribute(ATTRIBUTE_TENSION, system.tensions().to_vec());
    }
}
