use bevy::prelude::*;

use crate::{
    particles::PointId,
    sim::ParticleSession,
    visual::{
        plugin::FrameUploads,
        utils::{POINT_COLOR, point_radius},
    },
};

/// Links a sphere entity to its slot in the particle buffers
#[derive(Component, Debug, Clone, Copy)]
pub struct PointMarker {
    pub id: PointId,
}

/// Shared mesh and material for every point sphere
#[derive(Resource)]
pub struct PointVisuals {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// System: Create the shared sphere mesh and unlit point material
pub fn setup_point_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(1.0).mesh().uv(16, 12));
    let material = materials.add(StandardMaterial {
        base_color: POINT_COLOR,
        unlit: true,
        ..default()
    });

    commands.insert_resource(PointVisuals { mesh, material });
}

/// System: Keep one sphere per live point and follow the position buffer
///
/// New points get an entity on the frame after insertion. A reset that shrinks
/// the system despawns every sphere; they are rebuilt on the next frame.
pub fn sync_point_spheres(
    mut commands: Commands,
    session: Res<ParticleSession>,
    uploads: Res<FrameUploads>,
    visuals: Res<PointVisuals>,
    mut points: Query<(Entity, &PointMarker, &mut Transform)>,
) {
    let system = session.system();
    let point_size = session.config().point_size;
    let spawned = points.iter().count();

    if spawned > system.point_count() {
        for (entity, _, _) in &points {
            commands.entity(entity).despawn();
        }
        debug!("Despawned {} point spheres after reset", spawned);
        return;
    }

    for index in spawned..system.point_count() {
        let id = PointId(index);
        commands.spawn((
            PointMarker { id },
            Mesh3d(visuals.mesh.clone()),
            MeshMaterial3d(visuals.material.clone()),
            Transform::from_translation(system.position(id))
                .with_scale(Vec3::splat(point_radius(system.mass(id), point_size))),
        ));
    }

    if uploads.0.positions {
        for (_, marker, mut transform) in &mut points {
            transform.translation = system.position(marker.id);
        }
    }
}
