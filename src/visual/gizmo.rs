use bevy::prelude::*;

use crate::{
    sim::ParticleSession,
    visual::utils::{POINT_COLOR, point_radius, tension_color},
};

pub struct GizmoRenderPlugin;

impl Plugin for GizmoRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_particle_gizmos);
    }
}

/// System: Immediate-mode drawing of springs and points from the live buffers
fn draw_particle_gizmos(session: Res<ParticleSession>, mut gizmos: Gizmos) {
    let system = session.system();
    if system.is_empty() {
        return;
    }

    let edges = system.edge_count();
    for (vertices, tensions) in system
        .line_vertices()
        .chunks_exact(2)
        .zip(system.tensions().chunks_exact(2))
        .take(edges)
    {
        gizmos.line(vertices[0], vertices[1], tension_color(tensions[0]));
    }

    let point_size = session.config().point_size;
    for (&position, &mass) in system.positions().iter().zip(system.masses()) {
        gizmos.sphere(
            Isometry3d::new(position, Quat::IDENTITY),
            point_radius(mass, point_size),
            POINT_COLOR,
        );
    }
}
