pub mod forces;
pub mod integration;
pub mod render_buffers;

use bevy::math::Vec3;

use crate::particles::ParticleSystem;

pub use forces::{apply_level_repulsion, apply_spring_forces};
pub use integration::{Bounds, integrate};
pub use render_buffers::write_render_buffers;

pub mod presets {
    use crate::particles::SpringParams;

    /// Loose rubber band from the first prototype
    pub const ORIGINAL: SpringParams = SpringParams {
        rest_length: 3.0,
        stiffness: 2.0,
        damping: 0.5,
    };

    /// Stiffer springs for heavy tree nodes (root mass ~1000)
    pub const TREE: SpringParams = SpringParams {
        rest_length: 2.0,
        stiffness: 40.0,
        damping: 4.0,
    };
}

/// Global knobs of the integrator (per-spring constants live on each spring)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Fixed step rate; one step advances `1 / steps_per_second` seconds
    pub steps_per_second: f32,
    /// Scale of the same-level inverse-square push (tree topology only)
    pub repulsion_strength: f32,
    /// Uniform acceleration added to every point, independent of mass
    pub gravity: Vec3,
    pub bounds: Option<Bounds>,
    /// Squared speed at or below which a point is stopped
    pub sleep_threshold: Option<f32>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            steps_per_second: 60.0,
            repulsion_strength: 1.0,
            gravity: Vec3::ZERO,
            bounds: None,
            sleep_threshold: None,
        }
    }
}

/// Advance the system by one fixed step
///
/// Phases run to completion one after another: springs, same-level repulsion,
/// integration, then the render-facing line and tension buffers.
pub fn step(system: &mut ParticleSystem, config: &PhysicsConfig) {
    apply_spring_forces(system);
    apply_level_repulsion(system, config.repulsion_strength);
    integrate(system, config);
    write_render_buffers(system);
}
