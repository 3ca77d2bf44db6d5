use bevy::math::Vec3;

use crate::particles::ParticleSystem;
use crate::physics::PhysicsConfig;

/// Axis-aligned box that points bounce off
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
    /// Fraction of the normal speed kept after a bounce
    pub restitution: f32,
}

impl Bounds {
    /// Mirror a point that left the box back inside and flip the crossing velocity component
    pub fn reflect(&self, position: &mut Vec3, velocity: &mut Vec3) {
        for axis in 0..3 {
            if position[axis] < self.min[axis] {
                position[axis] = 2.0 * self.min[axis] - position[axis];
                velocity[axis] *= -self.restitution;
            } else if position[axis] > self.max[axis] {
                position[axis] = 2.0 * self.max[axis] - position[axis];
                velocity[axis] *= -self.restitution;
            }
        }
    }
}

/// Semi-implicit Euler over every live point, then clear the accumulators
pub fn integrate(system: &mut ParticleSystem, config: &PhysicsConfig) {
    let steps_per_second = config.steps_per_second;

    for i in 0..system.point_count {
        let acceleration = system.accelerations[i] / system.masses[i] + config.gravity;

        system.velocities[i] += acceleration / steps_per_second;
        let velocity = system.velocities[i];
        system.positions[i] += velocity / steps_per_second;

        if let Some(bounds) = &config.bounds {
            bounds.reflect(&mut system.positions[i], &mut system.velocities[i]);
        }

        if let Some(threshold) = config.sleep_threshold {
            if system.velocities[i].length_squared() <= threshold {
                system.velocities[i] = Vec3::ZERO;
            }
        }

        system.accelerations[i] = Vec3::ZERO;
    }

    system.dirty.positions = true;
}
