use crate::particles::ParticleSystem;

/// Hookean springs plus per-endpoint drag, accumulated into the acceleration buffer
///
/// Positions and velocities are only read here, so the result does not depend on
/// spring order. Mass is applied later during integration.
pub fn apply_spring_forces(system: &mut ParticleSystem) {
    for index in 0..system.edge_count {
        let spring = system.springs[index];
        let (a, b) = (spring.a.index(), spring.b.index());

        // Points from b towards a
        let diff = system.positions[a] - system.positions[b];
        let distance = diff.length();
        let direction = diff / distance;

        // F = k * (d - rest): positive when stretched
        let extension = distance - spring.params.rest_length;
        let spring_force = direction * (extension * spring.params.stiffness);

        // Drag opposes each endpoint's own velocity, not the relative one
        let damping_a = system.velocities[a] * -spring.params.damping;
        let damping_b = system.velocities[b] * -spring.params.damping;

        system.accelerations[a] += -spring_force + damping_a;
        system.accelerations[b] += spring_force + damping_b;
    }
}
