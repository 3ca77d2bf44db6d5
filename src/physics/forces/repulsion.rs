use bevy::math::Vec3;

use crate::particles::ParticleSystem;

/// Inverse-square push between points that share a tree level
///
/// Each point accumulates the push from all of its live same-level peers, so a
/// pair is visited once from each side. Does nothing without a hierarchy.
///
/// Suspect: the two-sided visit may be an artifact of the nested loop rather
/// than an intended doubling. Kept until confirmed.
pub fn apply_level_repulsion(system: &mut ParticleSystem, strength: f32) {
    let Some(tree) = system.hierarchy().copied() else {
        return;
    };
    let count = system.point_count;

    for i in 1..count {
        let peers = tree.level_range(tree.level(i));
        let position = system.positions[i];
        let mut force = Vec3::ZERO;

        for j in peers.start..peers.end.min(count) {
            if j == i {
                continue;
            }

            let diff = position - system.positions[j];
            let distance_sq = diff.length_squared();
            let direction = diff / distance_sq.sqrt();
            force += direction * (strength / distance_sq);
        }

        system.accelerations[i] += force;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{Hierarchy, PointId};

    fn tree(positions: &[Vec3]) -> ParticleSystem {
        let tree = Hierarchy::new(3, 1000.0);
        let mut system = ParticleSystem::new(positions.len(), positions.len()).with_hierarchy(tree);
        for (i, &p) in positions.iter().enumerate() {
            system.push_point(p, tree.mass_for(i)).unwrap();
        }
        system
    }

    #[test]
    fn test_same_level_pair_is_symmetric() {
        let mut system = tree(&[
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ]);

        apply_level_repulsion(&mut system, 1.0);

        let a = system.acceleration(PointId(1));
        let b = system.acceleration(PointId(2));

        assert_eq!(a, -b, "Equal magnitude, opposite direction");
        assert_eq!(a, Vec3::new(-0.25, 0.0, 0.0), "1 / d^2 away from the peer");
    }

    #[test]
    fn test_root_and_other_levels_are_ignored() {
        // Root sits right next to point 1; level 2 point sits next to point 3
        let mut system = tree(&[
            Vec3::new(-1.1, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(0.0, -10.1, 0.0),
        ]);

        apply_level_repulsion(&mut system, 1.0);

        assert_eq!(system.acceleration(PointId::ROOT), Vec3::ZERO);
        // Point 4 is alone on level 2
        assert_eq!(system.acceleration(PointId(4)), Vec3::ZERO);

        // Point 1 only feels points 2 and 3, both far away
        assert!(system.acceleration(PointId(1)).length() < 0.02);
    }

    #[test]
    fn test_strength_scales_force() {
        let positions = [Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 2.0)];
        let mut weak = tree(&positions);
        let mut strong = tree(&positions);

        apply_level_repulsion(&mut weak, 1.0);
        apply_level_repulsion(&mut strong, 3.0);

        assert_eq!(
            strong.acceleration(PointId(1)),
            weak.acceleration(PointId(1)) * 3.0
        );
    }

    #[test]
    fn test_flat_system_has_no_repulsion() {
        let mut system = ParticleSystem::new(2, 0);
        system.push_point(Vec3::ZERO, 1.0).unwrap();
        system.push_point(Vec3::X, 1.0).unwrap();

        apply_level_repulsion(&mut system, 1.0);

        assert!(system.accelerations().iter().all(|a| *a == Vec3::ZERO));
    }
}
