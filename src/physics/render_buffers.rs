use crate::particles::ParticleSystem;

/// Copy spring endpoints into the line-vertex buffer and refresh both tension slots
pub fn write_render_buffers(system: &mut ParticleSystem) {
    for index in 0..system.edge_count {
        system.write_line(index);
    }
    system.mark_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{PointId, SpringParams};
    use bevy::math::Vec3;

    #[test]
    fn test_lines_follow_points() {
        let mut system = ParticleSystem::new(3, 2);
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y] {
            system.push_point(p, 1.0).unwrap();
        }
        system
            .push_spring(PointId(0), PointId(1), SpringParams::default())
            .unwrap();
        system
            .push_spring(PointId(2), PointId(0), SpringParams::default())
            .unwrap();

        system.positions[0] = Vec3::new(0.0, 0.0, 6.0);
        system.take_dirty();
        write_render_buffers(&mut system);

        let lines = system.line_vertices();
        assert_eq!(lines[0], Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(lines[1], Vec3::X);
        assert_eq!(lines[2], Vec3::Y);
        assert_eq!(lines[3], Vec3::new(0.0, 0.0, 6.0));

        let dirty = system.take_dirty();
        assert!(dirty.positions && dirty.tensions);
    }

    #[test]
    fn test_unused_slots_untouched() {
        let mut system = ParticleSystem::new(2, 3);
        system.push_point(Vec3::ZERO, 1.0).unwrap();
        system.push_point(Vec3::splat(2.0), 1.0).unwrap();
        system
            .push_spring(PointId(0), PointId(1), SpringParams::default())
            .unwrap();

        write_render_buffers(&mut system);

        assert!(system.line_vertices()[2..].iter().all(|v| *v == Vec3::ZERO));
        assert!(system.tensions()[2..].iter().all(|t| *t == 0.0));
    }
}
