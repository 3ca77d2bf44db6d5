use bevy::math::Vec3;
use rand::Rng;
use std::ops::Range;

use super::error::InvariantViolation;
use super::hierarchy::Hierarchy;
use super::point::PointId;
use super::spring::{Spring, SpringParams};

/// Which render-facing buffers changed since the last upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub positions: bool,
    pub tensions: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.positions || self.tensions
    }
}

/// Point masses and springs in fixed-capacity buffers
///
/// Every buffer is allocated once in [`ParticleSystem::new`]. Only the first
/// `point_count` / `edge_count` entries are live; the line-vertex and tension
/// buffers always span `2 * edge_capacity` slots so the renderer can upload
/// them as-is.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    pub(crate) accelerations: Vec<Vec3>,
    pub(crate) masses: Vec<f32>,
    pub(crate) springs: Vec<Spring>,
    /// Two vertices per spring, in spring order
    pub(crate) line_vertices: Vec<Vec3>,
    /// One tension value per line vertex
    pub(crate) tensions: Vec<f32>,
    pub(crate) point_count: usize,
    pub(crate) edge_count: usize,
    hierarchy: Option<Hierarchy>,
    pub(crate) dirty: DirtyFlags,
}

impl ParticleSystem {
    /// Create an empty system with unconnected insertion
    pub fn new(point_capacity: usize, edge_capacity: usize) -> Self {
        ParticleSystem {
            positions: vec![Vec3::ZERO; point_capacity],
            velocities: vec![Vec3::ZERO; point_capacity],
            accelerations: vec![Vec3::ZERO; point_capacity],
            masses: vec![1.0; point_capacity],
            springs: vec![Spring::default(); edge_capacity],
            line_vertices: vec![Vec3::ZERO; edge_capacity * 2],
            tensions: vec![0.0; edge_capacity * 2],
            point_count: 0,
            edge_count: 0,
            hierarchy: None,
            dirty: DirtyFlags::default(),
        }
    }

    /// Lay an implicit tree over the point indices
    ///
    /// Enables parent wiring and mass decay in [`add_points`](Self::add_points)
    /// and same-level repulsion in the physics step.
    pub fn with_hierarchy(mut self, hierarchy: Hierarchy) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    // === Query Methods ===

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    pub fn point_capacity(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_capacity(&self) -> usize {
        self.springs.len()
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.point_count == 0
    }

    /// Live positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions[..self.point_count]
    }

    #[allow(dead_code)]
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities[..self.point_count]
    }

    #[allow(dead_code)]
    pub fn accelerations(&self) -> &[Vec3] {
        &self.accelerations[..self.point_count]
    }

    pub fn masses(&self) -> &[f32] {
        &self.masses[..self.point_count]
    }

    /// Live springs in insertion order
    #[allow(dead_code)]
    pub fn springs(&self) -> &[Spring] {
        &self.springs[..self.edge_count]
    }

    /// Full-capacity line-vertex buffer (`2 * edge_capacity`)
    pub fn line_vertices(&self) -> &[Vec3] {
        &self.line_vertices
    }

    /// Full-capacity tension buffer (`2 * edge_capacity`)
    pub fn tensions(&self) -> &[f32] {
        &self.tensions
    }

    pub fn position(&self, point: PointId) -> Vec3 {
        self.positions[point.index()]
    }

    #[allow(dead_code)]
    pub fn velocity(&self, point: PointId) -> Vec3 {
        self.velocities[point.index()]
    }

    #[allow(dead_code)]
    pub fn acceleration(&self, point: PointId) -> Vec3 {
        self.accelerations[point.index()]
    }

    pub fn mass(&self, point: PointId) -> f32 {
        self.masses[point.index()]
    }

    /// Total momentum `sum(mass * velocity)` over live points
    #[cfg(test)]
    pub fn momentum(&self) -> Vec3 {
        self.masses()
            .iter()
            .zip(self.velocities())
            .map(|(&m, &v)| v * m)
            .sum()
    }

    #[allow(dead_code)]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Read and clear the dirty flags
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = DirtyFlags {
            positions: true,
            tensions: true,
        };
    }

    // === Mutation Methods ===

    /// Append a point at rest
    pub fn push_point(&mut self, position: Vec3, mass: f32) -> Result<PointId, InvariantViolation> {
        self.ensure_point_room(1)?;

        let id = PointId(self.point_count);
        self.positions[id.index()] = position;
        self.velocities[id.index()] = Vec3::ZERO;
        self.accelerations[id.index()] = Vec3::ZERO;
        self.masses[id.index()] = mass;
        self.point_count += 1;
        self.dirty.positions = true;

        Ok(id)
    }

    /// Append a spring between two live points, returns its index
    pub fn push_spring(
        &mut self,
        a: PointId,
        b: PointId,
        params: SpringParams,
    ) -> Result<usize, InvariantViolation> {
        for endpoint in [a, b] {
            if endpoint.index() >= self.point_count {
                return Err(InvariantViolation::EndpointOutOfRange {
                    endpoint,
                    point_count: self.point_count,
                });
            }
        }
        self.ensure_edge_room(1)?;

        let index = self.edge_count;
        self.springs[index] = Spring::new(a, b, params);
        self.edge_count += 1;
        self.write_line(index);

        Ok(index)
    }

    /// Append `count` points at random positions inside `[-half_extent, half_extent]^3`
    ///
    /// With a hierarchy each new point is wired to its parent with `params` and
    /// gets the mass of its level; without one points are unconnected with mass 1.
    /// Nothing is mutated when the request does not fit.
    pub fn add_points(
        &mut self,
        count: usize,
        rng: &mut impl Rng,
        half_extent: f32,
        params: SpringParams,
    ) -> Result<Range<usize>, InvariantViolation> {
        let start = self.point_count;
        let new_springs = match self.hierarchy {
            // The root has no parent
            Some(_) if start == 0 => count.saturating_sub(1),
            Some(_) => count,
            None => 0,
        };

        self.ensure_point_room(count)?;
        self.ensure_edge_room(new_springs)?;

        for index in start..start + count {
            let position = Vec3::new(
                rng.random_range(-half_extent..=half_extent),
                rng.random_range(-half_extent..=half_extent),
                rng.random_range(-half_extent..=half_extent),
            );
            let mass = self.hierarchy.map_or(1.0, |tree| tree.mass_for(index));

            let id = self.push_point(position, mass)?;
            if let Some(parent) = self.hierarchy.and_then(|tree| tree.parent(id)) {
                self.push_spring(parent, id, params)?;
            }
        }

        log::debug!(
            "Added {} points ({} live, {} springs)",
            count,
            self.point_count,
            self.edge_count
        );

        Ok(start..start + count)
    }

    /// Drop every point and spring, keeping the allocations
    pub fn clear(&mut self) {
        self.positions.fill(Vec3::ZERO);
        self.velocities.fill(Vec3::ZERO);
        self.accelerations.fill(Vec3::ZERO);
        self.masses.fill(1.0);
        self.springs.fill(Spring::default());
        self.line_vertices.fill(Vec3::ZERO);
        self.tensions.fill(0.0);
        self.point_count = 0;
        self.edge_count = 0;
        self.mark_dirty();
    }

    #[cfg(test)]
    pub fn set_velocity(&mut self, point: PointId, velocity: Vec3) {
        self.velocities[point.index()] = velocity;
    }

    /// Refresh the render slots of one spring from current positions
    pub(crate) fn write_line(&mut self, index: usize) {
        let spring = self.springs[index];
        let start = self.positions[spring.a.index()];
        let end = self.positions[spring.b.index()];
        let tension = spring.tension(start.distance(end));

        self.line_vertices[index * 2] = start;
        self.line_vertices[index * 2 + 1] = end;
        self.tensions[index * 2] = tension;
        self.tensions[index * 2 + 1] = tension;
        self.mark_dirty();
    }

    fn ensure_point_room(&self, additional: usize) -> Result<(), InvariantViolation> {
        // An overflowing request can never fit
        let requested = self.point_count.saturating_add(additional);
        if requested > self.point_capacity() {
            log::warn!(
                "Rejected point insertion: {} requested, capacity {}",
                requested,
                self.point_capacity()
            );
            return Err(InvariantViolation::PointCapacityExceeded {
                capacity: self.point_capacity(),
                requested,
            });
        }
        Ok(())
    }

    fn ensure_edge_room(&self, additional: usize) -> Result<(), InvariantViolation> {
        let requested = self.edge_count.saturating_add(additional);
        if requested > self.edge_capacity() {
            log::warn!(
                "Rejected spring insertion: {} requested, capacity {}",
                requested,
                self.edge_capacity()
            );
            return Err(InvariantViolation::EdgeCapacityExceeded {
                capacity: self.edge_capacity(),
                requested,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tree_system(points: usize, edges: usize) -> ParticleSystem {
        let mut system =
            ParticleSystem::new(points, edges).with_hierarchy(Hierarchy::new(3, 1000.0));
        system.push_point(Vec3::ZERO, 1000.0).unwrap();
        system
    }

    #[test]
    fn test_buffers_allocated_once() {
        let system = ParticleSystem::new(100, 1000);

        assert_eq!(system.point_capacity(), 100);
        assert_eq!(system.edge_capacity(), 1000);
        assert_eq!(system.line_vertices().len(), 2000);
        assert_eq!(system.tensions().len(), 2000);
        assert_eq!(system.point_count(), 0);
        assert!(system.positions().is_empty());
    }

    #[test]
    fn test_push_point_and_spring() {
        let mut system = ParticleSystem::new(4, 4);

        let a = system.push_point(Vec3::ZERO, 1.0).unwrap();
        let b = system.push_point(Vec3::new(1.0, 1.0, 0.0), 2.0).unwrap();
        assert_eq!(a, PointId(0));
        assert_eq!(b, PointId(1));

        let index = system.push_spring(a, b, SpringParams::default()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(system.edge_count(), 1);
        assert_eq!(system.mass(b), 2.0);

        // Render slots are populated immediately
        assert_eq!(system.line_vertices()[0], Vec3::ZERO);
        assert_eq!(system.line_vertices()[1], Vec3::new(1.0, 1.0, 0.0));
        let expected = 2.0_f32.sqrt() / 3.0;
        assert_eq!(system.tensions()[0], expected);
        assert_eq!(system.tensions()[1], expected);
    }

    #[test]
    fn test_duplicate_springs_allowed() {
        let mut system = ParticleSystem::new(2, 4);
        let a = system.push_point(Vec3::ZERO, 1.0).unwrap();
        let b = system.push_point(Vec3::X, 1.0).unwrap();

        system.push_spring(a, b, SpringParams::default()).unwrap();
        system.push_spring(a, b, SpringParams::default()).unwrap();

        assert_eq!(system.edge_count(), 2);
    }

    #[test]
    fn test_spring_endpoint_must_be_live() {
        let mut system = ParticleSystem::new(4, 4);
        system.push_point(Vec3::ZERO, 1.0).unwrap();

        let err = system
            .push_spring(PointId(0), PointId(1), SpringParams::default())
            .unwrap_err();

        assert_eq!(
            err,
            InvariantViolation::EndpointOutOfRange {
                endpoint: PointId(1),
                point_count: 1,
            }
        );
        assert_eq!(system.edge_count(), 0);
    }

    #[test]
    fn test_point_capacity_enforced() {
        let mut system = ParticleSystem::new(1, 1);
        system.push_point(Vec3::ZERO, 1.0).unwrap();

        assert!(matches!(
            system.push_point(Vec3::ONE, 1.0),
            Err(InvariantViolation::PointCapacityExceeded {
                capacity: 1,
                requested: 2
            })
        ));
        assert_eq!(system.point_count(), 1);
    }

    #[test]
    fn test_add_points_wires_parents() {
        let mut system = tree_system(100, 1000);
        let mut rng = StdRng::seed_from_u64(7);

        let points_before = system.point_count();
        let edges_before = system.edge_count();
        let added = system
            .add_points(10, &mut rng, 5.0, SpringParams::default())
            .unwrap();

        assert_eq!(added, 1..11);
        assert_eq!(system.point_count(), points_before + 10);
        assert_eq!(system.edge_count(), edges_before + 10);

        for (spring, index) in system.springs().iter().zip(added) {
            assert_eq!(spring.b, PointId(index));
            assert_eq!(spring.a, PointId((index - 1) / 3));
            assert!(spring.a.index() < index);
        }
    }

    #[test]
    fn test_add_points_assigns_level_mass() {
        let mut system = tree_system(20, 20);
        let mut rng = StdRng::seed_from_u64(1);
        system
            .add_points(12, &mut rng, 5.0, SpringParams::default())
            .unwrap();

        assert!((system.mass(PointId(1)) - 333.333_33).abs() < 1e-3);
        assert!((system.mass(PointId(3)) - 333.333_33).abs() < 1e-3);
        assert!((system.mass(PointId(4)) - 111.111_11).abs() < 1e-3);
        assert!((system.mass(PointId(12)) - 111.111_11).abs() < 1e-3);
    }

    #[test]
    fn test_add_points_stays_inside_spawn_cube() {
        let mut system = ParticleSystem::new(50, 0);
        let mut rng = StdRng::seed_from_u64(42);
        system
            .add_points(50, &mut rng, 5.0, SpringParams::default())
            .unwrap();

        assert_eq!(system.edge_count(), 0, "Flat insertion adds no springs");
        for p in system.positions() {
            assert!(p.abs().max_element() <= 5.0);
        }
        assert!(system.masses().iter().all(|&m| m == 1.0));
    }

    #[test]
    fn test_add_points_from_empty_tree_starts_at_root() {
        let mut system =
            ParticleSystem::new(10, 10).with_hierarchy(Hierarchy::new(3, 1000.0));
        let mut rng = StdRng::seed_from_u64(3);

        system
            .add_points(4, &mut rng, 1.0, SpringParams::default())
            .unwrap();

        assert_eq!(system.point_count(), 4);
        assert_eq!(system.edge_count(), 3);
        assert_eq!(system.mass(PointId::ROOT), 1000.0);
    }

    #[test]
    fn test_add_points_is_all_or_nothing() {
        let mut system = tree_system(5, 100);
        let mut rng = StdRng::seed_from_u64(9);

        let err = system
            .add_points(5, &mut rng, 5.0, SpringParams::default())
            .unwrap_err();

        assert!(matches!(
            err,
            InvariantViolation::PointCapacityExceeded { capacity: 5, .. }
        ));
        assert_eq!(system.point_count(), 1);
        assert_eq!(system.edge_count(), 0);

        // Edge capacity is checked too
        let mut system = tree_system(100, 2);
        assert!(matches!(
            system.add_points(3, &mut rng, 5.0, SpringParams::default()),
            Err(InvariantViolation::EdgeCapacityExceeded { .. })
        ));
        assert_eq!(system.point_count(), 1);
    }

    #[test]
    fn test_huge_request_rejected_without_wrapping() {
        let mut system = tree_system(100, 1000);
        let mut rng = StdRng::seed_from_u64(2);

        let err = system
            .add_points(usize::MAX, &mut rng, 5.0, SpringParams::default())
            .unwrap_err();

        assert_eq!(
            err,
            InvariantViolation::PointCapacityExceeded {
                capacity: 100,
                requested: usize::MAX,
            }
        );
        assert_eq!(system.point_count(), 1);
        assert_eq!(system.edge_count(), 0);
    }

    #[test]
    fn test_clear_resets_counts() {
        let mut system = tree_system(20, 20);
        let mut rng = StdRng::seed_from_u64(5);
        system
            .add_points(6, &mut rng, 5.0, SpringParams::default())
            .unwrap();
        system.take_dirty();

        system.clear();

        assert_eq!(system.point_count(), 0);
        assert_eq!(system.edge_count(), 0);
        assert!(system.tensions().iter().all(|&t| t == 0.0));
        assert!(system.dirty().any());
    }

    #[test]
    fn test_take_dirty_clears_flags() {
        let mut system = ParticleSystem::new(2, 1);
        system.push_point(Vec3::ZERO, 1.0).unwrap();

        assert!(system.take_dirty().positions);
        assert!(!system.dirty().any());
    }
}
