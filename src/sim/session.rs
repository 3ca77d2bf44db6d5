// sim/session.rs

use bevy::math::Vec3;
use bevy::prelude::Resource;
use rand::Rng;
use std::ops::Range;

use super::config::{SimulationConfig, TopologyConfig};
use crate::particles::{Hierarchy, InvariantViolation, ParticleSystem};
use crate::physics::{self, PhysicsConfig};

/// One running simulation: the particle buffers plus the knobs that drive them
#[derive(Debug, Clone, Resource)]
pub struct ParticleSession {
    system: ParticleSystem,
    config: SimulationConfig,
    physics: PhysicsConfig,
    paused: bool,
    /// Steps taken since the last reset
    steps: u64,
}

impl ParticleSession {
    /// Create a session seeded with the configured initial topology
    pub fn new(config: SimulationConfig, rng: &mut impl Rng) -> Result<Self, InvariantViolation> {
        let mut system = ParticleSystem::new(config.point_capacity, config.edge_capacity);
        if let TopologyConfig::Tree { leaf, root_mass, .. } = config.topology {
            system = system.with_hierarchy(Hierarchy::new(leaf, root_mass));
        }
        Self::seed_system(&mut system, &config, rng)?;

        Ok(ParticleSession {
            system,
            physics: config.physics.to_physics(),
            config,
            paused: false,
            steps: 0,
        })
    }

    /// Populate an empty system with the initial topology
    fn seed_system(
        system: &mut ParticleSystem,
        config: &SimulationConfig,
        rng: &mut impl Rng,
    ) -> Result<(), InvariantViolation> {
        match config.topology {
            TopologyConfig::Flat => {
                let a = system.push_point(Vec3::ZERO, 1.0)?;
                let b = system.push_point(Vec3::new(1.0, 1.0, 0.0), 1.0)?;
                system.push_spring(a, b, config.spring)?;
            }
            TopologyConfig::Tree {
                root_mass,
                initial_points,
                ..
            } => {
                system.push_point(Vec3::ZERO, root_mass)?;
                system.add_points(
                    initial_points,
                    rng,
                    config.spawn.half_extent,
                    config.spring,
                )?;
            }
        }

        physics::write_render_buffers(system);
        Ok(())
    }

    // === Query Methods (for Bevy systems to read state) ===

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    // === Mutation Methods ===

    /// Buffers for renderers that consume the dirty flags
    pub fn system_mut(&mut self) -> &mut ParticleSystem {
        &mut self.system
    }

    /// Fixed-rate tick: steps unless paused
    pub fn tick(&mut self) {
        if !self.paused {
            self.step();
        }
    }

    /// Advance exactly one step, paused or not
    pub fn step(&mut self) {
        physics::step(&mut self.system, &self.physics);
        self.steps += 1;
    }

    /// Toggle pause, returns the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Insert one configured batch of random points
    pub fn add_points(&mut self, rng: &mut impl Rng) -> Result<Range<usize>, InvariantViolation> {
        let added = self.system.add_points(
            self.config.spawn.batch,
            rng,
            self.config.spawn.half_extent,
            self.config.spring,
        )?;
        physics::write_render_buffers(&mut self.system);
        Ok(added)
    }

    /// Throw the topology away and rebuild the initial one in the same buffers
    pub fn reset(&mut self, rng: &mut impl Rng) -> Result<(), InvariantViolation> {
        self.system.clear();
        Self::seed_system(&mut self.system, &self.config, rng)?;
        self.steps = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::PointId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_flat_session_matches_prototype() {
        let mut rng = StdRng::seed_from_u64(0);
        let session = ParticleSession::new(SimulationConfig::original(), &mut rng).unwrap();
        let system = session.system();

        assert_eq!(system.point_count(), 2);
        assert_eq!(system.edge_count(), 1);
        assert_eq!(system.position(PointId(1)), Vec3::new(1.0, 1.0, 0.0));
        assert!(system.hierarchy().is_none());
        assert_eq!(system.tensions()[0], 2.0_f32.sqrt() / 3.0);
    }

    #[test]
    fn test_tree_session_seeds_initial_points() {
        let mut rng = StdRng::seed_from_u64(0);
        let session = ParticleSession::new(SimulationConfig::default(), &mut rng).unwrap();
        let system = session.system();

        // Root + 12 initial points, each wired to its parent
        assert_eq!(system.point_count(), 13);
        assert_eq!(system.edge_count(), 12);
        assert_eq!(system.mass(PointId::ROOT), 1000.0);
    }

    #[test]
    fn test_pause_blocks_tick_but_not_step() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = ParticleSession::new(SimulationConfig::original(), &mut rng).unwrap();

        assert!(session.toggle_pause());
        session.tick();
        assert_eq!(session.steps(), 0);

        session.step();
        assert_eq!(session.steps(), 1);

        assert!(!session.toggle_pause());
        session.tick();
        assert_eq!(session.steps(), 2);
    }

    #[test]
    fn test_add_points_uses_batch() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut config = SimulationConfig::default();
        config.spawn.batch = 4;
        let mut session = ParticleSession::new(config, &mut rng).unwrap();

        let added = session.add_points(&mut rng).unwrap();

        assert_eq!(added, 13..17);
        assert_eq!(session.system().point_count(), 17);
        assert_eq!(session.system().edge_count(), 16);
    }

    #[test]
    fn test_add_points_reports_full_buffers() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut config = SimulationConfig::original();
        config.point_capacity = 3;
        let mut session = ParticleSession::new(config, &mut rng).unwrap();

        assert!(session.add_points(&mut rng).is_ok());
        assert!(session.add_points(&mut rng).is_err());
        assert_eq!(session.system().point_count(), 3);
    }

    #[test]
    fn test_reset_restores_initial_topology() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = ParticleSession::new(SimulationConfig::default(), &mut rng).unwrap();
        session.add_points(&mut rng).unwrap();
        for _ in 0..10 {
            session.step();
        }

        session.reset(&mut rng).unwrap();

        assert_eq!(session.steps(), 0);
        assert_eq!(session.system().point_count(), 13);
        assert_eq!(session.system().edge_count(), 12);
        assert!(session.system().dirty().any());
    }

    #[test]
    fn test_reset_reuses_buffers() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = ParticleSession::new(SimulationConfig::default(), &mut rng).unwrap();
        session.add_points(&mut rng).unwrap();

        session.reset(&mut rng).unwrap();

        let system = session.system();
        assert_eq!(system.point_capacity(), 100);
        assert_eq!(system.edge_capacity(), 1000);
        assert!(system.hierarchy().is_some(), "Tree survives a reset");
        assert!(system.line_vertices()[24..].iter().all(|v| *v == Vec3::ZERO));
    }
}
