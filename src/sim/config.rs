use bevy::math::Vec3;
use serde::Deserialize;

use crate::particles::SpringParams;
use crate::physics::{Bounds, PhysicsConfig, presets};

const SIMULATION_JSON: &str = include_str!("../../assets/simulation.json");

/// Which renderer consumes the particle buffers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Line-list mesh with a tension attribute + sphere meshes
    #[default]
    Mesh,
    /// Immediate-mode gizmo lines and spheres, redrawn every frame
    Gizmos,
}

/// How points are connected and weighted
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TopologyConfig {
    /// Two linked points; new points arrive unconnected with mass 1
    Flat,
    /// Implicit tree: new points hang off their parent, mass shrinks by `leaf` per level
    Tree {
        leaf: usize,
        root_mass: f32,
        /// Points inserted below the root at startup and after a reset
        #[serde(default)]
        initial_points: usize,
    },
}

impl Default for TopologyConfig {
    fn default() -> Self {
        TopologyConfig::Tree {
            leaf: 3,
            root_mass: 1000.0,
            initial_points: 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundsConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
    #[serde(default = "default_restitution")]
    pub restitution: f32,
}

fn default_restitution() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub steps_per_second: f32,
    pub repulsion_strength: f32,
    pub gravity: [f32; 3],
    pub bounds: Option<BoundsConfig>,
    pub sleep_threshold: Option<f32>,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        let physics = PhysicsConfig::default();
        PhysicsSettings {
            steps_per_second: physics.steps_per_second,
            repulsion_strength: physics.repulsion_strength,
            gravity: physics.gravity.to_array(),
            bounds: None,
            sleep_threshold: None,
        }
    }
}

impl PhysicsSettings {
    pub fn to_physics(&self) -> PhysicsConfig {
        PhysicsConfig {
            steps_per_second: self.steps_per_second,
            repulsion_strength: self.repulsion_strength,
            gravity: Vec3::from_array(self.gravity),
            bounds: self.bounds.map(|b| Bounds {
                min: Vec3::from_array(b.min),
                max: Vec3::from_array(b.max),
                restitution: b.restitution,
            }),
            sleep_threshold: self.sleep_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// New points land inside `[-half_extent, half_extent]^3`
    pub half_extent: f32,
    /// Points added per keypress
    pub batch: usize,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        SpawnSettings {
            half_extent: 5.0,
            batch: 1,
        }
    }
}

/// Everything tunable about one run
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub renderer: RendererKind,
    pub point_capacity: usize,
    pub edge_capacity: usize,
    pub topology: TopologyConfig,
    /// Constants given to every spring the simulation creates
    pub spring: SpringParams,
    pub physics: PhysicsSettings,
    pub spawn: SpawnSettings,
    /// Sphere radius of a unit-mass point (scaled by `mass^(1/3)`)
    pub point_size: f32,
    pub line_alpha: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            renderer: RendererKind::default(),
            point_capacity: 100,
            edge_capacity: 1000,
            topology: TopologyConfig::default(),
            spring: presets::TREE,
            physics: PhysicsSettings::default(),
            spawn: SpawnSettings::default(),
            point_size: 0.04,
            line_alpha: 1.0,
        }
    }
}

impl SimulationConfig {
    /// The flat two-point setup of the first prototype
    #[allow(dead_code)]
    pub fn original() -> Self {
        SimulationConfig {
            topology: TopologyConfig::Flat,
            spring: presets::ORIGINAL,
            point_size: 0.08,
            ..Default::default()
        }
    }

    /// Load the configuration embedded from `assets/simulation.json`
    pub fn load() -> Result<Self, String> {
        Self::from_json(SIMULATION_JSON)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: SimulationConfig =
            serde_json::from_str(json).map_err(|e| format!("Invalid simulation config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.point_capacity == 0 || self.edge_capacity == 0 {
            return Err(format!(
                "Capacities must be non-zero, got {} points / {} springs",
                self.point_capacity, self.edge_capacity
            ));
        }
        if self.spawn.batch > self.point_capacity {
            return Err(format!(
                "Spawn batch {} exceeds point capacity {}",
                self.spawn.batch, self.point_capacity
            ));
        }
        if !(self.physics.steps_per_second > 0.0 && self.physics.steps_per_second.is_finite()) {
            return Err(format!(
                "steps_per_second must be positive, got {}",
                self.physics.steps_per_second
            ));
        }
        if self.spring.rest_length <= 0.0 {
            return Err(format!(
                "rest_length must be positive, got {}",
                self.spring.rest_length
            ));
        }
        if self.spawn.half_extent < 0.0 {
            return Err(format!(
                "half_extent must not be negative, got {}",
                self.spawn.half_extent
            ));
        }
        if let Some(bounds) = &self.physics.bounds {
            if (0..3).any(|axis| bounds.min[axis] > bounds.max[axis]) {
                return Err(format!(
                    "bounds min {:?} exceeds max {:?}",
                    bounds.min, bounds.max
                ));
            }
        }

        let (points, springs) = match self.topology {
            TopologyConfig::Flat => (2, 1),
            TopologyConfig::Tree {
                leaf,
                root_mass,
                initial_points,
            } => {
                if leaf < 2 {
                    return Err(format!("Tree branching factor must be >= 2, got {}", leaf));
                }
                if root_mass <= 0.0 {
                    return Err(format!("root_mass must be positive, got {}", root_mass));
                }
                (initial_points.saturating_add(1), initial_points)
            }
        };

        if points > self.point_capacity || springs > self.edge_capacity {
            return Err(format!(
                "Initial topology needs {} points / {} springs, capacity is {} / {}",
                points, springs, self.point_capacity, self.edge_capacity
            ));
        }

        Ok(())
    }
}
