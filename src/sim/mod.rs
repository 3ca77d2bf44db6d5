pub mod config;
pub mod session;

pub use config::{RendererKind, SimulationConfig, TopologyConfig};
pub use session::ParticleSession;
