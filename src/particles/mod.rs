mod error;
mod hierarchy;
mod point;
mod spring;
mod system;

pub use error::InvariantViolation;
pub use hierarchy::Hierarchy;
pub use point::PointId;
pub use spring::{Spring, SpringParams};
pub use system::{DirtyFlags, ParticleSystem};
