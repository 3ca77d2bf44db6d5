pub mod edge_spring_forces;
pub mod repulsion;

pub use edge_spring_forces::apply_spring_forces;
pub use repulsion::apply_level_repulsion;
