pub mod gizmo;
pub mod lines;
pub mod plugin;
pub mod points;
pub mod utils;
