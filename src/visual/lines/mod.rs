pub mod material;
pub mod sync;

pub use material::TensionLineMaterialPlugin;
pub use sync::{spawn_tension_lines, sync_tension_lines};
