//! Per-frame core: grid ray casting and column projection.

pub mod dda;
pub mod projection;
pub mod types;

pub use dda::{RayHit, Side, cast, step_budget};
pub use projection::{WallSlice, corrected_distance, project_column, shade, shade_factor};
pub use types::Screen;
