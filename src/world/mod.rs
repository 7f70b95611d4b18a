mod camera;
mod grid;
mod texture;

pub use camera::Camera;

pub use grid::{Cell, GridMap, MapError, REFERENCE_MAP};

pub use texture::{Texel, Texture, TextureError};
