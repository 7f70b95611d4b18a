//! Grid ray caster: DDA casting over a 2-D occupancy map, fisheye-corrected
//! column projection, player collision and a software frame-buffer renderer.

pub mod config;
pub mod engine;
pub mod frontend;
pub mod renderer;
pub mod sim;
pub mod world;
