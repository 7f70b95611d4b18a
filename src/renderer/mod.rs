//! Rendering abstraction layer.
//!
//! *Game logic never touches a pixel buffer directly.*  Each frame it hands a
//! [`Scene`] (map, texture, player pose, effective config) to a type that
//! implements [`Renderer`].
//!
//! * The blanket impl [`RendererExt`] adds `draw_frame` so call-sites stay
//!   short.
//! * [`minimap::draw_minimap`] is a free function so the top-down viewer can
//!   use it on its own buffer.

use crate::{config::EngineConfig, sim::Player, world::{GridMap, Texture}};

pub mod minimap;
pub mod software;

pub use minimap::draw_minimap;
pub use software::Software;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Opaque colour from 8-bit channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Opaque gray.
#[inline]
pub const fn gray(v: u8) -> Rgba {
    rgb(v, v, v)
}

/// Read-only inputs of one frame.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub map: &'a GridMap,
    pub texture: &'a Texture,
    pub player: &'a Player,
    /// Config with the runtime toggles already applied.
    pub cfg: &'a EngineConfig,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure;
/// software callers forward it to their window.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Ray-cast the first-person view into the whole buffer.
    fn draw_view(&mut self, scene: &Scene);

    /// Overlay the top-down map in the top-left corner.
    fn draw_minimap(&mut self, scene: &Scene);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// `submit(&[Rgba], w, h)` is run exactly once per frame, e.g.
    /// `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, scene: &Scene, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_view(scene);
        if scene.cfg.minimap {
            self.draw_minimap(scene);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
