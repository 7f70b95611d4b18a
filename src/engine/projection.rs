use glam::Vec2;

use crate::{
    config::EngineConfig,
    engine::{dda::RayHit, types::Screen},
    renderer::{Rgba, rgb},
    world::{Camera, Texel},
};

/// Screen-space extent of one wall column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    /// Unclipped row of the first wall pixel (may be negative).
    pub top: i32,
    /// Unclipped height in pixels.
    pub height: i32,
    /// Visible rows `y0..y1`, clipped to the viewport.
    pub y0: i32,
    pub y1: i32,
    /// Fisheye-corrected distance, after the minimum clamp.
    pub dist: f32,
    /// Channel multiplier in `[0, 1]`.
    pub shade: f32,
    /// Horizontal texture coordinate in `[0, 1)`.
    pub u: f32,
}

impl WallSlice {
    /// Vertical texture coordinate of screen row `py`: progress down the
    /// unclipped slice, sampled at the pixel centre.
    #[inline]
    pub fn v_at(&self, py: i32) -> f32 {
        ((py - self.top) as f32 + 0.5) / self.height as f32
    }
}

/// Perpendicular distance from `eye` to `hit` for a ray leaving at
/// `ray_angle` while the view axis points along `heading`.
///
/// Multiplying by the cosine of the offset keeps flat walls flat.  The
/// result never drops below `min_dist`.
#[inline]
pub fn corrected_distance(eye: Vec2, hit: Vec2, ray_angle: f32, heading: f32, min_dist: f32) -> f32 {
    let raw = eye.distance(hit);
    (raw * (ray_angle - heading).cos()).max(min_dist)
}

/// Linear falloff: 1 at the eye, 0 from `max_dist` onwards.
#[inline]
pub fn shade_factor(dist: f32, max_dist: f32) -> f32 {
    1.0 - (dist / max_dist).min(1.0)
}

/// Scale the colour channels of `px` by `s`; alpha is dropped.
#[inline]
pub fn shade(px: Texel, s: f32) -> Rgba {
    rgb(
        (px[0] as f32 * s) as u8,
        (px[1] as f32 * s) as u8,
        (px[2] as f32 * s) as u8,
    )
}

/// Unpack a frame-buffer colour back into a texel.
#[inline]
pub fn texel_of(c: Rgba) -> Texel {
    [(c >> 16) as u8, (c >> 8) as u8, c as u8, 0xFF]
}

/// Turn one ray hit into the vertical slice drawn for its column.
pub fn project_column(
    hit: &RayHit,
    eye: Vec2,
    ray_angle: f32,
    heading: f32,
    camera: &Camera,
    screen: &Screen,
    cfg: &EngineConfig,
) -> WallSlice {
    let dist = corrected_distance(eye, hit.pos, ray_angle, heading, cfg.camera.min_distance);
    let height = camera.column_wall_height(dist, cfg.camera.wall_height).max(0);
    let top = screen.mid_y() - height / 2;

    let y0 = top.max(0);
    let y1 = top.saturating_add(height).min(screen.h as i32);

    WallSlice {
        top,
        height,
        y0,
        y1,
        dist,
        shade: shade_factor(dist, cfg.shade.max_shade_distance),
        u: hit.wall_u,
    }
}

/*────────────────────────────── Tests ───────────────────────────────*/
