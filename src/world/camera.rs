use crate::config::CameraConfig;

/// Pinhole camera over a virtual film plane.
///
/// * Screen column `x` maps to a point on the film, and the ray through it
///   leaves the eye at `atan2(film_x, focal)` from the view axis.
/// * Positive offsets point **left** of the view direction (CCW positive,
///   matching the player heading).
/// * Heights are projected onto the film and scaled to pixels through the
///   film-to-screen ratio.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    film_w: f32,
    film_h: f32,
    focal: f32,
    screen_w: usize,
    screen_h: usize,
}

impl Camera {
    /// Build the film model for a `screen_w`×`screen_h` viewport.
    ///
    /// ```text
    /// focal  = (film_w / 2) / tan(hfov / 2)
    /// film_h = film_w * screen_h / screen_w
    /// ```
    pub fn new(cfg: &CameraConfig, screen_w: usize, screen_h: usize) -> Self {
        let screen_w = screen_w.max(1);
        let screen_h = screen_h.max(1);
        let film_w = cfg.film_width;
        Self {
            film_w,
            film_h: film_w * screen_h as f32 / screen_w as f32,
            focal: film_w * 0.5 / (cfg.hfov * 0.5).tan(),
            screen_w,
            screen_h,
        }
    }

    #[inline]
    pub fn focal(&self) -> f32 {
        self.focal
    }

    #[inline]
    pub fn film_height(&self) -> f32 {
        self.film_h
    }

    /// Angle between the view axis and the ray through the centre of
    /// column `x`.
    #[inline]
    pub fn offset_angle(&self, x: usize) -> f32 {
        let sx = self.film_w * 0.5 - (x as f32 + 0.5) * (self.film_w / self.screen_w as f32);
        sx.atan2(self.focal)
    }

    /// World-space heading of the ray through column `x`.
    #[inline]
    pub fn ray_angle(&self, heading: f32, x: usize) -> f32 {
        heading + self.offset_angle(x)
    }

    /// On-screen height in pixels of a wall `wall_height` tall seen at
    /// perpendicular distance `dist`.  The caller clamps `dist` away from 0.
    #[inline]
    pub fn column_wall_height(&self, dist: f32, wall_height: f32) -> i32 {
        debug_assert!(dist > 0.0, "projected distance must be positive");
        let on_film = self.focal * wall_height / dist;
        (on_film / self.film_h * self.screen_h as f32) as i32
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
