//! ---------------------------------------------------------------------------
//! Software (CPU) ray-casting column renderer
//!
//! * Fills a frame-buffer in **0xAARRGGBB** format.
//! * Columns are independent: each is rendered into its own contiguous
//!   strip of a column-major scratch buffer, optionally on the rayon pool,
//!   then transposed into the row-major frame.
//! ---------------------------------------------------------------------------

use glam::Vec2;
use rayon::prelude::*;

use crate::{
    engine::{Screen, cast, project_column, projection::texel_of, shade},
    renderer::{Renderer, Rgba, Scene, draw_minimap},
    world::Camera,
};

/// Frame clear colour, visible only if a pass leaves pixels untouched.
const CLEAR: Rgba = 0xFF_202020;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    /// Column-major: column `x` is `columns[x * height..(x + 1) * height]`.
    columns: Vec<Rgba>,
    /// Row-major frame handed to `end_frame`.
    frame: Vec<Rgba>,
    width: usize,
    height: usize,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.columns.resize(w * h, 0);
            self.frame.resize(w * h, 0);
        }
        self.frame.fill(CLEAR);
    }

    fn draw_view(&mut self, scene: &Scene) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }
        let camera = Camera::new(&scene.cfg.camera, w, h);
        let screen = Screen::new(w, h);

        if scene.cfg.parallel {
            self.columns
                .par_chunks_mut(h)
                .enumerate()
                .for_each(|(x, col)| render_column(scene, &camera, &screen, x, col));
        } else {
            self.columns
                .chunks_mut(h)
                .enumerate()
                .for_each(|(x, col)| render_column(scene, &camera, &screen, x, col));
        }

        for (x, col) in self.columns.chunks(h).enumerate() {
            for (y, &px) in col.iter().enumerate() {
                self.frame[y * w + x] = px;
            }
        }
    }

    fn draw_minimap(&mut self, scene: &Scene) {
        draw_minimap(
            &mut self.frame,
            self.width,
            self.height,
            scene.map,
            scene.player,
            scene.cfg,
        );
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.frame, self.width, self.height);
    }
}

/*──────────────────────── column rendering ───────────────────────────*/

/// Cast, project and paint screen column `x` into `col` (top row first).
fn render_column(scene: &Scene, camera: &Camera, screen: &Screen, x: usize, col: &mut [Rgba]) {
    let cfg = scene.cfg;
    let pal = &cfg.palette;
    let eye = scene.player.pos;
    let heading = scene.player.heading;

    let a = camera.ray_angle(heading, x);
    let target = eye + Vec2::from_angle(a) * cfg.camera.max_distance;

    let Some(hit) = cast(scene.map, eye, target, cfg.step_formula) else {
        col.fill(pal.background);
        return;
    };

    let slice = project_column(&hit, eye, a, heading, camera, screen, cfg);
    let (y0, y1) = (slice.y0 as usize, slice.y1 as usize);

    if cfg.textured {
        col[..y0].fill(pal.sky);
        col[y1..].fill(pal.floor);
        for (py, px) in (slice.y0..slice.y1).zip(&mut col[y0..y1]) {
            let texel = scene.texture.sample(slice.u, slice.v_at(py), cfg.filter);
            *px = shade(texel, slice.shade);
        }
    } else {
        col.fill(pal.untextured_fill);
        col[y0..y1].fill(shade(texel_of(pal.untextured_wall), slice.shade));
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{EngineConfig, Filter},
        renderer::RendererExt,
        sim::Player,
        world::{GridMap, Texture},
    };

    const W: usize = 64;
    const H: usize = 48;

    fn render(cfg: &EngineConfig) -> Vec<Rgba> {
        let map = GridMap::reference();
        let texture = Texture::default();
        let player = Player::spawn();
        let scene = Scene {
            map: &map,
            texture: &texture,
            player: &player,
            cfg,
        };
        let mut sw = Software::default();
        let mut out = Vec::new();
        sw.draw_frame(W, H, &scene, |fb, w, h| {
            assert_eq!((w, h), (W, H));
            out = fb.to_vec();
        });
        out
    }

    #[test]
    fn parallel_matches_serial() {
        for cfg in EngineConfig::default().variants() {
            let serial = render(&cfg);
            let parallel = render(&EngineConfig { parallel: true, ..cfg });
            assert_eq!(serial, parallel);
        }
    }

    #[test]
    fn textured_column_has_sky_wall_floor() {
        // spawn looks north down an open corridor: the wall is 5 cells away
        let cfg = EngineConfig::default();
        let fb = render(&cfg);
        let x = W / 2;
        assert_eq!(fb[x], cfg.palette.sky);
        assert_eq!(fb[(H - 1) * W + x], cfg.palette.floor);
        let mid = fb[H / 2 * W + x];
        assert_ne!(mid, cfg.palette.sky);
        assert_ne!(mid, cfg.palette.floor);
        assert!(!fb.contains(&CLEAR));
    }

    #[test]
    fn untextured_walls_are_flat() {
        let cfg = EngineConfig {
            textured: false,
            ..EngineConfig::default()
        };
        let fb = render(&cfg);
        let x = W / 2;
        assert_eq!(fb[x], cfg.palette.untextured_fill);
        assert_eq!(fb[(H - 1) * W + x], cfg.palette.untextured_fill);
        let mid = fb[H / 2 * W + x];
        assert_ne!(mid, cfg.palette.untextured_fill);
        // shading darkens but keeps the gray
        let [r, g, b, _] = texel_of(mid);
        assert!(r == g && g == b && r < 220);
    }

    #[test]
    fn misses_fill_background() {
        let mut cfg = EngineConfig::default();
        cfg.camera.max_distance = 0.5;
        let fb = render(&cfg);
        assert!(fb.iter().all(|&px| px == cfg.palette.background));
    }

    #[test]
    fn filter_changes_pixels_not_layout() {
        let near = render(&EngineConfig::default());
        let bil = render(&EngineConfig {
            filter: Filter::Bilinear,
            ..EngineConfig::default()
        });
        let sky = EngineConfig::default().palette.sky;
        for (a, b) in near.iter().zip(&bil) {
            assert_eq!(*a == sky, *b == sky);
        }
    }

    #[test]
    fn minimap_is_drawn_only_when_enabled() {
        let cfg = EngineConfig::default();
        let plain = render(&cfg);
        let with_map = render(&EngineConfig { minimap: true, ..cfg });
        // top-left screen pixel shows the top-left map cell, a wall
        assert_eq!(with_map[0], cfg.palette.map_wall);
        assert_ne!(plain[0], cfg.palette.map_wall);
    }
}
