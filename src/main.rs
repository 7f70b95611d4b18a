//! Top-down grid viewer.
//!
//! Shows the whole map with the player, the collision padding band and the
//! view rays as the caster sees them.  Movement and collision are the same
//! as in `view_sw`.
//!
//! ```bash
//! cargo run --release --bin gridcast -- [--map maze.txt] [--cell 64]
//! ```

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Window, WindowOptions};
use std::{path::PathBuf, time::Instant};
use tracing_subscriber::EnvFilter;

use gridcast::{
    config::{EngineArgs, EngineConfig},
    engine::cast,
    frontend::{FrameStats, poll_input, present},
    renderer::{Rgba, draw_minimap, rgb},
    sim::{GameState, Player},
    world::{Camera, GridMap},
};

const RAY_COLOUR: Rgba = rgb(255, 220, 0);
/// Rays drawn across the field of view.
const RAY_COUNT: usize = 32;
/// Player marker radius in cells, twice the corner overlay's.
const MARKER_RADIUS: f32 = 0.1;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Text map; the built-in map otherwise.
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,
    /// Pixels per map cell.
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(4..=256))]
    cell: u32,
    #[command(flatten)]
    engine: EngineArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ─────────── parse CLI & load map ───────────
    let opts = Opts::parse();
    let mut cfg = opts.engine.to_config();
    cfg.minimap_view.cell_size = opts.cell as usize;
    cfg.minimap_view.marker_radius = MARKER_RADIUS;

    let map = match &opts.map {
        Some(path) => GridMap::from_file(path)
            .with_context(|| format!("loading map {}", path.display()))?,
        None => GridMap::reference(),
    };
    let spawn = Player::spawn();
    map.validate_spawn(spawn.pos).context("spawn point")?;

    let cs = cfg.minimap_view.cell_size;
    let (w, h) = (map.width() * cs, map.height() * cs);
    let mut buffer = vec![0u32; w * h];
    let mut state = GameState::new(spawn, &cfg);

    // ─────────── show window ────────────
    let mut window = Window::new("gridcast map", w, h, WindowOptions::default())?;
    window.set_target_fps(60);
    let mut stats = FrameStats::default();

    while window.is_open() && state.running {
        let t0 = Instant::now();
        let input = poll_input(&window);
        state.update(&input, &map, &cfg);

        draw_minimap(&mut buffer, w, h, &map, &state.player, &cfg);
        draw_rays(&mut buffer, w, h, &map, &state.player, &cfg);

        stats.record(t0.elapsed());
        present(&mut window, &buffer, w, h)?;
    }
    Ok(())
}

/// Trace a fan of view rays from the player to their wall hits.
fn draw_rays(buf: &mut [Rgba], w: usize, h: usize, map: &GridMap, player: &Player, cfg: &EngineConfig) {
    let cs = cfg.minimap_view.cell_size as f32;
    let to_screen = |p: Vec2| -> (i32, i32) { ((p.x * cs) as i32, h as i32 - 1 - (p.y * cs) as i32) };

    let camera = Camera::new(&cfg.camera, RAY_COUNT, 1);
    let (x0, y0) = to_screen(player.pos);
    for x in 0..RAY_COUNT {
        let a = camera.ray_angle(player.heading, x);
        let target = player.pos + Vec2::from_angle(a) * cfg.camera.max_distance;
        if let Some(hit) = cast(map, player.pos, target, cfg.step_formula) {
            let (x1, y1) = to_screen(hit.pos);
            draw_line(buf, w, h, x0, y0, x1, y1, RAY_COLOUR);
        }
    }
}

/// Integer Bresenham line‑drawing algorithm.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    buf: &mut [Rgba],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: Rgba,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            buf[y0 as usize * w + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
