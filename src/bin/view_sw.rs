//! First-person software ray-caster.
//!
//! ```bash
//! cargo run --release -- [--map maze.txt] [--texture wall.png] [--parallel]
//! ```

use anyhow::Context;
use clap::Parser;
use minifb::{Window, WindowOptions};
use std::{path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridcast::{
    config::EngineArgs,
    frontend::{FrameStats, poll_input, present},
    renderer::{RendererExt, Scene, Software},
    sim::{GameState, Player},
    world::{GridMap, Texture},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Text map (`1`/`#` wall, `0`/`.` open); the built-in map otherwise.
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,
    /// Wall texture image; a checkerboard otherwise.
    #[arg(long, value_name = "FILE")]
    texture: Option<PathBuf>,
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u32).range(1..=8192))]
    width: u32,
    #[arg(long, default_value_t = 768, value_parser = clap::value_parser!(u32).range(1..=8192))]
    height: u32,
    /// Frame-rate cap.
    #[arg(long, default_value_t = 60)]
    fps: usize,
    #[command(flatten)]
    engine: EngineArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();
    let cfg = opts.engine.to_config();
    let (w, h) = (opts.width as usize, opts.height as usize);

    let map = match &opts.map {
        Some(path) => GridMap::from_file(path)
            .with_context(|| format!("loading map {}", path.display()))?,
        None => GridMap::reference(),
    };
    let texture = match &opts.texture {
        Some(path) => Texture::from_file(path)
            .with_context(|| format!("loading texture {}", path.display()))?,
        None => {
            info!("no texture given; using checkerboard");
            Texture::default()
        }
    };

    let spawn = Player::spawn();
    map.validate_spawn(spawn.pos).context("spawn point")?;
    info!(w = map.width(), h = map.height(), step_formula = ?cfg.step_formula, collision = ?cfg.collision, "map ready");

    let mut state = GameState::new(spawn, &cfg);
    let mut renderer = Software::default();

    let mut win = Window::new("gridcast", w, h, WindowOptions::default())?;
    win.set_target_fps(opts.fps);

    let mut stats = FrameStats::default();

    while win.is_open() && state.running {
        let t0 = Instant::now();

        let input = poll_input(&win);
        state.update(&input, &map, &cfg);
        if !state.running {
            break;
        }

        let frame_cfg = state.effective_config(&cfg);
        let scene = Scene {
            map: &map,
            texture: &texture,
            player: &state.player,
            cfg: &frame_cfg,
        };

        let mut shown = Ok(());
        renderer.draw_frame(w, h, &scene, |fb, fw, fh| {
            stats.record(t0.elapsed());
            shown = present(&mut win, fb, fw, fh);
        });
        shown?;
    }
    Ok(())
}
