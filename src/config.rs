//! Engine tunables.
//!
//! Everything the per-frame pipeline reads lives in one [`EngineConfig`]
//! that is built once at startup (defaults + CLI overrides) and then only
//! borrowed.  The three algorithm selectors derive [`clap::ValueEnum`] so the
//! binaries can expose them directly as flags.

use clap::{Args, ValueEnum};

use crate::renderer::{Rgba, gray, rgb};

/// How the DDA expresses the distance to the next gridline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StepFormula {
    /// `t` is a fraction of the *remaining* segment, recomputed every step.
    #[default]
    RemainingFraction,
    /// `t` is a fraction of the whole origin → target segment.
    FixedDirection,
}

/// Texture sampling mode used by the column renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    #[default]
    Nearest,
    Bilinear,
}

/// Which collision resolver moves the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CollisionStrategy {
    /// Swept test against the padded boxes of the 8 neighbour cells.
    #[default]
    NeighborSlide,
    /// Short per-axis probe rays.
    AxisProbe,
}

/// Pinhole camera / projection constants (map units unless noted).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    /// Horizontal field of view in radians.
    pub hfov: f32,
    /// Width of the virtual film plane.
    pub film_width: f32,
    pub wall_height: f32,
    /// Length of every view ray; bounds the cast instead of a step counter.
    pub max_distance: f32,
    /// Corrected distances are clamped to at least this value.
    pub min_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            hfov: 90_f32.to_radians(),
            film_width: 0.01,
            wall_height: 1.0,
            max_distance: 1000.0,
            min_distance: 1e-3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeConfig {
    /// Distance at which walls fade to black.
    pub max_shade_distance: f32,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            max_shade_distance: 8.0,
        }
    }
}

/// Per-frame movement constants.  The simulation is frame-locked, so speeds
/// are expressed per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementConfig {
    pub move_speed: f32,
    pub run_multiplier: f32,
    /// Radians per frame.
    pub rotate_speed: f32,
    /// Inflation of every solid cell used by the slide resolver.
    pub wall_padding: f32,
    /// Distance the probe resolver keeps between the player and a wall.
    pub probe_margin: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.04,
            run_multiplier: 1.5,
            rotate_speed: 5_f32.to_radians(),
            wall_padding: 0.1,
            probe_margin: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapConfig {
    /// Screen pixels per map cell.
    pub cell_size: usize,
    /// Player marker radius in map units.
    pub marker_radius: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            cell_size: 40,
            marker_radius: 0.05,
        }
    }
}

/// Flat colours used wherever no texture is sampled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub sky: Rgba,
    pub floor: Rgba,
    /// Columns whose ray hits nothing.
    pub background: Rgba,
    /// Above/below the wall when texturing is off.
    pub untextured_fill: Rgba,
    pub untextured_wall: Rgba,
    pub map_open: Rgba,
    pub map_wall: Rgba,
    pub map_padding: Rgba,
    pub map_player: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: rgb(90, 110, 140),
            floor: rgb(70, 60, 50),
            background: gray(150),
            untextured_fill: gray(150),
            untextured_wall: gray(220),
            map_open: gray(150),
            map_wall: gray(220),
            map_padding: rgb(150, 180, 150),
            map_player: rgb(255, 0, 0),
        }
    }
}

/// One parameterised engine: every knob the pipeline reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub step_formula: StepFormula,
    /// Initial filter; the bilinear toggle flips it at runtime.
    pub filter: Filter,
    pub collision: CollisionStrategy,
    /// Initial texture toggle.
    pub textured: bool,
    /// Initial minimap toggle.
    pub minimap: bool,
    /// Run the column pass on the rayon pool.
    pub parallel: bool,
    pub camera: CameraConfig,
    pub shade: ShadeConfig,
    pub movement: MovementConfig,
    pub minimap_view: MinimapConfig,
    pub palette: Palette,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_formula: StepFormula::default(),
            filter: Filter::default(),
            collision: CollisionStrategy::default(),
            textured: true,
            minimap: false,
            parallel: false,
            camera: CameraConfig::default(),
            shade: ShadeConfig::default(),
            movement: MovementConfig::default(),
            minimap_view: MinimapConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl EngineConfig {
    /// Every combination of the three algorithm selectors, on top of `self`.
    pub fn variants(&self) -> impl Iterator<Item = EngineConfig> + '_ {
        StepFormula::value_variants().iter().flat_map(move |&step_formula| {
            Filter::value_variants().iter().flat_map(move |&filter| {
                CollisionStrategy::value_variants()
                    .iter()
                    .map(move |&collision| EngineConfig {
                        step_formula,
                        filter,
                        collision,
                        ..*self
                    })
            })
        })
    }
}

/// Engine flags shared by the binaries (`#[command(flatten)]`).
#[derive(Args, Clone, Debug)]
pub struct EngineArgs {
    /// How the DDA measures the distance to the next gridline.
    #[arg(long, value_enum, default_value_t = StepFormula::default())]
    pub step_formula: StepFormula,
    /// Initial texture filter (toggle with B).
    #[arg(long, value_enum, default_value_t = Filter::default())]
    pub filter: Filter,
    /// Collision resolver.
    #[arg(long, value_enum, default_value_t = CollisionStrategy::default())]
    pub collision: CollisionStrategy,
    /// Horizontal field of view in degrees.
    #[arg(long, value_name = "DEGREES", default_value_t = 90.0)]
    pub fov: f32,
    /// Render columns on the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,
    /// Start with flat-shaded walls (toggle with T).
    #[arg(long)]
    pub untextured: bool,
    /// Start with the minimap shown (toggle with Tab).
    #[arg(long)]
    pub minimap: bool,
}

impl EngineArgs {
    /// Defaults with these flags applied.
    pub fn to_config(&self) -> EngineConfig {
        let mut cfg = EngineConfig {
            step_formula: self.step_formula,
            filter: self.filter,
            collision: self.collision,
            textured: !self.untextured,
            minimap: self.minimap,
            parallel: self.parallel,
            ..EngineConfig::default()
        };
        cfg.camera.hfov = self.fov.clamp(1.0, 179.0).to_radians();
        cfg
    }
}
