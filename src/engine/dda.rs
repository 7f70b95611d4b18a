//! Grid ray caster (Digital Differential Analyzer).
//!
//! The ray is marched gridline by gridline from `origin` towards `target`.
//! Every iteration measures the parametric distance to the next vertical
//! (`x = k`) and the next horizontal (`y = k`) gridline and steps across the
//! nearer one, so each iteration moves into exactly one new cell.
//!
//! ### Rules
//! * **Tie-break** – when both gridlines are equally far the vertical one is
//!   crossed first.  At an exact lattice corner the non-stepped coordinate
//!   then lands on its gridline as well and the ray enters the diagonal cell.
//! * **Gridline start** – a coordinate lying exactly on a gridline while the
//!   ray moves in the negative direction belongs to the cell *below* it.
//!   This holds for the origin and after every step.  An origin on the face
//!   of a wall it points into hits that wall at distance zero.
//! * **Range** – the march stops with no hit once it reaches the target cell
//!   or once the next gridline lies beyond the target point.
//! * **Budget** – at most `W + H + 2` iterations; from an open cell every
//!   iteration advances one column or row, so the border is always reached
//!   first.

use glam::{IVec2, Vec2};
use tracing::warn;

use crate::config::StepFormula;
use crate::world::GridMap;

/// Which kind of gridline the ray crossed into the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A line of constant x (east/west face).
    Vertical,
    /// A line of constant y (north/south face).
    Horizontal,
}

/// First solid cell struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point, on the boundary of `cell`.
    pub pos: Vec2,
    /// Fractional position along the struck face, in `[0, 1)`.
    pub wall_u: f32,
    /// The wall cell.
    pub cell: IVec2,
    pub side: Side,
}

/// Upper bound on march iterations for `map`.
#[inline]
pub fn step_budget(map: &GridMap) -> usize {
    map.width() + map.height() + 2
}

/// Cell index of coordinate `c` for a ray moving with sign `d`.
#[inline]
fn cell_along(c: f32, d: f32) -> i32 {
    let f = c.floor();
    if c == f && d < 0.0 { f as i32 - 1 } else { f as i32 }
}

/// Next gridline strictly ahead of `c` when moving with sign `d`.
#[inline]
fn next_line(c: f32, d: f32) -> Option<f32> {
    if d > 0.0 {
        let w = c.ceil();
        Some(if w == c { w + 1.0 } else { w })
    } else if d < 0.0 {
        let w = c.floor();
        Some(if w == c { w - 1.0 } else { w })
    } else {
        None
    }
}

/// Next gridline ahead of `c` and the parametric distance `t` to it along
/// `d`; `t` is infinite when the ray does not move on this axis.
#[inline]
fn crossing(c: f32, d: f32) -> (f32, f32) {
    match next_line(c, d) {
        Some(w) => (w, (w - c) / d),
        None => (c, f32::INFINITY),
    }
}

/// Cast a ray from `origin` towards `target`.
///
/// `origin` must lie in an open cell; `target` may be anywhere, including
/// outside the map.  An origin on a gridline whose far side is solid reports
/// an immediate hit at `origin`.  Returns `None` when nothing solid lies between the two.
pub fn cast(map: &GridMap, origin: Vec2, target: Vec2, formula: StepFormula) -> Option<RayHit> {
    march(map, origin, target, formula).0
}

/// [`cast`] plus the number of gridlines crossed.
pub(crate) fn march(
    map: &GridMap,
    origin: Vec2,
    target: Vec2,
    formula: StepFormula,
) -> (Option<RayHit>, usize) {
    let dir = target - origin;
    debug_assert!(dir != Vec2::ZERO, "zero-length ray at {origin}");

    let home = GridMap::cell_of(origin);
    debug_assert!(
        map.is_open(home.x, home.y),
        "ray origin {origin} lies in solid cell {home}"
    );

    let mut pos = origin;
    let mut cell = IVec2::new(cell_along(pos.x, dir.x), cell_along(pos.y, dir.y));
    if map.is_wall(cell.x, cell.y) {
        // Origin sits on the face of a wall the ray points into.
        let side = if cell.x != home.x || cell.y == home.y {
            Side::Vertical
        } else {
            Side::Horizontal
        };
        let wall_u = match side {
            Side::Vertical => pos.y - pos.y.floor(),
            Side::Horizontal => pos.x - pos.x.floor(),
        };
        let hit = RayHit {
            pos,
            wall_u,
            cell,
            side,
        };
        return (Some(hit), 0);
    }

    let end_cell = GridMap::cell_of(target);
    // Share of the whole segment already covered (fixed-direction only).
    let mut covered = 0.0_f32;
    let budget = step_budget(map);

    for step in 0..budget {
        let d = match formula {
            StepFormula::RemainingFraction => target - pos,
            StepFormula::FixedDirection => dir,
        };

        let (wall_x, tx) = crossing(pos.x, d.x);
        let (wall_y, ty) = crossing(pos.y, d.y);

        if tx == f32::INFINITY && ty == f32::INFINITY {
            return (None, step);
        }

        let limit = match formula {
            StepFormula::RemainingFraction => 1.0,
            StepFormula::FixedDirection => 1.0 - covered,
        };
        let t = tx.min(ty);
        if t > limit {
            return (None, step);
        }
        covered += t;

        let side = if tx <= ty {
            pos = Vec2::new(wall_x, pos.y + tx * d.y);
            cell.x += if d.x > 0.0 { 1 } else { -1 };
            cell.y = cell_along(pos.y, d.y);
            Side::Vertical
        } else {
            pos = Vec2::new(pos.x + ty * d.x, wall_y);
            cell.y += if d.y > 0.0 { 1 } else { -1 };
            cell.x = cell_along(pos.x, d.x);
            Side::Horizontal
        };

        if map.is_wall(cell.x, cell.y) {
            let wall_u = match side {
                Side::Vertical => pos.y - pos.y.floor(),
                Side::Horizontal => pos.x - pos.x.floor(),
            };
            let hit = RayHit {
                pos,
                wall_u,
                cell,
                side,
            };
            return (Some(hit), step + 1);
        }

        if cell == end_cell {
            return (None, step + 1);
        }
    }

    warn!(%origin, %target, budget, "ray exhausted its step budget");
    (None, budget)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
