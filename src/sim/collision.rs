//! Wall collision for the player.
//!
//! Two interchangeable resolvers clamp a desired displacement so the player
//! never ends up inside a solid cell while still sliding along walls:
//!
//! * [`slide_move`] – swept test of the move against the padded boxes of the
//!   solid cells around the player.
//! * [`probe_move`] – per-axis probe rays cast with the grid ray caster.
//!
//! [`resolve`] picks one according to the configuration and applies a final
//! open-cell check on the result.

use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use tracing::debug;

use crate::config::{CollisionStrategy, EngineConfig, StepFormula};
use crate::engine::cast;
use crate::sim::Player;
use crate::world::GridMap;

const NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Re-scans of the neighbour set; clamps only shrink the move, so this
/// settles in two or three passes.
const MAX_PASSES: usize = 4;

/// Smallest probe margin; keeps probe results off the wall's gridline.
const MIN_MARGIN: f32 = 1e-3;

/// Clamp `delta` for `player` with the configured strategy.
pub fn resolve(map: &GridMap, player: &Player, delta: Vec2, cfg: &EngineConfig) -> Vec2 {
    if delta == Vec2::ZERO {
        return delta;
    }
    let d = match cfg.collision {
        CollisionStrategy::NeighborSlide => {
            slide_move(map, player.pos, delta, cfg.movement.wall_padding)
        }
        CollisionStrategy::AxisProbe => probe_move(
            map,
            player.pos,
            delta,
            cfg.movement.probe_margin,
            cfg.step_formula,
        ),
    };
    keep_open(map, player.pos, d)
}

/* ─────────────────────────  NEIGHBOUR SLIDE  ─────────────────────────── */

/// Swept slide against the 8 cells around `pos`.
///
/// Every solid neighbour is inflated by `padding`.  Only faces that border
/// an open cell can be struck; if the move reaches such a face within this
/// step and the other coordinate lies inside the padded span at that moment,
/// the axis is cut so the player stops on the face.  The other axis keeps
/// its motion, which is what makes the player slide.
pub fn slide_move(map: &GridMap, pos: Vec2, delta: Vec2, padding: f32) -> Vec2 {
    let cell = GridMap::cell_of(pos);
    debug_assert!(map.is_open(cell.x, cell.y), "player at {pos} is inside a wall");

    let solid: SmallVec<[IVec2; 8]> = NEIGHBOURS
        .iter()
        .map(|&o| cell + o)
        .filter(|c| map.is_wall(c.x, c.y))
        .collect();

    let mut d = delta;
    for _ in 0..MAX_PASSES {
        let before = d;
        for &c in &solid {
            clip_to_box(map, c, pos, &mut d, padding);
        }
        if d == before {
            break;
        }
    }
    d
}

/// Cut `d` against the padded box of solid cell `c`.
fn clip_to_box(map: &GridMap, c: IVec2, p: Vec2, d: &mut Vec2, padding: f32) {
    let lo = c.as_vec2() - Vec2::splat(padding);
    let hi = c.as_vec2() + Vec2::splat(1.0 + padding);

    // west face, approached moving east
    if d.x > 0.0 && map.is_open(c.x - 1, c.y) {
        let t = (lo.x - p.x) / d.x;
        if (0.0..1.0).contains(&t) && (lo.y..=hi.y).contains(&(p.y + t * d.y)) {
            d.x = lo.x - p.x;
        }
    }
    // east face, moving west
    if d.x < 0.0 && map.is_open(c.x + 1, c.y) {
        let t = (hi.x - p.x) / d.x;
        if (0.0..1.0).contains(&t) && (lo.y..=hi.y).contains(&(p.y + t * d.y)) {
            d.x = hi.x - p.x;
        }
    }
    // south face, moving north
    if d.y > 0.0 && map.is_open(c.x, c.y - 1) {
        let t = (lo.y - p.y) / d.y;
        if (0.0..1.0).contains(&t) && (lo.x..=hi.x).contains(&(p.x + t * d.x)) {
            d.y = lo.y - p.y;
        }
    }
    // north face, moving south
    if d.y < 0.0 && map.is_open(c.x, c.y + 1) {
        let t = (hi.y - p.y) / d.y;
        if (0.0..1.0).contains(&t) && (lo.x..=hi.x).contains(&(p.x + t * d.x)) {
            d.y = hi.y - p.y;
        }
    }
}

/* ───────────────────────────  AXIS PROBE  ────────────────────────────── */

/// Per-axis probe rays.
///
/// The x move is probed first from `pos`, the y move from the x-resolved
/// position.  Each probe reaches `margin` past the desired move; a wall
/// inside that reach pulls the axis back by the overshoot.  An axis is never
/// reversed, only shortened (possibly to zero).
pub fn probe_move(
    map: &GridMap,
    pos: Vec2,
    delta: Vec2,
    margin: f32,
    formula: StepFormula,
) -> Vec2 {
    let margin = margin.max(MIN_MARGIN);

    let dx = probe_axis(map, pos, Vec2::X, delta.x, margin, formula);
    let from = pos + Vec2::new(dx, 0.0);
    let dy = probe_axis(map, from, Vec2::Y, delta.y, margin, formula);
    Vec2::new(dx, dy)
}

/// Allowed travel from `from` along unit `axis` for a wanted signed move `want`.
fn probe_axis(
    map: &GridMap,
    from: Vec2,
    axis: Vec2,
    want: f32,
    margin: f32,
    formula: StepFormula,
) -> f32 {
    if want == 0.0 {
        return 0.0;
    }
    let reach = want + want.signum() * margin;
    let target = from + axis * reach;
    match cast(map, from, target, formula) {
        Some(hit) => {
            let overshoot = (target - hit.pos).dot(axis);
            let allowed = want - overshoot;
            if allowed * want > 0.0 { allowed } else { 0.0 }
        }
        None => want,
    }
}

/* ─────────────────────────────  GUARD  ───────────────────────────────── */

/// Last line of defence for the open-cell invariant: fall back to a single
/// axis, then to standing still.
fn keep_open(map: &GridMap, pos: Vec2, d: Vec2) -> Vec2 {
    for cand in [d, Vec2::new(d.x, 0.0), Vec2::new(0.0, d.y)] {
        if map.is_open_at(pos + cand) {
            if cand != d {
                debug!(%pos, %d, %cand, "resolved move ended in a wall; dropped an axis");
            }
            return cand;
        }
    }
    debug!(%pos, %d, "resolved move ended in a wall; standing still");
    Vec2::ZERO
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    /// Positions inside every open cell, including ones hugging the walls.
    fn open_positions(map: &GridMap) -> Vec<Vec2> {
        let mut out = Vec::new();
        for iy in 0..map.height() as i32 {
            for ix in 0..map.width() as i32 {
                if map.is_wall(ix, iy) {
                    continue;
                }
                for (fx, fy) in [(0.5, 0.5), (0.15, 0.85), (0.85, 0.15), (0.12, 0.12), (0.95, 0.5)] {
                    out.push(Vec2::new(ix as f32 + fx, iy as f32 + fy));
                }
            }
        }
        out
    }

    fn deltas() -> Vec<Vec2> {
        let mut out = Vec::new();
        for i in 0..16 {
            let dir = Vec2::from_angle((i as f32 * 22.5 + 3.0).to_radians());
            for mag in [0.05, 0.3, 0.7, 1.0] {
                out.push(dir * mag);
            }
        }
        out.extend([Vec2::X, Vec2::NEG_Y, Vec2::new(0.7, 0.7)]);
        out
    }

    /// 5×5 with a wall north of (1,1) and one east of it, (2,2) open.
    fn notch() -> GridMap {
        GridMap::from_rows(&["11111", "10001", "11001", "10101", "11111"]).unwrap()
    }

    #[test]
    fn never_ends_inside_a_wall() {
        let map = GridMap::reference();
        for cfg in EngineConfig::default().variants() {
            for pos in open_positions(&map) {
                let player = Player::new(pos, 0.0);
                for d in deltas() {
                    let r = resolve(&map, &player, d, &cfg);
                    assert!(
                        map.is_open_at(pos + r),
                        "{:?}: {pos} + {d} -> {r}",
                        cfg.collision
                    );
                }
            }
        }
    }

    #[test]
    fn resolved_move_never_grows() {
        let map = GridMap::reference();
        for cfg in EngineConfig::default().variants() {
            for pos in open_positions(&map) {
                let player = Player::new(pos, 0.0);
                for d in deltas() {
                    let r = resolve(&map, &player, d, &cfg);
                    assert!(r.x.abs() <= d.x.abs() + 1e-6 && r.y.abs() <= d.y.abs() + 1e-6);
                    assert!(r.x * d.x >= 0.0 && r.y * d.y >= 0.0);
                }
            }
        }
    }

    #[test]
    fn slides_along_wall() {
        // wall (3,2) east of the player; north is open
        let map = GridMap::reference();
        let player = Player::new(Vec2::new(2.5, 2.5), 0.0);
        for cfg in EngineConfig::default().variants() {
            let r = resolve(&map, &player, Vec2::new(0.5, 0.2), &cfg);
            assert!(approx(r, Vec2::new(0.4, 0.2)), "{:?}: {r}", cfg.collision);
        }
    }

    #[test]
    fn free_move_is_untouched() {
        let map = GridMap::reference();
        let player = Player::new(Vec2::new(1.5, 1.5), 0.0);
        for cfg in EngineConfig::default().variants() {
            let d = Vec2::new(0.2, 0.3);
            assert_eq!(resolve(&map, &player, d, &cfg), d);
            assert_eq!(resolve(&map, &player, Vec2::ZERO, &cfg), Vec2::ZERO);
        }
    }

    #[test]
    fn corner_clamp_is_rechecked() {
        // A single pass would clamp only y and leave the player in (2,1).
        let map = notch();
        let player = Player::new(Vec2::new(1.5, 1.5), 0.0);
        for cfg in EngineConfig::default().variants() {
            let r = resolve(&map, &player, Vec2::new(0.5, 0.8), &cfg);
            assert!(approx(r, Vec2::new(0.4, 0.4)), "{:?}: {r}", cfg.collision);
        }
    }

    #[test]
    fn head_on_stops_at_padding() {
        let map = GridMap::reference();
        let r = slide_move(&map, Vec2::new(2.5, 2.5), Vec2::new(0.8, 0.0), 0.1);
        assert!(approx(r, Vec2::new(0.4, 0.0)));
        // already on the padded face: no further progress
        let r = slide_move(&map, Vec2::new(2.9, 2.5), Vec2::new(0.3, 0.0), 0.1);
        assert_eq!(r, Vec2::ZERO);
    }

    #[test]
    fn probe_never_reverses() {
        let map = GridMap::reference();
        // inside the margin of wall (3,2)
        let r = probe_move(
            &map,
            Vec2::new(2.95, 2.5),
            Vec2::new(0.1, 0.0),
            0.1,
            StepFormula::RemainingFraction,
        );
        assert_eq!(r, Vec2::ZERO);
    }

    #[test]
    fn probe_stops_margin_short_of_wall() {
        let map = GridMap::reference();
        let from = Vec2::new(2.5, 2.5);
        for formula in [StepFormula::RemainingFraction, StepFormula::FixedDirection] {
            // (2,1) is open, the border row starts below y = 1
            let r = probe_move(&map, from, Vec2::new(0.0, -1.0), 0.1, formula);
            assert!(approx(r, Vec2::new(0.0, -1.0)));
            let r = probe_move(&map, from, Vec2::new(0.0, -1.5), 0.1, formula);
            assert!(approx(r, Vec2::new(0.0, -1.4)), "{r}");
        }
    }
}
