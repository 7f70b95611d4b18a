use crate::{config::EngineConfig, renderer::Rgba, sim::Player, world::GridMap};

/// Paint the top-down map into the top-left corner of `frame` (`fw`×`fh`,
/// row-major).
///
/// Each map cell covers `cell_size`² pixels and map row 0 is drawn at the
/// bottom of the block.  Open pixels within `wall_padding` of a solid
/// neighbour (edge or diagonal) get the padding colour, which shows where
/// collision stops the player.  Anything outside `frame` is clipped.
pub fn draw_minimap(
    frame: &mut [Rgba],
    fw: usize,
    fh: usize,
    map: &GridMap,
    player: &Player,
    cfg: &EngineConfig,
) {
    debug_assert_eq!(frame.len(), fw * fh);
    let cs = cfg.minimap_view.cell_size.max(1);
    let pad = cfg.movement.wall_padding;
    let radius = cfg.minimap_view.marker_radius;
    let pal = &cfg.palette;

    let block_w = map.width() * cs;
    let block_h = map.height() * cs;

    for y in 0..block_h {
        let row = block_h - 1 - y;
        if row >= fh {
            continue;
        }
        for x in 0..block_w.min(fw) {
            let wx = x as f32 / cs as f32;
            let wy = y as f32 / cs as f32;
            let (ix, iy) = ((x / cs) as i32, (y / cs) as i32);
            let (fx, fy) = (wx - ix as f32, wy - iy as f32);

            let mut color = if map.cell_checked(ix, iy).is_wall() {
                pal.map_wall
            } else if in_padding(map, ix, iy, fx, fy, pad) {
                pal.map_padding
            } else {
                pal.map_open
            };

            if (wx - player.pos.x).hypot(wy - player.pos.y) <= radius {
                color = pal.map_player;
            }
            frame[row * fw + x] = color;
        }
    }
}

/// Is fractional point (`fx`, `fy`) of open cell (`ix`, `iy`) within `pad`
/// of a solid neighbour?
fn in_padding(map: &GridMap, ix: i32, iy: i32, fx: f32, fy: f32, pad: f32) -> bool {
    let west = fx <= pad;
    let east = fx >= 1.0 - pad;
    let south = fy <= pad;
    let north = fy >= 1.0 - pad;

    (west && map.is_wall(ix - 1, iy))
        || (east && map.is_wall(ix + 1, iy))
        || (south && map.is_wall(ix, iy - 1))
        || (north && map.is_wall(ix, iy + 1))
        || (west && south && map.is_wall(ix - 1, iy - 1))
        || (east && south && map.is_wall(ix + 1, iy - 1))
        || (west && north && map.is_wall(ix - 1, iy + 1))
        || (east && north && map.is_wall(ix + 1, iy + 1))
}
