use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::{InputState, Keys, Player};
use crate::config::MovementConfig;

/// Apply turning to `player` and return the displacement the held keys ask
/// for this frame (before collision).
///
/// Left/right turn by `rotate_speed`, or with `STRAFE` held step sideways.
/// Forward/back move along the heading as it stands after turning.  `RUN`
/// scales every step.
pub fn player_input(player: &mut Player, input: &InputState, cfg: &MovementConfig) -> Vec2 {
    let keys = input.held;
    let strafe = keys.contains(Keys::STRAFE);
    let speed = if keys.contains(Keys::RUN) {
        cfg.move_speed * cfg.run_multiplier
    } else {
        cfg.move_speed
    };

    let mut delta = Vec2::ZERO;

    if keys.contains(Keys::TURN_LEFT) {
        if strafe {
            delta += Vec2::from_angle(player.heading + FRAC_PI_2) * speed;
        } else {
            player.heading += cfg.rotate_speed;
        }
    }
    if keys.contains(Keys::TURN_RIGHT) {
        if strafe {
            delta += Vec2::from_angle(player.heading - FRAC_PI_2) * speed;
        } else {
            player.heading -= cfg.rotate_speed;
        }
    }
    player.heading = player.heading.rem_euclid(TAU);

    if keys.contains(Keys::FORWARD) {
        delta += player.forward() * speed;
    }
    if keys.contains(Keys::BACK) {
        delta -= player.forward() * speed;
    }
    delta
}
