use bitflags::bitflags;
use glam::{IVec2, Vec2};

use crate::world::GridMap;

/// Player pose in map units.  `heading` is in radians, 0 = east,
/// counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub heading: f32,
}

impl Player {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self { pos, heading }
    }

    /// Fixed start pose used at startup and on reset.
    pub fn spawn() -> Self {
        Self::new(Vec2::new(2.0, 2.0), 90_f32.to_radians())
    }

    /// Unit vector along the heading.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Unit vector 90° counter-clockwise from the heading.
    #[inline]
    pub fn left(&self) -> Vec2 {
        self.forward().perp()
    }

    #[inline]
    pub fn cell(&self) -> IVec2 {
        GridMap::cell_of(self.pos)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn()
    }
}

bitflags! {
    /// Logical keys the engine reacts to.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Keys: u16 {
        const TURN_LEFT       = 1 << 0;
        const TURN_RIGHT      = 1 << 1;
        const FORWARD         = 1 << 2;
        const BACK            = 1 << 3;
        // Turns left/right into sideways steps.
        const STRAFE          = 1 << 4;
        const RUN             = 1 << 5;
        const RESET           = 1 << 6;
        const TOGGLE_TEXTURE  = 1 << 7;
        const TOGGLE_BILINEAR = 1 << 8;
        const TOGGLE_MINIMAP  = 1 << 9;
        const QUIT            = 1 << 10;
    }
}

/// Key state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Keys currently down.
    pub held: Keys,
    /// Keys that went down this frame (edge-trigger).
    pub pressed: Keys,
}

impl InputState {
    pub fn holding(held: Keys) -> Self {
        Self {
            held,
            pressed: Keys::empty(),
        }
    }

    pub fn pressing(pressed: Keys) -> Self {
        Self {
            held: pressed,
            pressed,
        }
    }
}
