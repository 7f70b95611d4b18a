use bitflags::bitflags;
use tracing::{debug, info};

use super::{InputState, Keys, Player, collision::resolve, systems::player_input};
use crate::config::{EngineConfig, Filter};
use crate::world::GridMap;

bitflags! {
    /// Render toggles the player can flip at runtime.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ViewFlags: u8 {
        const TEXTURED = 1 << 0;
        const BILINEAR = 1 << 1;
        const MINIMAP  = 1 << 2;
    }
}

impl ViewFlags {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        let mut f = Self::empty();
        f.set(Self::TEXTURED, cfg.textured);
        f.set(Self::BILINEAR, cfg.filter == Filter::Bilinear);
        f.set(Self::MINIMAP, cfg.minimap);
        f
    }
}

/// Everything that changes from frame to frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// Pose restored by `reset`.
    pub spawn: Player,
    pub view: ViewFlags,
    pub running: bool,
}

impl GameState {
    pub fn new(spawn: Player, cfg: &EngineConfig) -> Self {
        Self {
            player: spawn,
            spawn,
            view: ViewFlags::from_config(cfg),
            running: true,
        }
    }

    /// Put the player back on the spawn pose.  View toggles are kept.
    pub fn reset(&mut self) {
        self.player = self.spawn;
    }

    pub fn filter(&self) -> Filter {
        if self.view.contains(ViewFlags::BILINEAR) {
            Filter::Bilinear
        } else {
            Filter::Nearest
        }
    }

    /// Copy of `cfg` with the runtime toggles applied.
    pub fn effective_config(&self, cfg: &EngineConfig) -> EngineConfig {
        EngineConfig {
            filter: self.filter(),
            textured: self.view.contains(ViewFlags::TEXTURED),
            minimap: self.view.contains(ViewFlags::MINIMAP),
            ..*cfg
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, input: &InputState, map: &GridMap, cfg: &EngineConfig) {
        let pressed = input.pressed;
        if pressed.contains(Keys::QUIT) {
            info!("quit requested");
            self.running = false;
            return;
        }
        if pressed.contains(Keys::RESET) {
            debug!("reset to spawn");
            self.reset();
        }
        for (key, flag) in [
            (Keys::TOGGLE_TEXTURE, ViewFlags::TEXTURED),
            (Keys::TOGGLE_BILINEAR, ViewFlags::BILINEAR),
            (Keys::TOGGLE_MINIMAP, ViewFlags::MINIMAP),
        ] {
            if pressed.contains(key) {
                self.view.toggle(flag);
                debug!(view = ?self.view, "view toggled");
            }
        }

        let wish = player_input(&mut self.player, input, &cfg.movement);
        let delta = resolve(map, &self.player, wish, cfg);
        self.player.pos += delta;
        debug_assert!(map.is_open_at(self.player.pos));
    }
}
