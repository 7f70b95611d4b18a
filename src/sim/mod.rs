pub mod collision;
mod components;
mod state;
mod systems;

pub use collision::{probe_move, resolve, slide_move};
pub use components::{InputState, Keys, Player};
pub use state::{GameState, ViewFlags};
pub use systems::player_input;
