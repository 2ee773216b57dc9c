pub mod camera;
pub mod character;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod hazard;
pub mod input;
pub mod level;
pub mod scene;
pub mod skin;
pub mod time;

pub use config::MazeQuestConfig;
pub use game::{Game, GameEvent, GameMode, GameState, PlayerSlot};
pub use input::{FrameInput, MenuKey, MoveInput};
pub use level::{Level, LevelMap};
pub use scene::Screen;
