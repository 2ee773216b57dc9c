use serde::{Deserialize, Serialize};

/// Held movement keys for one player, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Discrete key presses that drive the menus and end screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuKey {
    /// Number row / keypad digit, 0-9.
    Digit(u8),
    Restart,
    Quit,
    Cancel,
}

/// Everything the game reads from the outside world in one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub players: [MoveInput; 2],
    /// Keys that went down this frame. Only the first one that means
    /// something in the current state is acted on.
    pub pressed: Vec<MenuKey>,
    /// The window was closed.
    pub close_requested: bool,
}

impl FrameInput {
    pub fn with_key(key: MenuKey) -> Self {
        Self {
            pressed: vec![key],
            ..Default::default()
        }
    }

    pub fn with_moves(player1: MoveInput, player2: MoveInput) -> Self {
        Self {
            players: [player1, player2],
            ..Default::default()
        }
    }

    pub fn close() -> Self {
        Self {
            close_requested: true,
            ..Default::default()
        }
    }
}
