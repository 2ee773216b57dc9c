//! The single place the keyboard is read.
//!
//! Player 1 moves with A/D and jumps with W, player 2 uses the arrow keys.
//! Digits pick the mode and skins, Escape backs out of skin selection, and
//! R / Q restart or quit from the end screens.

use macroquad::prelude::{KeyCode, is_key_down, is_key_pressed, is_quit_requested};

use mazequest_core::{FrameInput, MenuKey, MoveInput};

struct MoveKeys {
    left: KeyCode,
    right: KeyCode,
    jump: KeyCode,
}

const PLAYER_KEYS: [MoveKeys; 2] = [
    MoveKeys {
        left: KeyCode::A,
        right: KeyCode::D,
        jump: KeyCode::W,
    },
    MoveKeys {
        left: KeyCode::Left,
        right: KeyCode::Right,
        jump: KeyCode::Up,
    },
];

/// Number row and keypad key for each digit.
const DIGIT_KEYS: [(KeyCode, KeyCode); 10] = [
    (KeyCode::Key0, KeyCode::Kp0),
    (KeyCode::Key1, KeyCode::Kp1),
    (KeyCode::Key2, KeyCode::Kp2),
    (KeyCode::Key3, KeyCode::Kp3),
    (KeyCode::Key4, KeyCode::Kp4),
    (KeyCode::Key5, KeyCode::Kp5),
    (KeyCode::Key6, KeyCode::Kp6),
    (KeyCode::Key7, KeyCode::Kp7),
    (KeyCode::Key8, KeyCode::Kp8),
    (KeyCode::Key9, KeyCode::Kp9),
];

fn held(keys: &MoveKeys) -> MoveInput {
    MoveInput {
        left: is_key_down(keys.left),
        right: is_key_down(keys.right),
        jump: is_key_down(keys.jump),
    }
}

/// Snapshot of held movement keys plus this frame's discrete presses.
pub fn poll() -> FrameInput {
    let mut pressed = Vec::new();
    for (digit, (row, pad)) in DIGIT_KEYS.iter().enumerate() {
        if is_key_pressed(*row) || is_key_pressed(*pad) {
            pressed.push(MenuKey::Digit(digit as u8));
        }
    }
    if is_key_pressed(KeyCode::Escape) {
        pressed.push(MenuKey::Cancel);
    }
    if is_key_pressed(KeyCode::R) {
        pressed.push(MenuKey::Restart);
    }
    if is_key_pressed(KeyCode::Q) {
        pressed.push(MenuKey::Quit);
    }

    FrameInput {
        players: [held(&PLAYER_KEYS[0]), held(&PLAYER_KEYS[1])],
        pressed,
        close_requested: is_quit_requested(),
    }
}
