//! Backend-agnostic description of what to draw for the current state.
//!
//! The game produces a [`Screen`] every frame and the client turns it into
//! draw calls. Rectangles in a [`Frame`] are already in screen space.

use serde::{Deserialize, Serialize};

use crate::character::Pose;
use crate::game::{GameMode, PlayerSlot};
use crate::geometry::Rect;
use crate::skin::Skin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const SKY_BLUE: Rgb = Rgb::new(135, 206, 235);
    pub const GRAY: Rgb = Rgb::new(100, 100, 100);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const PURPLE: Rgb = Rgb::new(128, 0, 128);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// What a drawable is, which decides how the client paints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Platform,
    Hazard,
    MovingHazard,
    Finish,
    Player { slot: PlayerSlot, skin: Skin, pose: Pose },
}

impl Visual {
    /// Solid fill for world geometry. Players are drawn from sprites.
    pub fn fill_color(&self) -> Option<Rgb> {
        match self {
            Visual::Platform => Some(Rgb::GRAY),
            Visual::Hazard => Some(Rgb::RED),
            Visual::MovingHazard => Some(Rgb::PURPLE),
            Visual::Finish => Some(Rgb::YELLOW),
            Visual::Player { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub rect: Rect,
    pub visual: Visual,
}

/// Overlay in the top-left corner while playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub time: String,
    pub retries: u32,
}

impl Hud {
    pub fn time_line(&self) -> String {
        format!("Time: {}", self.time)
    }

    pub fn retries_line(&self) -> String {
        format!("Retries: {}", self.retries)
    }
}

/// One gameplay frame, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub background: Rgb,
    pub drawables: Vec<Drawable>,
    pub hud: Hud,
}

impl Frame {
    pub fn players(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables
            .iter()
            .filter(|d| matches!(d.visual, Visual::Player { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSize {
    Large,
    Menu,
    Body,
}

impl TextSize {
    pub fn points(self) -> u16 {
        match self {
            TextSize::Large => 72,
            TextSize::Menu => 48,
            TextSize::Body => 36,
        }
    }
}

/// A horizontally centered line of text. `offset_y` is relative to the
/// vertical middle of the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub size: TextSize,
    pub color: Rgb,
    pub offset_y: i32,
}

impl TextLine {
    fn new(text: impl Into<String>, size: TextSize, color: Rgb, offset_y: i32) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            offset_y,
        }
    }
}

pub const END_SCREEN_INSTRUCTIONS: &str = "Press 'R' to Restart or 'Q' to Quit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    MainMenu,
    /// The client lays out the eight skin previews itself.
    SkinSelect { player: PlayerSlot },
    Playing(Frame),
    /// Formatted finish times, one per player in the session.
    LevelComplete { mode: GameMode, times: Vec<String> },
    GameOver,
}

impl Screen {
    pub fn background(&self) -> Rgb {
        match self {
            Screen::MainMenu | Screen::SkinSelect { .. } => Rgb::WHITE,
            Screen::Playing(frame) => frame.background,
            Screen::LevelComplete { .. } => Rgb::SKY_BLUE,
            Screen::GameOver => Rgb::BLACK,
        }
    }

    /// Centered text for the menu and end screens. Empty while playing.
    pub fn text(&self) -> Vec<TextLine> {
        match self {
            Screen::MainMenu => vec![
                TextLine::new("1. Solo Mode", TextSize::Menu, Rgb::BLACK, -50),
                TextLine::new("2. Coop Mode", TextSize::Menu, Rgb::BLACK, 0),
            ],
            Screen::SkinSelect { player } => vec![TextLine::new(
                format!("Player {}: Select Skin", player.number()),
                TextSize::Menu,
                Rgb::BLACK,
                -200,
            )],
            Screen::Playing(_) => Vec::new(),
            Screen::LevelComplete { mode, times } => {
                let mut lines = vec![TextLine::new("Level Completed!", TextSize::Large, Rgb::BLACK, -150)];
                match mode {
                    GameMode::Solo => {
                        if let Some(time) = times.first() {
                            lines.push(TextLine::new(format!("Your Time: {time}"), TextSize::Body, Rgb::BLACK, -50));
                        }
                    },
                    GameMode::Coop => {
                        for (i, time) in times.iter().enumerate() {
                            lines.push(TextLine::new(
                                format!("Player {} Time: {time}", i + 1),
                                TextSize::Body,
                                Rgb::BLACK,
                                -50 + 50 * i as i32,
                            ));
                        }
                    },
                }
                lines.push(TextLine::new(END_SCREEN_INSTRUCTIONS, TextSize::Body, Rgb::BLACK, 100));
                lines
            },
            Screen::GameOver => vec![
                TextLine::new("GAME OVER", TextSize::Large, Rgb::RED, -50),
                TextLine::new(END_SCREEN_INSTRUCTIONS, TextSize::Body, Rgb::WHITE, 50),
            ],
        }
    }
}
