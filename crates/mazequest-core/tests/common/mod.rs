use std::time::{Duration, Instant};

use mazequest_core::{FrameInput, Game, GameEvent, LevelMap, MazeQuestConfig, MenuKey, MoveInput};

pub const TICK: Duration = Duration::from_millis(16);

/// Synthetic clock that advances one tick per frame.
pub struct Clock {
    base: Instant,
    ticks: u32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            ticks: 0,
        }
    }

    pub fn now(&self) -> Instant {
        self.base + TICK * self.ticks
    }

    pub fn advance(&mut self) -> Instant {
        self.ticks += 1;
        self.now()
    }
}

/// A game plus the clock driving it.
pub struct Session {
    pub game: Game,
    pub clock: Clock,
}

impl Session {
    pub fn on_map(rows: &[&str]) -> Self {
        Self::with_config(rows, MazeQuestConfig::default())
    }

    pub fn with_config(rows: &[&str], config: MazeQuestConfig) -> Self {
        let game = Game::with_level(config, LevelMap::from_rows(rows)).unwrap();
        Self {
            game,
            clock: Clock::new(),
        }
    }

    pub fn press(&mut self, key: MenuKey) -> Vec<GameEvent> {
        let now = self.clock.advance();
        self.game.tick(&FrameInput::with_key(key), now)
    }

    pub fn step(&mut self, p1: MoveInput, p2: MoveInput) -> Vec<GameEvent> {
        let now = self.clock.advance();
        self.game.tick(&FrameInput::with_moves(p1, p2), now)
    }

    /// Step until `done` matches an event, returning everything seen.
    pub fn run_until(
        &mut self,
        p1: MoveInput,
        p2: MoveInput,
        max_ticks: u32,
        done: impl Fn(&GameEvent) -> bool,
    ) -> Vec<GameEvent> {
        let mut seen = Vec::new();
        for _ in 0..max_ticks {
            let events = self.step(p1, p2);
            let hit = events.iter().any(&done);
            seen.extend(events);
            if hit {
                return seen;
            }
        }
        panic!("condition not reached in {max_ticks} ticks, saw {seen:?}");
    }

    pub fn start_solo(&mut self, skin_slot: u8) {
        self.press(MenuKey::Digit(1));
        self.press(MenuKey::Digit(skin_slot));
    }

    pub fn start_coop(&mut self, p1_slot: u8, p2_slot: u8) {
        self.press(MenuKey::Digit(2));
        self.press(MenuKey::Digit(p1_slot));
        self.press(MenuKey::Digit(p2_slot));
    }
}

pub fn idle() -> MoveInput {
    MoveInput::default()
}

pub fn right() -> MoveInput {
    MoveInput {
        right: true,
        ..Default::default()
    }
}

pub fn left() -> MoveInput {
    MoveInput {
        left: true,
        ..Default::default()
    }
}

pub fn jump() -> MoveInput {
    MoveInput {
        jump: true,
        ..Default::default()
    }
}
