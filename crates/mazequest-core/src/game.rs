//! Top-level state machine: menu, skin selection, play, and the end screens.
//!
//! [`Game::tick`] is the only place input is consumed. The client polls the
//! keyboard once per frame, hands the snapshot over, and draws whatever
//! [`Game::screen`] describes afterwards.

use std::collections::HashMap;
use std::time::Instant;

use glam::Vec2;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::character::{Character, DeathCause};
use crate::config::MazeQuestConfig;
use crate::error::{LevelError, SkinError};
use crate::geometry::Rect;
use crate::input::{FrameInput, MenuKey};
use crate::level::{Level, LevelMap};
use crate::scene::{Drawable, Frame, Hud, Rgb, Screen, Visual};
use crate::skin::Skin;
use crate::time::{Timer, format_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// 1-based number shown to players.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Solo,
    Coop,
}

impl GameMode {
    pub fn player_count(self) -> usize {
        match self {
            GameMode::Solo => 1,
            GameMode::Coop => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Menu,
    CharacterSelect { player: PlayerSlot },
    Playing,
    LevelComplete,
    GameOver,
    /// Terminal. The client closes the window once it sees this.
    Exited,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ModeSelected(GameMode),
    SkinSelected { player: PlayerSlot, skin: Skin },
    SelectionCancelled,
    PlayingStarted,
    PlayerFinished { player: PlayerSlot, time: f64 },
    PlayerDied { player: PlayerSlot, cause: DeathCause },
    Respawned { retries_left: u32 },
    GameOver,
    LevelComplete { times: Vec<f64> },
    Restarted,
    Quit,
}

/// One session of the game, from the main menu to quitting.
pub struct Game {
    config: MazeQuestConfig,
    state: GameState,
    mode: Option<GameMode>,
    level: Level,
    camera: Camera,
    timer: Timer,
    players: Vec<Character>,
    skins: [Option<Skin>; 2],
    finish_times: [Option<f64>; 2],
    retries_left: u32,
    body_sizes: HashMap<Skin, Vec2>,
}

impl Game {
    /// A game on the built-in level.
    pub fn new(config: MazeQuestConfig) -> Result<Self, LevelError> {
        Self::with_level(config, LevelMap::default())
    }

    pub fn with_level(config: MazeQuestConfig, map: LevelMap) -> Result<Self, LevelError> {
        let level = Level::build(map, &config.level)?;
        let camera = Self::camera_for(&config, &level);
        let retries_left = config.session.retries;
        Ok(Self {
            config,
            state: GameState::Menu,
            mode: None,
            level,
            camera,
            timer: Timer::new(),
            players: Vec::new(),
            skins: [None; 2],
            finish_times: [None; 2],
            retries_left,
            body_sizes: HashMap::new(),
        })
    }

    /// Body size for characters wearing `skin`, normally its idle sprite.
    /// Skins without one use the configured character size.
    pub fn set_body_size(&mut self, skin: Skin, size: Vec2) {
        if !(size.is_finite() && size.min_element() > 0.0) {
            tracing::warn!(%skin, ?size, "Ignoring unusable body size");
            return;
        }
        self.body_sizes.insert(skin, size);
    }

    fn camera_for(config: &MazeQuestConfig, level: &Level) -> Camera {
        let viewport = glam::UVec2::new(config.window.width, config.window.height);
        Camera::new(viewport, level.world_size())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn config(&self) -> &MazeQuestConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn players(&self) -> &[Character] {
        &self.players
    }

    pub fn skins(&self) -> [Option<Skin>; 2] {
        self.skins
    }

    pub fn finish_times(&self) -> [Option<f64>; 2] {
        self.finish_times
    }

    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }

    pub fn elapsed(&self, now: Instant) -> f64 {
        self.timer.elapsed(now)
    }

    pub fn has_exited(&self) -> bool {
        self.state == GameState::Exited
    }

    /// Target frames per second for the current state.
    pub fn frame_rate_hz(&self) -> u32 {
        match self.state {
            GameState::Playing => self.config.session.tick_rate_hz,
            _ => self.config.session.menu_rate_hz,
        }
    }

    /// Advance the game by one frame.
    pub fn tick(&mut self, input: &FrameInput, now: Instant) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state == GameState::Exited {
            return events;
        }
        if input.close_requested {
            self.quit(&mut events);
            return events;
        }

        match self.state {
            GameState::Menu => self.handle_menu(&input.pressed, &mut events),
            GameState::CharacterSelect { player } => {
                self.handle_select(player, &input.pressed, now, &mut events)
            },
            GameState::Playing => self.step_playing(input, now, &mut events),
            GameState::LevelComplete | GameState::GameOver => {
                self.handle_end_screen(&input.pressed, &mut events)
            },
            GameState::Exited => {},
        }
        events
    }

    fn handle_menu(&mut self, pressed: &[MenuKey], events: &mut Vec<GameEvent>) {
        let mode = pressed.iter().find_map(|key| match key {
            MenuKey::Digit(1) => Some(GameMode::Solo),
            MenuKey::Digit(2) => Some(GameMode::Coop),
            _ => None,
        });
        if let Some(mode) = mode {
            tracing::info!(?mode, "Mode selected");
            self.mode = Some(mode);
            self.state = GameState::CharacterSelect {
                player: PlayerSlot::One,
            };
            events.push(GameEvent::ModeSelected(mode));
        }
    }

    fn handle_select(
        &mut self,
        player: PlayerSlot,
        pressed: &[MenuKey],
        now: Instant,
        events: &mut Vec<GameEvent>,
    ) {
        for key in pressed {
            let choice = match *key {
                MenuKey::Digit(slot) => Skin::from_slot(slot),
                MenuKey::Cancel => Err(SkinError::Cancelled),
                MenuKey::Restart | MenuKey::Quit => continue,
            };
            match choice {
                Ok(skin) => {
                    self.choose_skin(player, skin, now, events);
                    return;
                },
                Err(SkinError::Cancelled) => {
                    tracing::info!(player = player.number(), "Skin selection cancelled, back to menu");
                    self.players.clear();
                    self.skins = [None; 2];
                    self.mode = None;
                    self.state = GameState::Menu;
                    events.push(GameEvent::SelectionCancelled);
                    return;
                },
                Err(e) => tracing::debug!(player = player.number(), "Ignoring key: {e}"),
            }
        }
    }

    fn choose_skin(&mut self, player: PlayerSlot, skin: Skin, now: Instant, events: &mut Vec<GameEvent>) {
        tracing::info!(player = player.number(), %skin, "Skin selected");
        self.skins[player.index()] = Some(skin);
        events.push(GameEvent::SkinSelected { player, skin });

        let needs_second = self.mode == Some(GameMode::Coop) && player == PlayerSlot::One;
        if needs_second {
            self.state = GameState::CharacterSelect {
                player: PlayerSlot::Two,
            };
        } else {
            self.begin_playing(now, events);
        }
    }

    fn begin_playing(&mut self, now: Instant, events: &mut Vec<GameEvent>) {
        let starts = self.level.start_positions();
        let world = self.level.world_size();
        let physics = self.config.physics;
        self.players = self
            .skins
            .iter()
            .zip(starts)
            .filter_map(|(skin, start)| {
                let skin = (*skin)?;
                let character = Character::new(skin, start, physics, world);
                Some(match self.body_sizes.get(&skin) {
                    Some(&size) => character.with_size(size),
                    None => character,
                })
            })
            .collect();

        self.retries_left = self.config.session.retries;
        self.finish_times = [None; 2];
        self.timer.start(now);
        self.state = GameState::Playing;
        self.camera.update(&self.living_rects());
        tracing::info!(players = self.players.len(), retries = self.retries_left, "Playing started");
        events.push(GameEvent::PlayingStarted);
    }

    fn step_playing(&mut self, input: &FrameInput, now: Instant, events: &mut Vec<GameEvent>) {
        if self.players.is_empty() {
            self.state = GameState::Menu;
            return;
        }

        self.level.update();

        let mut hit_hazard = false;
        for (i, (player, slot)) in self.players.iter_mut().zip(PlayerSlot::ALL).enumerate() {
            if player.is_dead() {
                continue;
            }
            let fell = player.step(&input.players[i], self.level.platforms());
            let cause = fell.or_else(|| {
                player
                    .touches_hazard(self.level.hazards(), self.level.moving_hazards())
                    .then_some(DeathCause::Hazard)
            });
            if let Some(cause) = cause {
                // Only hazards spend a retry; a fallen player stays down.
                player.kill();
                hit_hazard |= cause == DeathCause::Hazard;
                tracing::info!(
                    player = slot.number(),
                    element = player.skin().kind.element(),
                    ?cause,
                    "Player died"
                );
                events.push(GameEvent::PlayerDied { player: slot, cause });
                continue;
            }

            if self.finish_times[i].is_none() && player.rect().overlaps(&self.level.finish().rect) {
                let time = self.timer.elapsed(now);
                self.finish_times[i] = Some(time);
                tracing::info!(player = slot.number(), time = %format_time(time), "Player finished");
                events.push(GameEvent::PlayerFinished { player: slot, time });
            }
        }

        if hit_hazard {
            if self.retries_left > 0 {
                self.retries_left -= 1;
                for player in &mut self.players {
                    player.reset_position();
                }
                self.finish_times = [None; 2];
                self.timer.start(now);
                tracing::info!(retries_left = self.retries_left, "Respawning all players");
                events.push(GameEvent::Respawned {
                    retries_left: self.retries_left,
                });
            } else {
                self.timer.stop(now);
                self.state = GameState::GameOver;
                tracing::info!("No retries left, game over");
                events.push(GameEvent::GameOver);
            }
        }

        if self.state == GameState::Playing && self.is_complete() {
            self.timer.stop(now);
            self.state = GameState::LevelComplete;
            let times = self.recorded_times();
            let formatted: Vec<String> = times.iter().map(|t| format_time(*t)).collect();
            tracing::info!(times = ?formatted, "Level complete");
            events.push(GameEvent::LevelComplete { times });
        }

        self.camera.update(&self.living_rects());
    }

    /// Solo needs player 1 finished. Coop needs both finished and neither
    /// currently dead.
    fn is_complete(&self) -> bool {
        match self.mode {
            Some(GameMode::Solo) => self.finish_times[0].is_some(),
            Some(GameMode::Coop) => {
                self.finish_times.iter().all(Option::is_some)
                    && self.players.len() == 2
                    && self.players.iter().all(|p| !p.is_dead())
            },
            None => false,
        }
    }

    fn recorded_times(&self) -> Vec<f64> {
        let count = self.mode.map_or(0, GameMode::player_count);
        self.finish_times
            .iter()
            .take(count)
            .map(|t| t.unwrap_or(0.0))
            .collect()
    }

    fn living_rects(&self) -> Vec<Rect> {
        self.players
            .iter()
            .filter(|p| !p.is_dead())
            .map(|p| *p.rect())
            .collect()
    }

    fn handle_end_screen(&mut self, pressed: &[MenuKey], events: &mut Vec<GameEvent>) {
        for key in pressed {
            match key {
                MenuKey::Restart => {
                    self.reset();
                    tracing::info!("Restarting, back to menu");
                    events.push(GameEvent::Restarted);
                    return;
                },
                MenuKey::Quit => {
                    self.quit(events);
                    return;
                },
                _ => {},
            }
        }
    }

    fn quit(&mut self, events: &mut Vec<GameEvent>) {
        tracing::info!("Quit requested");
        self.state = GameState::Exited;
        events.push(GameEvent::Quit);
    }

    /// Fresh level, camera and timer, no players, back at the main menu.
    fn reset(&mut self) {
        self.level.rebuild();
        self.camera = Self::camera_for(&self.config, &self.level);
        self.timer = Timer::new();
        self.players.clear();
        self.skins = [None; 2];
        self.finish_times = [None; 2];
        self.mode = None;
        self.retries_left = self.config.session.retries;
        self.state = GameState::Menu;
    }

    /// What to draw right now. `None` once the game has exited.
    pub fn screen(&self, now: Instant) -> Option<Screen> {
        let screen = match self.state {
            GameState::Menu => Screen::MainMenu,
            GameState::CharacterSelect { player } => Screen::SkinSelect { player },
            GameState::Playing => Screen::Playing(self.frame(now)),
            GameState::LevelComplete => Screen::LevelComplete {
                mode: self.mode.unwrap_or(GameMode::Solo),
                times: self.recorded_times().into_iter().map(format_time).collect(),
            },
            GameState::GameOver => Screen::GameOver,
            GameState::Exited => return None,
        };
        Some(screen)
    }

    fn frame(&self, now: Instant) -> Frame {
        let level = &self.level;
        let cam = &self.camera;
        let mut drawables = Vec::with_capacity(
            level.platforms().len() + level.hazards().len() + level.moving_hazards().len() + 3,
        );

        drawables.extend(level.platforms().iter().map(|t| Drawable {
            rect: cam.apply(&t.rect),
            visual: Visual::Platform,
        }));
        drawables.extend(level.hazards().iter().map(|h| Drawable {
            rect: cam.apply(&h.rect),
            visual: Visual::Hazard,
        }));
        drawables.extend(level.moving_hazards().iter().map(|m| Drawable {
            rect: cam.apply(&m.rect),
            visual: Visual::MovingHazard,
        }));
        drawables.push(Drawable {
            rect: cam.apply(&level.finish().rect),
            visual: Visual::Finish,
        });
        for (player, slot) in self.players.iter().zip(PlayerSlot::ALL) {
            if player.is_dead() {
                continue;
            }
            drawables.push(Drawable {
                rect: cam.apply(player.rect()),
                visual: Visual::Player {
                    slot,
                    skin: player.skin(),
                    pose: player.pose(),
                },
            });
        }

        Frame {
            background: Rgb::SKY_BLUE,
            drawables,
            hud: Hud {
                time: self.timer.format(now),
                retries: self.retries_left,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::MoveInput;

    fn game_on(rows: &[&str]) -> Game {
        Game::with_level(MazeQuestConfig::default(), LevelMap::from_rows(rows)).unwrap()
    }

    fn press(game: &mut Game, key: MenuKey, now: Instant) -> Vec<GameEvent> {
        game.tick(&FrameInput::with_key(key), now)
    }

    fn idle(game: &mut Game, now: Instant) -> Vec<GameEvent> {
        game.tick(&FrameInput::default(), now)
    }

    #[test]
    fn starts_in_menu_with_full_retries() {
        let game = Game::new(MazeQuestConfig::default()).unwrap();
        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.retries_left(), 3);
        assert_eq!(game.frame_rate_hz(), 30);
        assert!(game.level().warnings().is_empty());
    }

    #[test]
    fn menu_ignores_other_digits() {
        let mut game = game_on(&["1_F2", "####"]);
        let now = Instant::now();
        assert!(press(&mut game, MenuKey::Digit(3), now).is_empty());
        assert!(press(&mut game, MenuKey::Quit, now).is_empty());
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn only_first_mode_key_in_a_frame_counts() {
        let mut game = game_on(&["1_F2", "####"]);
        let input = FrameInput {
            pressed: vec![MenuKey::Digit(2), MenuKey::Digit(1)],
            ..Default::default()
        };
        let events = game.tick(&input, Instant::now());
        assert_eq!(events, vec![GameEvent::ModeSelected(GameMode::Coop)]);
        assert_eq!(game.state(), GameState::CharacterSelect { player: PlayerSlot::One });
    }

    #[test]
    fn invalid_skin_slot_keeps_waiting() {
        let mut game = game_on(&["1_F2", "####"]);
        let now = Instant::now();
        press(&mut game, MenuKey::Digit(1), now);
        assert!(press(&mut game, MenuKey::Digit(9), now).is_empty());
        assert!(press(&mut game, MenuKey::Digit(0), now).is_empty());
        assert_eq!(game.state(), GameState::CharacterSelect { player: PlayerSlot::One });
    }

    #[test]
    fn solo_selection_starts_playing_with_one_character() {
        let mut game = game_on(&["1_F2", "####"]);
        let now = Instant::now();
        press(&mut game, MenuKey::Digit(1), now);
        let events = press(&mut game, MenuKey::Digit(6), now);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.skins()[0].map(|s| s.slot()), Some(6));
        assert!(events.contains(&GameEvent::PlayingStarted));
        assert_eq!(game.frame_rate_hz(), 60);
    }

    #[test]
    fn close_request_exits_from_any_state() {
        let mut game = game_on(&["1_F2", "####"]);
        let now = Instant::now();
        press(&mut game, MenuKey::Digit(2), now);
        let events = game.tick(&FrameInput::close(), now);
        assert_eq!(events, vec![GameEvent::Quit]);
        assert!(game.has_exited());
        assert!(game.screen(now).is_none());
        assert!(idle(&mut game, now).is_empty());
    }

    #[test]
    fn frame_draw_order_ends_with_players() {
        let mut game = game_on(&["1_LMF2", "######"]);
        let now = Instant::now();
        press(&mut game, MenuKey::Digit(2), now);
        press(&mut game, MenuKey::Digit(1), now);
        press(&mut game, MenuKey::Digit(5), now);

        let Some(Screen::Playing(frame)) = game.screen(now) else {
            panic!("expected a playing frame");
        };
        let kinds: Vec<&Visual> = frame.drawables.iter().map(|d| &d.visual).collect();
        assert_eq!(kinds.len(), 6 + 1 + 1 + 1 + 2);
        assert!(kinds[..6].iter().all(|v| **v == Visual::Platform));
        assert_eq!(*kinds[6], Visual::Hazard);
        assert_eq!(*kinds[7], Visual::MovingHazard);
        assert_eq!(*kinds[8], Visual::Finish);
        assert_eq!(frame.players().count(), 2);
        assert_eq!(frame.background, Rgb::SKY_BLUE);
        assert_eq!(frame.hud.retries, 3);
        assert_eq!(frame.hud.time, "00:00");
    }

    #[test]
    fn hud_time_tracks_the_timer() {
        let mut game = game_on(&["1____F2", "#######"]);
        let t0 = Instant::now();
        press(&mut game, MenuKey::Digit(1), t0);
        press(&mut game, MenuKey::Digit(1), t0);
        let later = t0 + Duration::from_secs(75);
        let Some(Screen::Playing(frame)) = game.screen(later) else {
            panic!("expected a playing frame");
        };
        assert_eq!(frame.hud.time, "01:15");
    }

    #[test]
    fn playing_without_players_falls_back_to_menu() {
        let mut game = game_on(&["1_F2", "####"]);
        game.state = GameState::Playing;
        idle(&mut game, Instant::now());
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn dead_player_blocks_coop_completion() {
        let mut game = game_on(&["1_F2", "####"]);
        let now = Instant::now();
        press(&mut game, MenuKey::Digit(2), now);
        press(&mut game, MenuKey::Digit(1), now);
        press(&mut game, MenuKey::Digit(2), now);
        game.finish_times = [Some(1.0), Some(2.0)];
        game.players[1].kill();
        assert!(!game.is_complete());
        game.players[1].reset_position();
        assert!(game.is_complete());
    }

    #[test]
    fn body_size_follows_the_skin() {
        let mut game = game_on(&["1__F2", "#####"]);
        let male = Skin::from_slot(1).unwrap();
        let female = Skin::from_slot(5).unwrap();
        game.set_body_size(male, Vec2::new(72.0, 72.0));
        game.set_body_size(female, Vec2::new(0.0, 40.0));

        let now = Instant::now();
        press(&mut game, MenuKey::Digit(2), now);
        press(&mut game, MenuKey::Digit(1), now);
        press(&mut game, MenuKey::Digit(5), now);

        let configured = Vec2::new(
            game.config().physics.character_width,
            game.config().physics.character_height,
        );
        assert_eq!(game.players()[0].rect().size(), Vec2::new(72.0, 72.0));
        assert_eq!(game.players()[0].rect().top_left(), game.level().start_positions()[0]);
        assert_eq!(game.players()[1].rect().size(), configured);
    }

    #[test]
    fn moving_right_in_solo_reaches_finish() {
        let mut game = game_on(&["1_F", "###"]);
        let t0 = Instant::now();
        press(&mut game, MenuKey::Digit(1), t0);
        press(&mut game, MenuKey::Digit(1), t0);

        let input = FrameInput::with_moves(
            MoveInput {
                right: true,
                ..Default::default()
            },
            MoveInput::default(),
        );
        let mut finished = false;
        for tick in 1..200u64 {
            let now = t0 + Duration::from_millis(16 * tick);
            let events = game.tick(&input, now);
            if events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(game.state(), GameState::LevelComplete);
        assert!(game.finish_times()[0].is_some());
    }
}
