use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/mazequest.toml";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "MAZEQUEST_CONFIG";

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeQuestConfig {
    pub window: WindowConfig,
    pub level: LevelConfig,
    pub physics: PhysicsConfig,
    pub session: SessionConfig,
    pub assets: AssetConfig,
}

/// Window and camera viewport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "MazeQuest".to_string(),
            width: 1600,
            height: 900,
        }
    }
}

/// Grid-to-world scaling and hazard geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub base_tile_size: u32,
    pub world_scale_factor: f32,
    /// Fraction of a cell occupied by a static hazard, measured from the bottom.
    pub hazard_height_ratio: f32,
    pub hazard_min_height: u32,
    pub moving_hazard_range_tiles: u32,
    pub moving_hazard_speed: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            base_tile_size: 50,
            world_scale_factor: 1.75,
            hazard_height_ratio: 0.4,
            hazard_min_height: 5,
            moving_hazard_range_tiles: 2,
            moving_hazard_speed: 2.0,
        }
    }
}

impl LevelConfig {
    /// Side length of one grid cell in pixels, never below 1.
    pub fn tile_size(&self) -> u32 {
        ((self.base_tile_size as f32 * self.world_scale_factor) as u32).max(1)
    }
}

/// Per-tick character physics. Units are pixels and pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Initial vertical velocity of a jump; negative is upward.
    pub jump_strength: f32,
    pub terminal_velocity: f32,
    pub move_speed: f32,
    /// How far into a static hazard the feet must sink before it kills.
    pub hazard_tolerance: f32,
    /// Distance below the world bottom at which a falling character dies.
    pub fall_death_margin: f32,
    /// Velocity given to an airborne character whose fall was zeroed by a ceiling.
    pub stall_nudge: f32,
    pub character_width: f32,
    pub character_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_strength: -15.0,
            terminal_velocity: 10.0,
            move_speed: 5.0,
            hazard_tolerance: 5.0,
            fall_death_margin: 50.0,
            stall_nudge: 1.0,
            character_width: 36.0,
            character_height: 36.0,
        }
    }
}

/// Playthrough rules and frame pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub retries: u32,
    pub tick_rate_hz: u32,
    pub menu_rate_hz: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            tick_rate_hz: 60,
            menu_rate_hz: 30,
        }
    }
}

/// Sprite lookup and placeholder sizing, consumed by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory containing the `{Prefix}_{variant}` skin folders.
    pub sprite_root: String,
    pub sprite_scale: f32,
    pub sprite_max_size: f32,
    /// Placeholder used for a single missing pose frame.
    pub frame_placeholder_size: u32,
    /// Placeholder used for every pose when a whole skin folder is missing.
    pub skin_placeholder_size: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            sprite_root: ".".to_string(),
            sprite_scale: 3.0,
            sprite_max_size: 40.0,
            frame_placeholder_size: 36,
            skin_placeholder_size: 72,
        }
    }
}

/// False for NaN as well as for zero and negatives.
fn is_positive(value: f32) -> bool {
    value > 0.0
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

impl MazeQuestConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Load config from `$MAZEQUEST_CONFIG` or `config/mazequest.toml`.
    /// Falls back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                Self::default()
            },
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be > 0"));
        }
        if self.level.base_tile_size == 0 {
            return Err(invalid("level.base_tile_size", "must be > 0"));
        }
        if !is_positive(self.level.world_scale_factor) {
            return Err(invalid("level.world_scale_factor", "must be > 0"));
        }
        if !is_positive(self.level.hazard_height_ratio) || self.level.hazard_height_ratio > 1.0 {
            return Err(invalid("level.hazard_height_ratio", "must be in (0, 1]"));
        }
        if self.level.moving_hazard_speed < 0.0 {
            return Err(invalid("level.moving_hazard_speed", "must be >= 0"));
        }

        let physics = &self.physics;
        if !is_positive(physics.gravity) {
            return Err(invalid("physics.gravity", "must be > 0"));
        }
        if !is_positive(physics.terminal_velocity) {
            return Err(invalid("physics.terminal_velocity", "must be > 0"));
        }
        if !is_positive(physics.move_speed) {
            return Err(invalid("physics.move_speed", "must be > 0"));
        }
        if !is_positive(-physics.jump_strength) {
            return Err(invalid("physics.jump_strength", "must be < 0 (upward)"));
        }
        if !is_positive(physics.character_width) || !is_positive(physics.character_height) {
            return Err(invalid("physics.character_width", "hitbox must be > 0 on both axes"));
        }

        if self.session.tick_rate_hz == 0 {
            return Err(invalid("session.tick_rate_hz", "must be > 0"));
        }
        if self.session.menu_rate_hz == 0 {
            return Err(invalid("session.menu_rate_hz", "must be > 0"));
        }

        if self.physics.move_speed > self.level.tile_size() as f32 {
            tracing::warn!(
                move_speed = self.physics.move_speed,
                tile_size = self.level.tile_size(),
                "move_speed exceeds tile size, characters may tunnel through walls"
            );
        }
        Ok(())
    }
}
