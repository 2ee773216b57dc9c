use std::fmt;

/// Configuration could not be loaded or failed validation.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config io error: {e}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A level map that cannot produce any world at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    EmptyMap,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "level map has no cells"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Content problems in a level map that are repaired with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelWarning {
    MissingPlayer1Start,
    MissingPlayer2Start,
    MissingFinish,
}

impl fmt::Display for LevelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlayer1Start => {
                write!(f, "player 1 start ('1') not found, defaulting to (0, 0)")
            },
            Self::MissingPlayer2Start => {
                write!(f, "player 2 start ('2') not found, defaulting next to player 1")
            },
            Self::MissingFinish => write!(f, "finish ('F') not found, defaulting to top-right"),
        }
    }
}

/// Skin selection did not produce a skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinError {
    InvalidSlot(u8),
    Cancelled,
}

impl fmt::Display for SkinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlot(slot) => write!(f, "no skin in slot {slot} (valid: 1-8)"),
            Self::Cancelled => write!(f, "skin selection cancelled"),
        }
    }
}

impl std::error::Error for SkinError {}
