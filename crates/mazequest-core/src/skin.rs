use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkinError;
use crate::scene::Rgb;

/// Number of variants per character kind.
pub const VARIANTS_PER_KIND: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    Male,
    Female,
}

impl CharacterKind {
    /// Folder and file prefix used by the shipped sprite sets.
    pub fn asset_prefix(self) -> &'static str {
        match self {
            CharacterKind::Male => "Male",
            CharacterKind::Female => "Femal",
        }
    }

    /// Element tag used when reporting on a character.
    pub fn element(self) -> &'static str {
        match self {
            CharacterKind::Male => "Fire",
            CharacterKind::Female => "Water",
        }
    }

    pub fn placeholder_color(self) -> Rgb {
        match self {
            CharacterKind::Male => Rgb::RED,
            CharacterKind::Female => Rgb::BLUE,
        }
    }
}

/// One of the eight selectable looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skin {
    pub kind: CharacterKind,
    /// 1-based within the kind.
    pub variant: u8,
}

impl Skin {
    /// Selection slots 1-4 are male variants 1-4, slots 5-8 female variants 1-4.
    pub fn from_slot(slot: u8) -> Result<Self, SkinError> {
        match slot {
            1..=4 => Ok(Self {
                kind: CharacterKind::Male,
                variant: slot,
            }),
            5..=8 => Ok(Self {
                kind: CharacterKind::Female,
                variant: slot - VARIANTS_PER_KIND,
            }),
            _ => Err(SkinError::InvalidSlot(slot)),
        }
    }

    pub fn slot(self) -> u8 {
        match self.kind {
            CharacterKind::Male => self.variant,
            CharacterKind::Female => self.variant + VARIANTS_PER_KIND,
        }
    }

    /// All skins in slot order.
    pub fn all() -> impl Iterator<Item = Skin> {
        (1..=2 * VARIANTS_PER_KIND).filter_map(|slot| Skin::from_slot(slot).ok())
    }

    /// Folder name holding this skin's frames, e.g. `Male_2`.
    pub fn asset_dir(self) -> String {
        format!("{}_{}", self.kind.asset_prefix(), self.variant)
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.asset_prefix(), self.variant)
    }
}
