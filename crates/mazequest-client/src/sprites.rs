//! Character sprites, loaded once at startup.
//!
//! Each skin lives in `{sprite_root}/{Prefix}_{variant}/` with one PNG per
//! pose. Anything missing is replaced by a coloured circle so the game is
//! always playable without assets.

use std::collections::HashMap;
use std::path::Path;

use macroquad::prelude::{Color, FilterMode, Image, Texture2D, load_texture};

use mazequest_core::character::Pose;
use mazequest_core::config::AssetConfig;
use mazequest_core::scene::Rgb;
use mazequest_core::skin::Skin;

/// A texture and the size it is drawn at.
#[derive(Clone)]
pub struct Sprite {
    pub texture: Texture2D,
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    fn placeholder(size: u32, color: Rgb) -> Self {
        let side = size.max(1);
        let texture = Texture2D::from_image(&circle_image(side, color));
        texture.set_filter(FilterMode::Nearest);
        Self {
            texture,
            width: side as f32,
            height: side as f32,
        }
    }
}

/// Frames for one skin. The idle frame always exists.
pub struct SpriteSet {
    idle: Sprite,
    frames: HashMap<Pose, Sprite>,
}

impl SpriteSet {
    /// Exact pose, then the same facing standing still, then idle.
    pub fn frame(&self, pose: Pose) -> &Sprite {
        pose.fallback_chain()
            .iter()
            .find_map(|p| self.frames.get(p))
            .unwrap_or(&self.idle)
    }

    pub fn idle(&self) -> &Sprite {
        &self.idle
    }
}

pub struct SpriteLibrary {
    sets: HashMap<Skin, SpriteSet>,
}

impl SpriteLibrary {
    pub async fn load(assets: &AssetConfig) -> Self {
        let mut sets = HashMap::new();
        for skin in Skin::all() {
            sets.insert(skin, load_set(skin, assets).await);
        }
        tracing::info!(skins = sets.len(), root = %assets.sprite_root, "Sprites loaded");
        Self { sets }
    }

    pub fn set(&self, skin: Skin) -> Option<&SpriteSet> {
        self.sets.get(&skin)
    }
}

async fn load_set(skin: Skin, assets: &AssetConfig) -> SpriteSet {
    let color = skin.kind.placeholder_color();
    let dir = Path::new(&assets.sprite_root).join(skin.asset_dir());
    if !dir.is_dir() {
        tracing::warn!(
            %skin,
            path = %dir.display(),
            "Sprite folder not found, using placeholder"
        );
        return SpriteSet {
            idle: Sprite::placeholder(assets.skin_placeholder_size, color),
            frames: HashMap::new(),
        };
    }

    let mut frames = HashMap::new();
    for pose in Pose::all() {
        let path = dir.join(format!("{}_{pose}.png", skin.asset_dir()));
        let sprite = match load_texture(&path.to_string_lossy()).await {
            Ok(texture) => {
                texture.set_filter(FilterMode::Nearest);
                let (width, height) = fit_size(
                    texture.width(),
                    texture.height(),
                    assets.sprite_scale,
                    assets.sprite_max_size,
                );
                Sprite {
                    texture,
                    width,
                    height,
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), "Sprite not loaded ({e}), using placeholder");
                Sprite::placeholder(assets.frame_placeholder_size, color)
            },
        };
        frames.insert(pose, sprite);
    }

    let idle = frames
        .remove(&Pose::IDLE)
        .unwrap_or_else(|| Sprite::placeholder(assets.frame_placeholder_size, color));
    SpriteSet { idle, frames }
}

/// Scale up by `scale`, then shrink proportionally so neither side exceeds
/// `max`. Sides are whole pixels and at least 1.
pub fn fit_size(width: f32, height: f32, scale: f32, max: f32) -> (f32, f32) {
    let mut w = (width * scale).floor();
    let mut h = (height * scale).floor();
    if w > max || h > max {
        let ratio = (max / w).min(max / h);
        w = (w * ratio).floor();
        h = (h * ratio).floor();
    }
    (w.max(1.0), h.max(1.0))
}

/// Filled circle on a transparent square.
fn circle_image(size: u32, color: Rgb) -> Image {
    let side = size.min(u32::from(u16::MAX)) as u16;
    let mut image = Image::gen_image_color(side, side, Color::from_rgba(0, 0, 0, 0));
    let fill = Color::from_rgba(color.r, color.g, color.b, 255);
    let radius = f32::from(side) / 2.0;
    for y in 0..u32::from(side) {
        for x in 0..u32::from(side) {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            if dx * dx + dy * dy <= radius * radius {
                image.set_pixel(x, y, fill);
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sprites_are_scaled_up() {
        assert_eq!(fit_size(12.0, 12.0, 3.0, 40.0), (36.0, 36.0));
    }

    #[test]
    fn large_sprites_shrink_to_fit() {
        // 30x40 * 2 = 60x80, ratio 0.5
        assert_eq!(fit_size(30.0, 40.0, 2.0, 40.0), (30.0, 40.0));
    }

    #[test]
    fn sides_never_collapse() {
        assert_eq!(fit_size(1.0, 400.0, 2.0, 50.0), (1.0, 50.0));
        assert_eq!(fit_size(0.0, 0.0, 3.0, 40.0), (1.0, 1.0));
    }
}
