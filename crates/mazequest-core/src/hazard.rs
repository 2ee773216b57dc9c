use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// What a full-cell tile is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Platform,
    Finish,
}

/// Static full-cell tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(x: f32, y: f32, tile_size: u32, kind: TileKind) -> Self {
        let size = tile_size as f32;
        Self {
            rect: Rect::new(x, y, size, size),
            kind,
        }
    }
}

/// Lethal strip along the bottom of a cell. `L`, `W` and `S` all build one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticHazard {
    pub rect: Rect,
}

impl StaticHazard {
    /// `x`/`y` are the cell's top-left corner.
    pub fn new(x: f32, y: f32, tile_size: u32, height_ratio: f32, min_height: u32) -> Self {
        let height = ((tile_size as f32 * height_ratio) as u32).max(min_height) as f32;
        let size = tile_size as f32;
        Self {
            rect: Rect::new(x, y + size - height, size, height),
        }
    }
}

/// Half-cell slab that patrols horizontally between `start_x` and `end_x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingHazard {
    pub rect: Rect,
    pub start_x: f32,
    pub end_x: f32,
    pub speed: f32,
    pub moving_right: bool,
}

impl MovingHazard {
    /// `x`/`y` are the anchor cell's top-left corner; the slab occupies the
    /// cell's lower half.
    pub fn new(x: f32, y: f32, tile_size: u32, range: f32, speed: f32) -> Self {
        let half = (tile_size / 2) as f32;
        Self {
            rect: Rect::new(x, y + half, tile_size as f32, half),
            start_x: x,
            end_x: x + range,
            speed,
            moving_right: true,
        }
    }

    /// Advance one tick. Reaching a bound clamps onto it and flips direction,
    /// so the slab never overshoots its patrol range.
    pub fn update(&mut self) {
        if self.moving_right {
            self.rect.x += self.speed;
            if self.rect.x >= self.end_x {
                self.rect.x = self.end_x;
                self.moving_right = false;
            }
        } else {
            self.rect.x -= self.speed;
            if self.rect.x <= self.start_x {
                self.rect.x = self.start_x;
                self.moving_right = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_hazard_sits_on_cell_bottom() {
        let h = StaticHazard::new(87.0, 174.0, 87, 0.4, 5);
        assert_eq!(h.rect.h, 34.0);
        assert_eq!(h.rect.bottom(), 261.0);
        assert_eq!(h.rect.x, 87.0);
        assert_eq!(h.rect.w, 87.0);
    }

    #[test]
    fn static_hazard_height_has_floor() {
        let h = StaticHazard::new(0.0, 0.0, 10, 0.4, 5);
        assert_eq!(h.rect.h, 5.0);
        assert_eq!(h.rect.y, 5.0);
    }

    #[test]
    fn moving_hazard_occupies_lower_half() {
        let m = MovingHazard::new(100.0, 200.0, 87, 174.0, 2.0);
        assert_eq!(m.rect.y, 243.0);
        assert_eq!(m.rect.h, 43.0);
        assert_eq!(m.end_x, 274.0);
    }

    #[test]
    fn patrol_reverses_on_the_tick_after_reaching_the_end() {
        let tile = 10;
        let start = 50.0;
        let mut m = MovingHazard::new(start, 0.0, tile, 2.0 * tile as f32, 2.0);

        for _ in 0..tile / 2 {
            m.update();
        }
        assert_eq!(m.rect.x, start + tile as f32);
        assert!(m.moving_right, "still heading right at the midpoint");

        for _ in 0..tile / 2 {
            m.update();
        }
        assert_eq!(m.rect.x, start + 2.0 * tile as f32);
        assert!(!m.moving_right, "flip happens on arrival");

        m.update();
        assert_eq!(m.rect.x, start + 2.0 * tile as f32 - 2.0);
    }

    #[test]
    fn patrol_clamps_instead_of_overshooting() {
        let mut m = MovingHazard::new(0.0, 0.0, 87, 174.0, 2.0);
        for _ in 0..1000 {
            m.update();
            assert!(m.rect.x >= m.start_x && m.rect.x <= m.end_x);
        }
        // 87 ticks each way with speed 2 over a 174 range
        let mut m = MovingHazard::new(0.0, 0.0, 87, 174.0, 2.0);
        for _ in 0..87 {
            m.update();
        }
        assert_eq!(m.rect.x, 174.0);
        for _ in 0..87 {
            m.update();
        }
        assert_eq!(m.rect.x, 0.0);
        assert!(m.moving_right);
    }
}
