use std::fmt;
use std::str::FromStr;

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::error::{LevelError, LevelWarning};
use crate::hazard::{MovingHazard, StaticHazard, Tile, TileKind};

/// The built-in level. Row 0 is the top of the world.
pub const DEFAULT_LEVEL: [&str; 12] = [
    "________________F__",
    "_____##_______#####",
    "___#_____###L__S___",
    "#######____________",
    "_____###M_____#####",
    "####_______________",
    "_______#####_______",
    "_____________L#____",
    "_________________#_",
    "#####LL#___####LL##",
    "1_________________2",
    "###################",
];

/// Meaning of one grid character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Platform,
    StaticHazard,
    MovingHazard,
    Player1Start,
    Player2Start,
    Finish,
}

impl Cell {
    pub fn from_char(c: char) -> Self {
        match c {
            '#' => Cell::Platform,
            'L' | 'W' | 'S' => Cell::StaticHazard,
            'M' => Cell::MovingHazard,
            '1' => Cell::Player1Start,
            '2' => Cell::Player2Start,
            'F' => Cell::Finish,
            _ => Cell::Empty,
        }
    }
}

/// Authored text form of a level: one string per row, rows may be ragged.
///
/// The rows are kept verbatim so that printing a parsed map reproduces the
/// input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMap {
    rows: Vec<String>,
}

impl LevelMap {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.as_ref().to_string()).collect(),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Width in cells: the longest row.
    pub fn columns(&self) -> u32 {
        self.rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0) as u32
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Cell at `(col, row)`. Anything past the end of a short row is empty.
    pub fn cell(&self, col: u32, row: u32) -> Cell {
        self.rows
            .get(row as usize)
            .and_then(|r| r.chars().nth(col as usize))
            .map(Cell::from_char)
            .unwrap_or(Cell::Empty)
    }

    /// Every cell with its grid coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, line)| {
            line.chars()
                .enumerate()
                .map(move |(col, c)| (col as u32, row as u32, Cell::from_char(c)))
        })
    }
}

impl Default for LevelMap {
    fn default() -> Self {
        Self::from_rows(&DEFAULT_LEVEL)
    }
}

impl FromStr for LevelMap {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().collect();
        let map = Self::from_rows(&rows);
        if map.columns() == 0 {
            return Err(LevelError::EmptyMap);
        }
        Ok(map)
    }
}

impl fmt::Display for LevelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Built world geometry for one level.
#[derive(Debug, Clone)]
pub struct Level {
    map: LevelMap,
    config: LevelConfig,
    tile_size: u32,
    platforms: Vec<Tile>,
    hazards: Vec<StaticHazard>,
    moving_hazards: Vec<MovingHazard>,
    player1_start: Vec2,
    player2_start: Vec2,
    finish: Tile,
    warnings: Vec<LevelWarning>,
}

impl Level {
    pub fn build(map: LevelMap, config: &LevelConfig) -> Result<Self, LevelError> {
        if map.columns() == 0 {
            return Err(LevelError::EmptyMap);
        }
        let tile_size = config.tile_size();
        let mut level = Self {
            map,
            config: config.clone(),
            tile_size,
            platforms: Vec::new(),
            hazards: Vec::new(),
            moving_hazards: Vec::new(),
            player1_start: Vec2::ZERO,
            player2_start: Vec2::ZERO,
            finish: Tile::new(0.0, 0.0, tile_size, TileKind::Finish),
            warnings: Vec::new(),
        };
        level.rebuild();
        Ok(level)
    }

    /// Throw away all geometry and build it again from the map. Moving
    /// hazards return to their anchors.
    pub fn rebuild(&mut self) {
        self.platforms.clear();
        self.hazards.clear();
        self.moving_hazards.clear();
        self.warnings.clear();

        let ts = self.tile_size;
        let mut p1 = None;
        let mut p2 = None;
        let mut finish = None;

        for (col, row, cell) in self.map.cells() {
            let x = (col * ts) as f32;
            let y = (row * ts) as f32;
            match cell {
                Cell::Platform => self.platforms.push(Tile::new(x, y, ts, TileKind::Platform)),
                Cell::StaticHazard => self.hazards.push(StaticHazard::new(
                    x,
                    y,
                    ts,
                    self.config.hazard_height_ratio,
                    self.config.hazard_min_height,
                )),
                Cell::MovingHazard => self.moving_hazards.push(MovingHazard::new(
                    x,
                    y,
                    ts,
                    (ts * self.config.moving_hazard_range_tiles) as f32,
                    self.config.moving_hazard_speed,
                )),
                Cell::Player1Start => p1 = Some(Vec2::new(x, y)),
                Cell::Player2Start => p2 = Some(Vec2::new(x, y)),
                Cell::Finish => finish = Some(Tile::new(x, y, ts, TileKind::Finish)),
                Cell::Empty => {},
            }
        }

        self.player1_start = p1.unwrap_or_else(|| {
            self.warn(LevelWarning::MissingPlayer1Start);
            Vec2::ZERO
        });
        let p1_start = self.player1_start;
        self.player2_start = p2.unwrap_or_else(|| {
            self.warn(LevelWarning::MissingPlayer2Start);
            p1_start + Vec2::new(ts as f32, 0.0)
        });
        self.finish = finish.unwrap_or_else(|| {
            self.warn(LevelWarning::MissingFinish);
            let last_col = self.map.columns().saturating_sub(1);
            Tile::new((last_col * ts) as f32, 0.0, ts, TileKind::Finish)
        });

        tracing::debug!(
            platforms = self.platforms.len(),
            hazards = self.hazards.len(),
            moving_hazards = self.moving_hazards.len(),
            tile_size = ts,
            "Level built"
        );
    }

    fn warn(&mut self, warning: LevelWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Advance moving hazards by one tick.
    pub fn update(&mut self) {
        for hazard in &mut self.moving_hazards {
            hazard.update();
        }
    }

    pub fn map(&self) -> &LevelMap {
        &self.map
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn world_size(&self) -> UVec2 {
        UVec2::new(
            self.map.columns() * self.tile_size,
            self.map.row_count() * self.tile_size,
        )
    }

    pub fn platforms(&self) -> &[Tile] {
        &self.platforms
    }

    pub fn hazards(&self) -> &[StaticHazard] {
        &self.hazards
    }

    pub fn moving_hazards(&self) -> &[MovingHazard] {
        &self.moving_hazards
    }

    pub fn start_positions(&self) -> [Vec2; 2] {
        [self.player1_start, self.player2_start]
    }

    pub fn finish(&self) -> &Tile {
        &self.finish
    }

    /// Defaults substituted during the last build.
    pub fn warnings(&self) -> &[LevelWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(tile: u32) -> LevelConfig {
        LevelConfig {
            base_tile_size: tile,
            world_scale_factor: 1.0,
            ..LevelConfig::default()
        }
    }

    #[test]
    fn default_level_dimensions() {
        let level = Level::build(LevelMap::default(), &LevelConfig::default()).unwrap();
        assert_eq!(level.tile_size(), 87);
        assert_eq!(level.world_size(), UVec2::new(19 * 87, 12 * 87));
        assert!(level.warnings().is_empty());
        assert_eq!(level.moving_hazards().len(), 1);
        assert_eq!(level.finish().rect.x, 16.0 * 87.0);
        assert_eq!(level.finish().rect.y, 0.0);
    }

    #[test]
    fn default_level_counts() {
        let level = Level::build(LevelMap::default(), &LevelConfig::default()).unwrap();
        let expected_platforms: usize = DEFAULT_LEVEL
            .iter()
            .map(|r| r.chars().filter(|&c| c == '#').count())
            .sum();
        assert_eq!(level.platforms().len(), expected_platforms);
        // L, S on row 2, L on row 7, LL + LL on row 9
        assert_eq!(level.hazards().len(), 7);
    }

    #[test]
    fn start_markers_on_the_spawn_row() {
        let map = LevelMap::from_rows(&["1_________________2", "###################"]);
        let level = Level::build(map, &LevelConfig::default()).unwrap();
        let [p1, p2] = level.start_positions();
        assert_eq!(p1, Vec2::new(0.0, 0.0));
        assert_eq!(p2, Vec2::new(18.0 * 87.0, 0.0));
        assert_eq!(level.platforms().len(), 19);
    }

    #[test]
    fn ragged_rows_pad_with_empty() {
        let map = LevelMap::from_rows(&["#", "1__F", "##"]);
        assert_eq!(map.columns(), 4);
        assert_eq!(map.cell(3, 0), Cell::Empty);
        assert_eq!(map.cell(3, 1), Cell::Finish);
        assert_eq!(map.cell(10, 10), Cell::Empty);
        let level = Level::build(map, &small_config(10)).unwrap();
        assert_eq!(level.world_size(), UVec2::new(40, 30));
    }

    #[test]
    fn hazard_letters_all_build_the_same_hazard() {
        let map = LevelMap::from_rows(&["LWS1F2"]);
        let level = Level::build(map, &small_config(20)).unwrap();
        assert_eq!(level.hazards().len(), 3);
        let heights: Vec<f32> = level.hazards().iter().map(|h| h.rect.h).collect();
        assert_eq!(heights, vec![8.0, 8.0, 8.0]);
    }

    #[test]
    fn unknown_characters_are_empty() {
        let map = LevelMap::from_rows(&["1?x F", "#####"]);
        let level = Level::build(map, &small_config(10)).unwrap();
        assert_eq!(level.platforms().len(), 5);
        assert!(level.hazards().is_empty());
    }

    #[test]
    fn missing_markers_fall_back_with_warnings() {
        let map = LevelMap::from_rows(&["____", "####"]);
        let level = Level::build(map, &small_config(10)).unwrap();
        let [p1, p2] = level.start_positions();
        assert_eq!(p1, Vec2::ZERO);
        assert_eq!(p2, Vec2::new(10.0, 0.0));
        assert_eq!(level.finish().rect.x, 30.0);
        assert_eq!(level.finish().rect.y, 0.0);
        assert_eq!(
            level.warnings(),
            &[
                LevelWarning::MissingPlayer1Start,
                LevelWarning::MissingPlayer2Start,
                LevelWarning::MissingFinish,
            ]
        );
    }

    #[test]
    fn player2_default_follows_player1() {
        let map = LevelMap::from_rows(&["__1_F", "#####"]);
        let level = Level::build(map, &small_config(10)).unwrap();
        let [p1, p2] = level.start_positions();
        assert_eq!(p1, Vec2::new(20.0, 0.0));
        assert_eq!(p2, Vec2::new(30.0, 0.0));
        assert_eq!(level.warnings(), &[LevelWarning::MissingPlayer2Start]);
    }

    #[test]
    fn empty_map_is_rejected() {
        assert_eq!(
            Level::build(LevelMap::from_rows::<&str>(&[]), &LevelConfig::default()).unwrap_err(),
            LevelError::EmptyMap
        );
        assert_eq!(
            Level::build(LevelMap::from_rows(&["", ""]), &LevelConfig::default()).unwrap_err(),
            LevelError::EmptyMap
        );
        assert!("".parse::<LevelMap>().is_err());
    }

    #[test]
    fn rebuild_is_idempotent_and_resets_patrols() {
        let mut level = Level::build(LevelMap::default(), &LevelConfig::default()).unwrap();
        let platforms = level.platforms().len();
        let anchor = level.moving_hazards()[0].rect;
        for _ in 0..30 {
            level.update();
        }
        assert_ne!(level.moving_hazards()[0].rect, anchor);

        level.rebuild();
        level.rebuild();
        assert_eq!(level.platforms().len(), platforms);
        assert_eq!(level.moving_hazards().len(), 1);
        assert_eq!(level.moving_hazards()[0].rect, anchor);
    }

    #[test]
    fn text_roundtrip_is_exact() {
        let text = DEFAULT_LEVEL.join("\n");
        let map: LevelMap = text.parse().unwrap();
        assert_eq!(map, LevelMap::default());
        assert_eq!(map.to_string(), text);

        let ragged = "1__\n#\n?F";
        assert_eq!(ragged.parse::<LevelMap>().unwrap().to_string(), ragged);
    }
}
