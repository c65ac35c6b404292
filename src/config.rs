use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snake::Position;

/// Distance the head advances per step, in grid units.
pub const MOVE_INCREMENT: i32 = 20;

/// Moves per second at speed level 1.
pub const BASE_MOVES_PER_SECOND: u64 = 5;

/// Score needed per speed level increase.
pub const POINTS_PER_SPEED_LEVEL: u32 = 5;

/// Speed level of a fresh game.
pub const INITIAL_SPEED_LEVEL: u32 = 1;

/// Number of random draws before food placement falls back to a full scan.
pub const FOOD_SAMPLE_ATTEMPTS: usize = 256;

/// Inclusive range of lattice indices; a cell coordinate is `index * increment`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub first: i32,
    pub last: i32,
}

impl CellRange {
    #[must_use]
    pub fn len(self) -> usize {
        usize::try_from(i64::from(self.last) - i64::from(self.first) + 1).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Board geometry shared by the engine and the renderer.
///
/// Walls sit on the lattice: a head whose coordinate reaches a wall value on
/// either axis has left the board. Food only ever appears inside the
/// `food_columns` x `food_rows` interior, which excludes the wall lines and the
/// score strip along the top edge.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    pub move_increment: i32,
    pub wall_left: i32,
    pub wall_right: i32,
    pub wall_top: i32,
    pub wall_bottom: i32,
    pub food_columns: CellRange,
    pub food_rows: CellRange,
    pub start_head: Position,
    pub initial_length: usize,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            move_increment: MOVE_INCREMENT,
            wall_left: 0,
            wall_right: 600,
            wall_top: 20,
            wall_bottom: 620,
            food_columns: CellRange { first: 1, last: 29 },
            food_rows: CellRange { first: 3, last: 30 },
            start_head: Position { x: 100, y: 100 },
            initial_length: 3,
        }
    }
}

impl BoardGeometry {
    /// Returns true when `position` lies on or beyond a wall line.
    #[must_use]
    pub fn hits_wall(&self, position: Position) -> bool {
        position.x <= self.wall_left
            || position.x >= self.wall_right
            || position.y <= self.wall_top
            || position.y >= self.wall_bottom
    }

    /// Starting body, head first, trailing to the left of the head.
    #[must_use]
    pub fn initial_segments(&self) -> Vec<Position> {
        (0..self.initial_length)
            .map(|offset| {
                let offset = i32::try_from(offset).unwrap_or(i32::MAX);
                Position {
                    x: self
                        .start_head
                        .x
                        .saturating_sub(self.move_increment.saturating_mul(offset)),
                    y: self.start_head.y,
                }
            })
            .collect()
    }

    /// Returns the cell at lattice indices `(column, row)` of the food interior.
    #[must_use]
    pub fn food_cell(&self, column: i32, row: i32) -> Position {
        Position {
            x: column.saturating_mul(self.move_increment),
            y: row.saturating_mul(self.move_increment),
        }
    }

    /// Iterates every cell food may occupy, row by row.
    pub fn food_cells(&self) -> impl Iterator<Item = Position> + '_ {
        let columns = self.food_columns;
        (self.food_rows.first..=self.food_rows.last).flat_map(move |row| {
            (columns.first..=columns.last).map(move |column| self.food_cell(column, row))
        })
    }

    /// Total number of cells food may occupy.
    #[must_use]
    pub fn food_cell_count(&self) -> usize {
        self.food_columns.len().saturating_mul(self.food_rows.len())
    }

    /// Number of lattice columns strictly between the side walls.
    #[must_use]
    pub fn inner_columns(&self) -> u16 {
        lattice_span(self.wall_left, self.wall_right, self.move_increment)
    }

    /// Number of lattice rows strictly between the top and bottom walls.
    #[must_use]
    pub fn inner_rows(&self) -> u16 {
        lattice_span(self.wall_top, self.wall_bottom, self.move_increment)
    }

    /// Zero-based `(column, row)` of a cell relative to the first inner cell.
    #[must_use]
    pub fn inner_offset(&self, position: Position) -> Option<(u16, u16)> {
        if self.move_increment <= 0 || self.hits_wall(position) {
            return None;
        }
        let column = position.x.saturating_sub(self.wall_left) / self.move_increment - 1;
        let row = position.y.saturating_sub(self.wall_top) / self.move_increment - 1;
        Some((u16::try_from(column).ok()?, u16::try_from(row).ok()?))
    }

    /// Checks every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let step = self.move_increment;
        if step <= 0 {
            return Err(GeometryError::NonPositiveIncrement(step));
        }
        if self.wall_left >= self.wall_right || self.wall_top >= self.wall_bottom {
            return Err(GeometryError::WallsOutOfOrder);
        }
        for wall in [
            self.wall_left,
            self.wall_right,
            self.wall_top,
            self.wall_bottom,
        ] {
            if wall.rem_euclid(step) != 0 {
                return Err(GeometryError::OffLattice(wall));
            }
        }
        if self.food_columns.is_empty() || self.food_rows.is_empty() {
            return Err(GeometryError::EmptyFoodArea);
        }
        for (column, row) in [
            (self.food_columns.first, self.food_rows.first),
            (self.food_columns.last, self.food_rows.last),
        ] {
            let corner = Position {
                x: column.checked_mul(step).ok_or(GeometryError::Overflow)?,
                y: row.checked_mul(step).ok_or(GeometryError::Overflow)?,
            };
            if self.hits_wall(corner) {
                return Err(GeometryError::FoodOutsideWalls);
            }
        }
        if self.initial_length == 0 {
            return Err(GeometryError::EmptySnake);
        }
        if self.food_cell_count() <= self.initial_length {
            return Err(GeometryError::NoRoomForFood);
        }
        for coordinate in [self.start_head.x, self.start_head.y] {
            if coordinate.rem_euclid(step) != 0 {
                return Err(GeometryError::OffLattice(coordinate));
            }
        }

        // The body is one straight row, so its two ends bound every segment.
        let tail_offset = i32::try_from(self.initial_length - 1)
            .ok()
            .and_then(|offset| offset.checked_mul(step))
            .ok_or(GeometryError::Overflow)?;
        let tail = Position {
            x: self
                .start_head
                .x
                .checked_sub(tail_offset)
                .ok_or(GeometryError::Overflow)?,
            y: self.start_head.y,
        };
        if self.hits_wall(self.start_head) || self.hits_wall(tail) {
            return Err(GeometryError::SnakeOutsideWalls);
        }
        Ok(())
    }
}

fn lattice_span(low: i32, high: i32, step: i32) -> u16 {
    if step <= 0 {
        return 0;
    }
    let span = (i64::from(high) - i64::from(low)) / i64::from(step) - 1;
    u16::try_from(span.max(0)).unwrap_or(u16::MAX)
}

/// Reasons a board geometry is rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum GeometryError {
    #[error("movement increment must be positive, got {0}")]
    NonPositiveIncrement(i32),
    #[error("walls must satisfy left < right and top < bottom")]
    WallsOutOfOrder,
    #[error("coordinate {0} is not a multiple of the movement increment")]
    OffLattice(i32),
    #[error("food area is empty")]
    EmptyFoodArea,
    #[error("food area reaches past the walls")]
    FoodOutsideWalls,
    #[error("initial snake length must be at least one")]
    EmptySnake,
    #[error("initial snake does not fit between the walls")]
    SnakeOutsideWalls,
    #[error("food area has no room beside the initial snake")]
    NoRoomForFood,
    #[error("a board coordinate does not fit in 32 bits")]
    Overflow,
}

/// Errors raised while loading a geometry file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read geometry file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse geometry file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid geometry: {0}")]
    Invalid(#[from] GeometryError),
}

/// Loads and validates a geometry file. Missing fields keep their defaults.
pub fn load_geometry(path: &Path) -> Result<BoardGeometry, ConfigError> {
    let raw = fs::read_to_string(path)?;
    parse_geometry(&raw)
}

/// Parses and validates geometry JSON.
pub fn parse_geometry(raw: &str) -> Result<BoardGeometry, ConfigError> {
    let geometry: BoardGeometry = serde_json::from_str(raw)?;
    geometry.validate()?;
    Ok(geometry)
}

/// Maps a speed level to the wall-clock interval between steps.
///
/// Level 1 moves at the base rate; every further level adds one move per
/// second. The interval never grows as the level rises.
#[must_use]
pub fn tick_interval_for_speed(speed_level: u32) -> Duration {
    let moves_per_second = BASE_MOVES_PER_SECOND + u64::from(speed_level.saturating_sub(1));
    Duration::from_millis((1000 / moves_per_second).max(1))
}

/// Colors used by the terminal renderer.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub hud_status: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake on black with a slate border.
pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::Rgb(0x52, 0x5d, 0x69),
    hud_score: Color::White,
    hud_status: Color::DarkGray,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Each grid cell is drawn two terminal columns wide so it looks square.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_FOOD: &str = "●";
