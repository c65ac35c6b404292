use log::warn;
use rand::Rng;

use crate::config::{BoardGeometry, FOOD_SAMPLE_ATTEMPTS};
use crate::snake::{Position, Snake};

/// Draws one uniformly random food-area cell, occupied or not.
#[must_use]
pub fn sample_position<R: Rng + ?Sized>(rng: &mut R, geometry: &BoardGeometry) -> Position {
    let column = rng.gen_range(geometry.food_columns.first..=geometry.food_columns.last);
    let row = rng.gen_range(geometry.food_rows.first..=geometry.food_rows.last);
    geometry.food_cell(column, row)
}

/// Picks a food cell not covered by the snake.
///
/// Rejection sampling handles the usual sparse board. After
/// `FOOD_SAMPLE_ATTEMPTS` misses the free cells are enumerated instead, so the
/// search always terminates. Returns `None` when the snake covers the whole
/// food area.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    geometry: &BoardGeometry,
    snake: &Snake,
) -> Option<Position> {
    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let candidate = sample_position(rng, geometry);
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    warn!(
        "food sampling missed {FOOD_SAMPLE_ATTEMPTS} times at length {}, scanning free cells",
        snake.len()
    );
    scan_free_position(rng, geometry, snake)
}

fn scan_free_position<R: Rng + ?Sized>(
    rng: &mut R,
    geometry: &BoardGeometry,
    snake: &Snake,
) -> Option<Position> {
    let candidates: Vec<Position> = geometry
        .food_cells()
        .filter(|cell| !snake.occupies(*cell))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
