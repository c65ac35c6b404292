use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::input::{Direction, direction_change_is_valid};

/// Grid cell in board units; neighbouring cells differ by one movement increment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns the neighbouring cell `step` units away in `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction, step: i32) -> Self {
        match direction {
            Direction::Up => Self {
                x: self.x,
                y: self.y.saturating_sub(step),
            },
            Direction::Down => Self {
                x: self.x,
                y: self.y.saturating_add(step),
            },
            Direction::Left => Self {
                x: self.x.saturating_sub(step),
                y: self.y,
            },
            Direction::Right => Self {
                x: self.x.saturating_add(step),
                y: self.y,
            },
        }
    }
}

/// Snake body (head first) plus its steering state.
///
/// `heading` is the direction of the last completed move, `pending` the one
/// the next move will use. They only differ between a turn being accepted and
/// the following step.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Direction,
    pending: Direction,
    grow: bool,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([start]),
            heading: direction,
            pending: direction,
            grow: false,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` for an empty body.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: VecDeque::from(segments),
            heading: direction,
            pending: direction,
            grow: false,
        })
    }

    /// Keeps the tail on the next move.
    pub fn grow_next(&mut self) {
        self.grow = true;
    }

    /// Applies one move in the pending direction.
    pub fn move_forward(&mut self, step: i32) {
        let next_head = self.next_head_position(step);
        self.heading = self.pending;

        self.body.push_front(next_head);
        if !self.grow {
            let _ = self.body.pop_back();
        }
        self.grow = false;
    }

    /// Returns the head position for the next move.
    #[must_use]
    pub fn next_head_position(&self, step: i32) -> Position {
        self.head().offset(self.pending, step)
    }

    /// Accepts `direction` for the next move unless it reverses the pending
    /// one. Returns whether it was accepted; the last accepted turn wins.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.pending, direction) {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    /// Direction of the last completed move.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::{Position, Snake};

    const STEP: i32 = 20;

    fn starting_snake() -> Snake {
        Snake::from_segments(
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Direction::Right,
        )
        .expect("non-empty body")
    }

    fn body(snake: &Snake) -> Vec<Position> {
        snake.segments().copied().collect()
    }

    #[test]
    fn empty_body_is_rejected() {
        assert!(Snake::from_segments(Vec::new(), Direction::Up).is_none());
    }

    #[test]
    fn one_cell_snake_moves_one_increment() {
        let mut snake = Snake::new(Position { x: 40, y: 40 }, Direction::Down);

        snake.move_forward(STEP);

        assert_eq!(body(&snake), vec![Position { x: 40, y: 60 }]);
    }

    #[test]
    fn snake_moves_one_increment_per_step() {
        let mut snake = starting_snake();

        snake.move_forward(STEP);

        assert_eq!(
            body(&snake),
            vec![
                Position { x: 120, y: 100 },
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
            ]
        );
    }

    #[test]
    fn snake_growth_keeps_previous_tail() {
        let mut snake = starting_snake();

        snake.grow_next();
        snake.move_forward(STEP);

        assert_eq!(snake.len(), 4);
        assert_eq!(body(&snake).last(), Some(&Position { x: 60, y: 100 }));

        snake.move_forward(STEP);
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn steer_rejects_reverse() {
        let mut snake = starting_snake();

        assert!(!snake.steer(Direction::Left));
        snake.move_forward(STEP);

        assert_eq!(snake.head(), Position { x: 120, y: 100 });
    }

    #[test]
    fn steer_rejects_reversal_of_pending_turn() {
        let mut snake = starting_snake();

        assert!(snake.steer(Direction::Up));
        assert!(!snake.steer(Direction::Down));
        snake.move_forward(STEP);

        assert_eq!(snake.head(), Position { x: 100, y: 80 });
    }

    #[test]
    fn perpendicular_turn_after_pending_turn_is_accepted() {
        let mut snake = starting_snake();

        assert!(snake.steer(Direction::Up));
        assert!(snake.steer(Direction::Left));
        snake.move_forward(STEP);

        assert_eq!(snake.head(), Position { x: 80, y: 100 });
        assert_eq!(snake.heading(), Direction::Left);
        assert!(snake.head_overlaps_body());
    }

    #[test]
    fn last_accepted_turn_wins() {
        let mut snake = starting_snake();

        assert!(snake.steer(Direction::Up));
        assert!(snake.steer(Direction::Right));
        assert!(snake.steer(Direction::Down));
        snake.move_forward(STEP);

        assert_eq!(snake.head(), Position { x: 100, y: 120 });
        assert_eq!(snake.heading(), Direction::Down);
    }

    #[test]
    fn head_overlap_ignores_head_itself() {
        let snake = Snake::from_segments(
            vec![
                Position { x: 40, y: 40 },
                Position { x: 40, y: 60 },
                Position { x: 40, y: 40 },
            ],
            Direction::Up,
        )
        .expect("non-empty body");

        assert!(snake.head_overlaps_body());
        assert!(!starting_snake().head_overlaps_body());
    }
}
