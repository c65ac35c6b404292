use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{BoardGeometry, INITIAL_SPEED_LEVEL, POINTS_PER_SPEED_LEVEL};
use crate::food;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
    /// The snake covers every cell food could use.
    Victory,
}

/// What ended the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    Wall,
    SelfCollision,
}

/// Read-only copy of the engine state, taken between steps.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    /// Body cells, head first.
    pub snake: Vec<Position>,
    /// `None` only once the board is full.
    pub food: Option<Position>,
    pub direction: Direction,
    pub score: u32,
    pub speed_level: u32,
    pub tick_count: u64,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
}

impl GameState {
    /// Returns the head cell.
    #[must_use]
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    /// Returns true once the game has reached a terminal status.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }
}

/// Owns one game and advances it one tick at a time.
///
/// Callers steer with [`GameEngine::set_direction`] and advance with
/// [`GameEngine::step`]; after a terminal status every call is a no-op.
#[derive(Debug, Clone)]
pub struct GameEngine {
    geometry: BoardGeometry,
    snake: Snake,
    food: Option<Position>,
    score: u32,
    speed_level: u32,
    tick_count: u64,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    rng: StdRng,
}

impl GameEngine {
    /// Creates a game seeded from system entropy.
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        Self::with_rng(geometry, StdRng::from_entropy())
    }

    /// Creates a deterministic game for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(geometry: BoardGeometry, seed: u64) -> Self {
        Self::with_rng(geometry, StdRng::seed_from_u64(seed))
    }

    /// Creates a deterministic game from an explicit snake and food cell.
    ///
    /// A food cell that lands on the snake is replaced by a random free one.
    #[must_use]
    pub fn with_layout(geometry: BoardGeometry, snake: Snake, food: Position, seed: u64) -> Self {
        let mut engine = Self::from_parts(geometry, snake, StdRng::seed_from_u64(seed));
        if engine.snake.occupies(food) {
            engine.respawn_food();
        } else {
            engine.food = Some(food);
        }
        engine
    }

    fn with_rng(geometry: BoardGeometry, rng: StdRng) -> Self {
        let snake = Snake::from_segments(geometry.initial_segments(), Direction::Right)
            .unwrap_or_else(|| Snake::new(geometry.start_head, Direction::Right));
        let mut engine = Self::from_parts(geometry, snake, rng);
        engine.respawn_food();
        engine
    }

    fn from_parts(geometry: BoardGeometry, snake: Snake, rng: StdRng) -> Self {
        Self {
            geometry,
            snake,
            food: None,
            score: 0,
            speed_level: INITIAL_SPEED_LEVEL,
            tick_count: 0,
            status: GameStatus::Playing,
            death_reason: None,
            rng,
        }
    }

    /// Requests a turn for the next step.
    ///
    /// A reversal of the pending direction is ignored, as is any input after
    /// the game has ended. Between two steps the last accepted direction wins.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.is_over() {
            return;
        }
        if !self.snake.steer(direction) {
            debug!("ignored reversing turn {direction:?}");
        }
    }

    /// Advances the game by one tick: move, collide, then eat.
    pub fn step(&mut self) {
        if self.is_over() {
            return;
        }

        self.tick_count += 1;
        let increment = self.geometry.move_increment;
        let eats = self.food == Some(self.snake.next_head_position(increment));
        if eats {
            self.snake.grow_next();
        }
        self.snake.move_forward(increment);

        let head = self.snake.head();
        if self.geometry.hits_wall(head) {
            self.end(GameStatus::GameOver, Some(DeathReason::Wall));
            return;
        }
        if self.snake.head_overlaps_body() {
            self.end(GameStatus::GameOver, Some(DeathReason::SelfCollision));
            return;
        }

        if eats {
            self.consume_food();
        }
    }

    /// Returns true once the game has reached a terminal status.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    /// Copies the observable state for rendering and driving decisions.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        GameState {
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.snake.heading(),
            score: self.score,
            speed_level: self.speed_level,
            tick_count: self.tick_count,
            status: self.status,
            death_reason: self.death_reason,
        }
    }

    /// Geometry this game was created with.
    #[must_use]
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    fn consume_food(&mut self) {
        self.score += 1;
        debug!("food eaten at {:?}, score {}", self.snake.head(), self.score);

        if self.score % POINTS_PER_SPEED_LEVEL == 0 {
            self.speed_level += 1;
            info!("speed level {} reached", self.speed_level);
        }

        self.respawn_food();
    }

    fn respawn_food(&mut self) {
        self.food = food::spawn_position(&mut self.rng, &self.geometry, &self.snake);
        match self.food {
            Some(position) => debug!("food placed at {position:?}"),
            None => self.end(GameStatus::Victory, None),
        }
    }

    fn end(&mut self, status: GameStatus, death_reason: Option<DeathReason>) {
        self.status = status;
        self.death_reason = death_reason;
        info!(
            "game ended: {status:?} ({death_reason:?}) score {} length {} after {} ticks",
            self.score,
            self.snake.len(),
            self.tick_count
        );
    }
}
