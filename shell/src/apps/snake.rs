//! Snake on a 15×15 grid.
//!
//! [`SnakeGame`] is the pure board; [`SnakeApp`] wires it to the window's
//! key listener and game-loop timer.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use shared_types::AppInput;

use super::{AppContext, AppError, Application, KeyOutcome, TeardownHandle};
use crate::config::ShellConfig;
use crate::keys::Key;
use crate::resources::{ListenerToken, TimerId};

pub const CANVAS_SIZE: i32 = 300;
pub const CELL_SIZE: i32 = 20;
pub const TILE_COUNT: i32 = CANVAS_SIZE / CELL_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No direction chosen yet, or the game is already over
    Idle,
    Moved,
    Ate,
    GameOver,
}

#[derive(Debug)]
pub struct SnakeGame {
    snake: VecDeque<Cell>,
    food: Cell,
    direction: (i32, i32),
    score: u32,
    game_over: bool,
    food_retries: usize,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(food_retries: usize, rng: StdRng) -> Self {
        let mut game = Self {
            snake: VecDeque::new(),
            food: Cell { x: 0, y: 0 },
            direction: (0, 0),
            score: 0,
            game_over: false,
            food_retries,
            rng,
        };
        game.reset();
        game
    }

    pub fn reset(&mut self) {
        let centre = TILE_COUNT / 2;
        self.snake = VecDeque::from([Cell {
            x: centre,
            y: centre,
        }]);
        self.direction = (0, 0);
        self.score = 0;
        self.game_over = false;
        if !self.place_food() {
            self.game_over = true;
        }
    }

    pub fn head(&self) -> Cell {
        self.snake.front().copied().unwrap_or(Cell { x: 0, y: 0 })
    }

    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn is_stationary(&self) -> bool {
        self.direction == (0, 0)
    }

    pub fn direction(&self) -> (i32, i32) {
        self.direction
    }

    /// Change direction unless it reverses the current one. Returns whether the
    /// direction was accepted.
    pub fn steer(&mut self, (dx, dy): (i32, i32)) -> bool {
        if self.game_over {
            return false;
        }
        let (cx, cy) = self.direction;
        if (dx != 0 && dx == -cx) || (dy != 0 && dy == -cy) {
            return false;
        }
        self.direction = (dx, dy);
        true
    }

    pub fn step(&mut self) -> StepOutcome {
        if self.game_over || self.is_stationary() {
            return StepOutcome::Idle;
        }
        let head = self.head();
        let next = Cell {
            x: head.x + self.direction.0,
            y: head.y + self.direction.1,
        };
        self.snake.push_front(next);

        let mut outcome = StepOutcome::Moved;
        if next == self.food {
            self.score += 1;
            outcome = StepOutcome::Ate;
            if !self.place_food() {
                self.game_over = true;
                return StepOutcome::GameOver;
            }
        } else {
            self.snake.pop_back();
        }

        let outside = !(0..TILE_COUNT).contains(&next.x) || !(0..TILE_COUNT).contains(&next.y);
        let bitten = self.snake.iter().skip(1).any(|segment| *segment == next);
        if outside || bitten {
            self.game_over = true;
            return StepOutcome::GameOver;
        }
        outcome
    }

    fn occupied(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    /// Random free cell, falling back to a scan after `food_retries` misses.
    /// Returns false when the board is full.
    fn place_food(&mut self) -> bool {
        for _ in 0..self.food_retries {
            let candidate = Cell {
                x: self.rng.random_range(0..TILE_COUNT),
                y: self.rng.random_range(0..TILE_COUNT),
            };
            if !self.occupied(candidate) {
                self.food = candidate;
                return true;
            }
        }

        let free: Vec<Cell> = (0..TILE_COUNT)
            .flat_map(|y| (0..TILE_COUNT).map(move |x| Cell { x, y }))
            .filter(|cell| !self.occupied(*cell))
            .collect();
        if free.is_empty() {
            return false;
        }
        self.food = free[self.rng.random_range(0..free.len())];
        true
    }
}

#[derive(Debug)]
pub struct SnakeApp {
    game: SnakeGame,
    tick: Duration,
    game_loop: Option<TimerId>,
    listener: Option<ListenerToken>,
}

impl SnakeApp {
    pub fn new(config: &ShellConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_rng(config: &ShellConfig, rng: StdRng) -> Self {
        Self {
            game: SnakeGame::new(config.food_placement_retries, rng),
            tick: config.snake_tick,
            game_loop: None,
            listener: None,
        }
    }

    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    pub fn is_running(&self) -> bool {
        self.game_loop.is_some()
    }

    fn start_loop(&mut self, cx: &mut AppContext<'_>) {
        self.stop_loop(cx);
        self.game_loop = Some(cx.start_timer(self.tick));
    }

    fn stop_loop(&mut self, cx: &mut AppContext<'_>) {
        if let Some(timer) = self.game_loop.take() {
            cx.cancel_timer(timer);
        }
    }
}

impl Application for SnakeApp {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        self.listener = Some(cx.listen_keys());
        cx.teardown()
    }

    fn on_input(&mut self, cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError> {
        match input {
            AppInput::Restart => {
                self.game.reset();
                if self.listener.is_none() {
                    self.listener = Some(cx.listen_keys());
                }
                self.start_loop(cx);
                tracing::info!(window_id = %cx.window_id(), "Snake restarted");
                Ok(())
            }
            other => Err(AppError::unsupported("snake", &other)),
        }
    }

    fn on_key(&mut self, cx: &mut AppContext<'_>, key: &Key) -> KeyOutcome {
        if self.game.is_over() {
            return KeyOutcome::Ignored;
        }
        let Some(direction) = key.direction() else {
            return KeyOutcome::Ignored;
        };
        if self.game.is_stationary() && self.game_loop.is_none() {
            self.start_loop(cx);
        }
        self.game.steer(direction);
        KeyOutcome::Consumed
    }

    fn on_timer(&mut self, cx: &mut AppContext<'_>, timer: TimerId) {
        if self.game_loop != Some(timer) {
            return;
        }
        match self.game.step() {
            StepOutcome::GameOver => {
                self.stop_loop(cx);
                tracing::info!(
                    window_id = %cx.window_id(),
                    score = self.game.score(),
                    "Snake game over"
                );
            }
            StepOutcome::Ate => {
                tracing::debug!(score = self.game.score(), "Snake ate");
            }
            StepOutcome::Moved | StepOutcome::Idle => {}
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "snake": self.game.snake(),
            "food": self.game.food(),
            "score": self.game.score(),
            "game_over": self.game.is_over(),
            "running": self.is_running(),
            "grid": { "tiles": TILE_COUNT, "cell": CELL_SIZE },
        })
    }
}
