//! The game engine: owns every piece of game state and the single tick timer.
//!
//! The engine never draws anything. Each state transition queues a
//! [`Notification`] which the presentation layer drains with
//! [`Engine::take_notifications`], then reads [`Engine::snake`] and
//! [`Engine::food`] to render.

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{
    CELLS_PER_SIDE, CELL_SIZE, INITIAL_SPEED_MS, MIN_SPEED_MS, SCORE_INCREMENT, SPEED_STEP_MS,
};
use crate::snake::{Cell, Direction, Snake};
use crate::timer::TickTimer;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Running,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// Snake or food moved.
    Render,
    ScoreChanged(u32),
    GameOver(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing happened: the game is not running, or the tick was not due.
    Skipped,
    Moved,
    Ate,
    Crashed(Collision),
}

pub struct Engine {
    snake: Snake,
    food: Cell,
    /// Direction applied on the last tick.
    heading: Direction,
    /// Direction the next tick will apply.
    pending: Direction,
    score: u32,
    speed_ms: u64,
    state: GameState,
    timer: Option<TickTimer>,
    rng: StdRng,
    notifications: Vec<Notification>,
}

impl Engine {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut engine = Engine {
            snake: Snake::starting(),
            food: Cell::new(0, 0),
            heading: Direction::Right,
            pending: Direction::Right,
            score: 0,
            speed_ms: INITIAL_SPEED_MS,
            state: GameState::Idle,
            timer: None,
            rng,
            notifications: vec![],
        };
        engine.reset();
        engine
    }

    /// Puts the game back to its starting position, Idle and with no timer.
    pub fn reset(&mut self) {
        self.stop_timer();

        self.snake = Snake::starting();
        self.heading = Direction::Right;
        self.pending = Direction::Right;
        self.score = 0;
        self.speed_ms = INITIAL_SPEED_MS;
        self.state = GameState::Idle;

        // The starting snake always leaves room
        if let Some(food) = self.place_food() {
            self.food = food;
        }

        self.notifications.push(Notification::ScoreChanged(self.score));
        self.notifications.push(Notification::Render);
    }

    /// Begins ticking from Idle. Returns false if nothing changed.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != GameState::Idle {
            return false;
        }

        info!("Game started");
        self.state = GameState::Running;
        self.arm_timer(now);
        self.notifications.push(Notification::Render);
        true
    }

    /// Requests a heading for the next tick. A reversal of the heading in effect
    /// is ignored, as is any request while the game is not running.
    pub fn set_heading(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Running {
            return false;
        }

        if direction.is_opposite(self.heading) {
            debug!("Rejected heading {:?} while moving {:?}", direction, self.heading);
            return false;
        }

        self.pending = direction;
        true
    }

    /// Runs a tick if the timer is due.
    pub fn poll(&mut self, now: Instant) -> StepOutcome {
        let due = match self.timer.as_mut() {
            Some(timer) => timer.fire(now),
            None => false,
        };

        if due {
            self.step(now)
        } else {
            StepOutcome::Skipped
        }
    }

    /// One tick of the simulation.
    pub fn step(&mut self, now: Instant) -> StepOutcome {
        if self.state != GameState::Running {
            return StepOutcome::Skipped;
        }

        self.heading = self.pending;
        let new_head = self.snake.head().offset(self.heading);
        trace!("Tick: head {:?} -> {:?}", self.snake.head(), new_head);

        let collision = if !new_head.is_in_arena() {
            Some(Collision::Wall)
        } else if self.snake.blocks(new_head) {
            Some(Collision::SelfCollision)
        } else {
            None
        };

        if let Some(collision) = collision {
            info!("Crashed into {:?} at {:?}", collision, new_head);
            self.end();
            return StepOutcome::Crashed(collision);
        }

        let ate = new_head == self.food;
        self.snake.advance(new_head, ate);

        if !ate {
            self.notifications.push(Notification::Render);
            return StepOutcome::Moved;
        }

        self.score += SCORE_INCREMENT;
        self.notifications.push(Notification::ScoreChanged(self.score));

        match self.place_food() {
            Some(food) => {
                self.food = food;
                self.accelerate(now);
                self.notifications.push(Notification::Render);
            }
            None => {
                info!("No free cell left for food");
                self.notifications.push(Notification::Render);
                self.end();
            }
        }

        StepOutcome::Ate
    }

    /// Stops the timer and finishes the game. Does nothing if it is already over.
    pub fn end(&mut self) {
        if self.state == GameState::Over {
            return;
        }

        self.stop_timer();
        self.state = GameState::Over;
        info!("Game over, final score {}", self.score);
        self.notifications.push(Notification::GameOver(self.score));
    }

    /// From Over, starts a fresh game in the Idle state.
    pub fn restart(&mut self) -> bool {
        if self.state != GameState::Over {
            return false;
        }

        info!("Restarting");
        self.reset();
        true
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// How long until the next tick, if one is scheduled.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().map(|timer| timer.time_until_due(now))
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    ///////////////////////////////////////////////////////////////////////////

    fn accelerate(&mut self, now: Instant) {
        if self.speed_ms <= MIN_SPEED_MS {
            return;
        }

        self.speed_ms = self.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
        debug!("Speed is now {}ms", self.speed_ms);
        self.arm_timer(now);
    }

    fn arm_timer(&mut self, now: Instant) {
        // Replacing the option drops the old timer, so only one is ever live
        self.timer = Some(TickTimer::start(self.speed(), now));
    }

    fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            debug!("Tick timer stopped");
        }
    }

    fn place_food(&mut self) -> Option<Cell> {
        let free_cells = (CELLS_PER_SIDE * CELLS_PER_SIDE) as usize;
        if self.snake.len() >= free_cells {
            return None;
        }

        loop {
            let cell = Cell::new(
                self.rng.gen_range(0..CELLS_PER_SIDE) * CELL_SIZE,
                self.rng.gen_range(0..CELLS_PER_SIDE) * CELL_SIZE,
            );

            if !self.snake.contains(cell) {
                debug!("Food placed at {:?}", cell);
                return Some(cell);
            }
        }
    }
}
