use std::time::{Duration, Instant};

use crate::{Coords, TermInt};
use crate::config::CELLS_PER_SIDE;
use crate::engine::{Engine, GameState, Notification};
use crate::snake::{Cell, Direction::{*, self}};
use crate::term::TermManager;

use anyhow::Result;
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::info;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';

/// Each cell takes two columns so the arena looks square.
const CELL_COLS: TermInt = 2;
const ARENA_COLS: TermInt = CELLS_PER_SIDE as TermInt * CELL_COLS + 2;
const ARENA_ROWS: TermInt = CELLS_PER_SIDE as TermInt + 2;
/// Arena box plus the score line above it.
const SCREEN_ROWS: TermInt = ARENA_ROWS + 1;

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Turn(Direction),
    Start,
    Restart,
    Quit,
    Ignored,
}

/// Terminal front end. Reads keys, forwards them to the engine and draws
/// whatever the engine reports.
pub struct SnakeGame {
    term: TermManager,
    engine: Engine,
    /// Top-left corner of the score line; the arena box sits right below it.
    origin: Coords,
    drawn: Vec<Cell>,
    final_score: u32,
}

impl SnakeGame {
    pub fn new(seed: Option<u64>) -> Result<Self> {
        Ok(SnakeGame {
            term: TermManager::new()?,
            engine: Engine::new(seed),
            origin: (0, 0),
            drawn: vec![],
            final_score: 0,
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.require_size(ARENA_COLS, SCREEN_ROWS)?;

        let (w, h) = self.term.get_terminal_size();
        self.origin = ((w - ARENA_COLS) / 2, (h - SCREEN_ROWS) / 2);

        self.term.setup()
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Plays games back to back until the player quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if !self.show_intro()? || !self.play()? || !self.show_game_over()? {
                info!("Player quit");
                return Ok(());
            }

            self.engine.restart();
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Returns false if the player quit instead of starting.
    fn show_intro(&mut self) -> Result<bool> {
        self.term.clear()?;
        self.drawn.clear();
        self.term.draw_borders((self.origin.0, self.origin.1 + 1), (ARENA_COLS, ARENA_ROWS))?;
        self.present()?;

        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "CTRL+C or Q to quit",
            "",
            "Press Enter or Space to start"
        ])?;

        loop {
            match key_action(&self.term.read_key_blocking()?) {
                KeyAction::Quit => return Ok(false),
                KeyAction::Start => break,
                _ => {}
            }
        }

        self.term.hide_message()?;
        self.engine.start(Instant::now());
        self.present()?;
        Ok(true)
    }

    /// Runs one game until it ends. Returns false if the player quit mid-game.
    fn play(&mut self) -> Result<bool> {
        while self.engine.state() == GameState::Running {
            let wait = self.engine.time_until_tick(Instant::now()).unwrap_or_else(|| Duration::from_millis(0));

            for key_ev in self.term.read_key_events(wait)? {
                match key_action(&key_ev) {
                    KeyAction::Quit => return Ok(false),
                    KeyAction::Turn(dir) => { self.engine.set_heading(dir); },
                    _ => {}
                }
            }

            self.engine.poll(Instant::now());
            self.present()?;
        }

        Ok(true)
    }

    /// Returns false if the player quit instead of restarting.
    fn show_game_over(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Game over!",
            &*format!("Your Score: {}", self.final_score),
            "",
            "Press R to restart,",
            "or CTRL+C to quit."
        ])?;

        loop {
            match key_action(&self.term.read_key_blocking()?) {
                KeyAction::Quit => return Ok(false),
                KeyAction::Restart | KeyAction::Start => return Ok(true),
                _ => {}
            }
        }
    }

    /// Applies every queued engine notification to the screen.
    fn present(&mut self) -> Result<()> {
        for notification in self.engine.take_notifications() {
            match notification {
                Notification::Render => self.draw_board()?,
                Notification::ScoreChanged(score) => {
                    let text = format!("Score: {}", score);
                    self.term.print_line(self.origin, &text, ARENA_COLS)?;
                },
                Notification::GameOver(score) => self.final_score = score,
            }
        }

        self.term.flush()
    }

    fn draw_board(&mut self) -> Result<()> {
        for cell in std::mem::take(&mut self.drawn) {
            self.print_cell(cell, ' ')?;
        }

        let food = self.engine.food();
        let snake: Vec<Cell> = self.engine.snake().cells().copied().collect();
        let head_char = self.engine.heading().head_char();

        self.print_cell(food, FOOD_CHAR)?;
        for (i, cell) in snake.iter().enumerate() {
            let ch = if i == 0 {head_char} else {SNAKE_BODY_CHAR};
            self.print_cell(*cell, ch)?;
        }

        self.drawn = snake;
        self.drawn.push(food);
        Ok(())
    }

    fn print_cell(&mut self, cell: Cell, ch: char) -> Result<()> {
        let pos = self.cell_to_term(cell);
        for col in 0..CELL_COLS {
            self.term.print_at((pos.0 + col, pos.1), ch)?;
        }

        Ok(())
    }

    fn cell_to_term(&self, cell: Cell) -> Coords {
        let (col, row) = cell.grid_pos();
        (
            self.origin.0 + 1 + col as TermInt * CELL_COLS,
            self.origin.1 + 2 + row as TermInt,
        )
    }
}

fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Turn(Right),
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Start,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        _ => KeyAction::Ignored,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(key_action(&key(KeyCode::Up)), KeyAction::Turn(Up));
        assert_eq!(key_action(&key(KeyCode::Char('a'))), KeyAction::Turn(Left));
        assert_eq!(key_action(&key(KeyCode::Char('S'))), KeyAction::Turn(Down));
        assert_eq!(key_action(&key(KeyCode::Right)), KeyAction::Turn(Right));
    }

    #[test]
    fn lifecycle_keys() {
        assert_eq!(key_action(&key(KeyCode::Enter)), KeyAction::Start);
        assert_eq!(key_action(&key(KeyCode::Char(' '))), KeyAction::Start);
        assert_eq!(key_action(&key(KeyCode::Char('r'))), KeyAction::Restart);
        assert_eq!(key_action(&key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(key_action(&key(KeyCode::Tab)), KeyAction::Ignored);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(key_action(&ev), KeyAction::Quit);
        // Plain 'c' does nothing
        assert_eq!(key_action(&key(KeyCode::Char('c'))), KeyAction::Ignored);
    }

    #[test]
    fn arena_fits_a_classic_terminal_width() {
        assert_eq!(ARENA_COLS, 62);
        assert_eq!(SCREEN_ROWS, 33);
    }
}
