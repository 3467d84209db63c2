use std::collections::VecDeque;

use crate::config::{ARENA_SIZE, CELL_SIZE, START_CELLS};
use Direction::*;

/// A grid cell, in arena units. Both coordinates are multiples of `CELL_SIZE`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.vector();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn is_in_arena(&self) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < ARENA_SIZE && self.y < ARENA_SIZE
    }

    /// Column and row of this cell on the grid.
    pub fn grid_pos(&self) -> (i32, i32) {
        (self.x / CELL_SIZE, self.y / CELL_SIZE)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Movement per tick. Exactly one component is non-zero, with magnitude `CELL_SIZE`.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Up => (0, -CELL_SIZE),
            Down => (0, CELL_SIZE),
            Left => (-CELL_SIZE, 0),
            Right => (CELL_SIZE, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Snake body, head at the front.
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least a head");
        Snake { body }
    }

    pub fn starting() -> Self {
        Snake::new(START_CELLS.iter().copied())
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether moving the head onto `cell` hits the body. The current tail is
    /// left out, since it moves away on the same tick.
    pub fn blocks(&self, cell: Cell) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|c| *c == cell)
    }

    /// Pushes a new head. Unless `grow` is set, the old tail is dropped and returned.
    pub fn advance(&mut self, new_head: Cell, grow: bool) -> Option<Cell> {
        self.body.push_front(new_head);

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}
