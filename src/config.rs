//! Fixed gameplay constants. None of these can be changed at runtime.

use crate::snake::Cell;

/// Side of the square arena, in the same units as cell coordinates.
pub const ARENA_SIZE: i32 = 600;
/// Side of a single cell. Every coordinate is a multiple of this.
pub const CELL_SIZE: i32 = 20;
/// Number of cells along each axis.
pub const CELLS_PER_SIDE: i32 = ARENA_SIZE / CELL_SIZE;

pub const INITIAL_SPEED_MS: u64 = 200;
pub const SPEED_STEP_MS: u64 = 10;
/// Speed stops decreasing once it gets here.
pub const MIN_SPEED_MS: u64 = 50;

pub const SCORE_INCREMENT: u32 = 10;

/// Starting body, head first, heading right.
pub const START_CELLS: [Cell; 3] = [
    Cell { x: 160, y: 200 },
    Cell { x: 140, y: 200 },
    Cell { x: 120, y: 200 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_cells_fit_the_grid() {
        for cell in START_CELLS.iter() {
            assert!(cell.is_in_arena());
            assert_eq!(cell.x % CELL_SIZE, 0);
            assert_eq!(cell.y % CELL_SIZE, 0);
        }
        assert_eq!(CELLS_PER_SIDE, 30);
    }
}
