//! Grid evolution engine: one Game of Life step over a bounded grid.
//!
//! Cells outside the grid are dead. There is no wrap-around: a cell on the
//! last column never sees the first column as a neighbor.

use crate::core::types::Grid;

/// Offsets of the 8 cells surrounding a position.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Apply one step of the transition rule to every cell of `grid`.
///
/// Returns a freshly allocated grid with the same row lengths as the input,
/// and `true` if that grid has no living cells. An empty input yields an
/// empty grid and `true`.
pub fn next_generation(grid: &[Vec<bool>]) -> (Grid, bool) {
    let next: Grid = grid
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, &alive)| next_state(alive, live_neighbors(grid, row, col)))
                .collect::<Vec<_>>()
        })
        .collect();
    let extinct = is_extinct(&next);
    (next, extinct)
}

/// Next state of a single cell given its current state and live neighbor count.
pub fn next_state(alive: bool, live_neighbors: usize) -> bool {
    match live_neighbors {
        3 => true,
        2 => alive,
        _ => false,
    }
}

/// Count live cells among the 8 positions around `(row, col)`.
///
/// Positions outside `[0, grid.len())` or outside the bounds of their own row
/// count as dead.
pub fn live_neighbors(grid: &[Vec<bool>], row: usize, col: usize) -> usize {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dr, dc)| cell_at(grid, row.checked_add_signed(dr), col.checked_add_signed(dc)))
        .count()
}

fn cell_at(grid: &[Vec<bool>], row: Option<usize>, col: Option<usize>) -> bool {
    match (row, col) {
        (Some(row), Some(col)) => grid
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false),
        _ => false,
    }
}

/// Number of live cells in `grid`.
pub fn population(grid: &[Vec<bool>]) -> usize {
    grid.iter()
        .map(|cells| cells.iter().filter(|&&alive| alive).count())
        .sum()
}

/// True if `grid` has no live cells.
pub fn is_extinct(grid: &[Vec<bool>]) -> bool {
    population(grid) == 0
}
