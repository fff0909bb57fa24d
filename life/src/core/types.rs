//! Shared board types.
//!
//! These types are the contract between the engine, the board manager and
//! the persistence port. The serialized form of [`Board`] is the stored
//! record shape (`schemas/board/v1.schema.json`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid of cells, addressed `grid[row][col]`. `true` is alive.
///
/// Rows may differ in length; neighbor lookups are bounded per row.
pub type Grid = Vec<Vec<bool>>;

/// Store-assigned board identifier. Unique and immutable once allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted board record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Current cells.
    pub cells: Grid,
    /// Number of steps applied since creation.
    pub generation: u64,
    /// Population is extinct. A final board is never stepped again.
    #[serde(rename = "final")]
    pub is_final: bool,
}

impl Board {
    /// A freshly created board: generation 0, not final.
    ///
    /// Finality is not derived from `cells`; an empty grid is only detected
    /// as final on its first advance.
    pub fn new(cells: Grid) -> Self {
        Self {
            cells,
            generation: 0,
            is_final: false,
        }
    }
}

/// Snapshot returned to callers after a read or an advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub id: BoardId,
    pub cells: Grid,
    pub generation: u64,
    #[serde(rename = "final")]
    pub is_final: bool,
}

impl BoardState {
    pub fn from_board(id: BoardId, board: Board) -> Self {
        Self {
            id,
            cells: board.cells,
            generation: board.generation,
            is_final: board.is_final,
        }
    }
}
