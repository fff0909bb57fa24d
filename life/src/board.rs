//! Board lifecycle: creation and the "advance N steps, persist once" protocol.
//!
//! [`BoardManager`] is the only writer of board records. It reads a board,
//! runs the engine in memory, and writes the result back with a single save.
//! The read-advance-write sequence is not atomic: two concurrent advances of
//! the same board may both start from the same generation, and the later save
//! wins.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::engine::next_generation;
use crate::core::types::{Board, BoardId, BoardState, Grid};
use crate::io::store::{BoardStore, StoreError};

/// Failures surfaced by [`BoardManager`].
#[derive(Debug, Error)]
pub enum LifeError {
    #[error("board {0} not found")]
    NotFound(BoardId),

    #[error("{op}: {source}")]
    Persistence {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl LifeError {
    fn from_store(op: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            source => Self::Persistence { op, source },
        }
    }
}

/// Summary of a single in-memory advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Steps actually simulated: `min(requested, steps until extinction)`.
    pub applied: u64,
    /// Population died out during this advance.
    pub became_final: bool,
}

/// Step `board` forward by up to `steps` generations, stopping at extinction.
///
/// A final board is left untouched.
pub fn advance_board(board: &mut Board, steps: u64) -> AdvanceOutcome {
    let mut applied = 0;
    while applied < steps && !board.is_final {
        let (cells, extinct) = next_generation(&board.cells);
        board.cells = cells;
        board.is_final = extinct;
        board.generation += 1;
        applied += 1;
    }
    AdvanceOutcome {
        applied,
        became_final: applied > 0 && board.is_final,
    }
}

/// Owns board identity and advancement on top of a [`BoardStore`].
#[derive(Clone)]
pub struct BoardManager {
    store: Arc<dyn BoardStore>,
}

impl BoardManager {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Store `cells` as a new board at generation 0.
    ///
    /// No shape or liveness validation is done here; an already empty grid is
    /// stored as not final and detected on its first advance.
    pub fn create(&self, cells: Grid) -> Result<BoardId, LifeError> {
        let id = self
            .store
            .create(cells)
            .map_err(|err| LifeError::from_store("create", err))?;
        info!(%id, "board created");
        Ok(id)
    }

    /// Read a board without advancing it.
    pub fn get(&self, id: BoardId) -> Result<BoardState, LifeError> {
        self.advance(id, 0)
    }

    /// Advance board `id` by up to `steps` generations and persist the result.
    ///
    /// `steps == 0` or an already final board is a pure read: nothing is
    /// written. Otherwise the engine runs until `steps` are applied or the
    /// population dies out, followed by exactly one save. A failed save leaves
    /// the stored board as it was.
    pub fn advance(&self, id: BoardId, steps: u64) -> Result<BoardState, LifeError> {
        let mut board = self
            .store
            .get(id)
            .map_err(|err| LifeError::from_store("get", err))?;

        if steps == 0 || board.is_final {
            debug!(%id, steps, generation = board.generation, is_final = board.is_final, "read without advancing");
            return Ok(BoardState::from_board(id, board));
        }

        let start = board.generation;
        let outcome = advance_board(&mut board, steps);
        debug!(
            %id,
            requested = steps,
            applied = outcome.applied,
            from = start,
            to = board.generation,
            became_final = outcome.became_final,
            "advanced board"
        );

        self.store
            .save(id, &board)
            .map_err(|err| LifeError::from_store("save", err))?;
        Ok(BoardState::from_board(id, board))
    }
}
