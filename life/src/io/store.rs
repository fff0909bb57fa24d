//! The persistence port the board manager depends on.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{Board, BoardId, Grid};

/// Failures reported by a [`BoardStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("board {0} not found")]
    NotFound(BoardId),

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{record} is invalid: {message}")]
    Corrupt { record: String, message: String },

    #[error("invalid board schema: {0}")]
    Schema(String),
}

impl StoreError {
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// Durable storage and identity assignment for boards.
///
/// Implementations must make `save` all-or-nothing: a failed save leaves the
/// previous record readable. Concurrent saves to the same id are not
/// serialized by callers; the last write wins unless the store itself
/// provides stronger guarantees.
pub trait BoardStore: Send + Sync {
    /// Allocate a fresh, monotonically increasing id and store
    /// `{cells, generation: 0, final: false}` under it.
    fn create(&self, cells: Grid) -> Result<BoardId, StoreError>;

    /// Fetch the record for `id`, or [`StoreError::NotFound`].
    fn get(&self, id: BoardId) -> Result<Board, StoreError>;

    /// Overwrite the record for a previously created `id`.
    fn save(&self, id: BoardId, board: &Board) -> Result<(), StoreError>;
}
