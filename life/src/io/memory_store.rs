use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::core::types::{Board, BoardId, Grid};
use crate::io::store::{BoardStore, StoreError};

#[derive(Default)]
struct Entries {
    last_id: u64,
    boards: HashMap<BoardId, Board>,
}

/// In-memory storage for testing and local development.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    /// Create a new in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // Every mutation is a single insert, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BoardStore for MemoryStore {
    fn create(&self, cells: Grid) -> Result<BoardId, StoreError> {
        let mut entries = self.lock();
        entries.last_id += 1;
        let id = BoardId(entries.last_id);
        entries.boards.insert(id, Board::new(cells));
        debug!(%id, "created board in memory");
        Ok(id)
    }

    fn get(&self, id: BoardId) -> Result<Board, StoreError> {
        self.lock()
            .boards
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn save(&self, id: BoardId, board: &Board) -> Result<(), StoreError> {
        self.lock().boards.insert(id, board.clone());
        Ok(())
    }
}
