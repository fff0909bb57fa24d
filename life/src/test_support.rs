//! Test-only helpers for building grids and observing store traffic.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::core::types::{Board, BoardId, Grid};
use crate::io::file_store::FileStore;
use crate::io::store::{BoardStore, StoreError};

/// Build a grid from rows of `#` (alive) and `.` (dead).
pub fn grid(rows: &[&str]) -> Grid {
    rows.iter()
        .map(|row| row.chars().map(|c| c == '#').collect())
        .collect()
}

/// 5x5 horizontal blinker (period 2).
pub fn blinker() -> Grid {
    grid(&[
        ".....", //
        ".....",
        ".###.",
        ".....",
        ".....",
    ])
}

/// 5x5 pattern that goes extinct at generation 14.
pub fn dies_out() -> Grid {
    grid(&[
        ".....", //
        "..#..",
        ".###.",
        "...#.",
        ".....",
    ])
}

/// A [`FileStore`] in a fresh temp directory. Keep the `TempDir` alive for the
/// duration of the test.
pub fn temp_file_store() -> io::Result<(TempDir, FileStore)> {
    let temp = tempfile::tempdir()?;
    let store = FileStore::open(temp.path().join("life")).map_err(io::Error::other)?;
    Ok((temp, store))
}

/// Wraps a store and counts `save` calls; saves can be forced to fail.
pub struct CountingStore<S> {
    inner: S,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl<S: BoardStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            saves: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Number of `save` calls seen so far, including failed ones.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl<S: BoardStore> BoardStore for CountingStore<S> {
    fn create(&self, cells: Grid) -> Result<BoardId, StoreError> {
        self.inner.create(cells)
    }

    fn get(&self, id: BoardId) -> Result<Board, StoreError> {
        self.inner.get(id)
    }

    fn save(&self, id: BoardId, board: &Board) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                "write board record",
                format!("{id}.json"),
                io::Error::other("injected failure"),
            ));
        }
        self.inner.save(id, board)
    }
}
