//! Shared application state for the HTTP server.

use life::board::BoardManager;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Board lifecycle on top of the configured store.
    pub boards: BoardManager,
    /// Upper bound for the `state` query parameter.
    pub max_steps: u64,
}

impl AppState {
    pub fn new(boards: BoardManager, max_steps: u64) -> Self {
        Self { boards, max_steps }
    }
}
