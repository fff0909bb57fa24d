//! Stored Game of Life boards that advance lazily on read.
//!
//! The crate keeps a strict separation between pure and side-effecting code:
//!
//! - **[`core`]**: The grid evolution engine and shared board types. No I/O,
//!   deterministic and safe to call from any thread.
//! - **[`io`]**: The persistence port ([`io::store::BoardStore`]) and its
//!   concrete implementations (filesystem and in-memory).
//!
//! [`board`] coordinates the two: it owns board identity and the
//! "advance N steps, persist once" protocol.

pub mod board;
pub mod core;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
