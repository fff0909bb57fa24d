//! Deterministic, pure logic for board evolution.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! grids and return fresh values, never mutating their inputs.

pub mod engine;
pub mod types;
