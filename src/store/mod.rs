//! Persistence for the application data file. All state lives in a single
//! JSON object on disk; [bridge] reads and writes it whole, [service] owns the
//! merge path for individual keys, and [state] gives consumers a typed view of
//! one key.

pub mod bridge;
pub mod memory;
pub mod service;
pub mod state;
