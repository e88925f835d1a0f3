//! Expose chad's internal API for use in integration tests. The stable
//! interface is the `chad` binary; prefer `chad-commonmark` for embedding.
pub mod cli;
pub mod config;
pub mod render;
