//! Pipeline orchestration for texprose.
//!
//! This crate ties together the corpus walk, prose extraction, and chunked
//! writing into a single end-to-end run.

pub mod pipeline;

pub use pipeline::{ProgressReporter, RunResult, SilentProgress, run};
