//! Character-level text generation library.
//!
//! This crate provides:
//! - Corpus preparation: vocabulary building and fixed-length windowing
//! - A model boundary (`Predictor`, `Checkpoint`) and a count-based
//!   reference model
//! - Deterministic greedy generation over a sliding window
//! - Seed selection, kept apart from generation
//!
//! File helpers are kept internal.

/// Vocabulary and `(window, target)` corpus preparation.
pub mod encoder;

/// Model boundary and reference back-off predictor.
pub mod model;

/// Sliding window and the generation loop.
pub mod generator;

/// Starting window selection.
pub mod seed;

/// Run parameters.
pub mod config;

/// Crate error type.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use config::GenerationConfig;
pub use encoder::{prepare, prepare_file, SequenceCorpus, Vocabulary};
pub use error::{Result, TextGenError};
pub use generator::{generate, Generator, Window};
pub use model::{Checkpoint, ModelInput, NGramPredictor, Predictor};
pub use seed::StartSeed;
