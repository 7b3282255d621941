//! Turns raw text into integer-encoded training windows.
//!
//! - `Vocabulary`: character ↔ code mapping
//! - `SequenceCorpus`: overlapping `(window, target)` pairs
//! - `prepare` / `prepare_file`: build both from a text

use std::path::Path;

use crate::error::Result;
use crate::io;

/// Character ↔ dense integer code mapping.
pub mod vocabulary;

/// Fixed-length windows paired with the following character.
pub mod corpus;

pub use corpus::{prepare, CorpusStats, SequenceCorpus};
pub use vocabulary::Vocabulary;

/// Reads a UTF-8 corpus file and prepares it with `prepare`.
pub fn prepare_file<P: AsRef<Path>>(filename: P, seq_len: usize) -> Result<(Vocabulary, SequenceCorpus)> {
	let text = io::read_text(filename)?;
	prepare(&text, seq_len)
}
