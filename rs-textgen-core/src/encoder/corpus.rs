use log::{debug, info};

use crate::error::{Result, TextGenError};

use super::vocabulary::Vocabulary;

/// Integer-encoded text sliced into overlapping `(window, target)` pairs.
///
/// Window `i` covers text positions `[i, i + seq_len)` and its target is the
/// code at position `i + seq_len`. Windows are views into a single encoded
/// buffer, nothing is copied per pair.
///
/// # Invariants
/// - `seq_len >= 1`
/// - `codes.len() > seq_len`, so there is at least one pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceCorpus {
	codes: Vec<u32>,
	seq_len: usize,
}

/// Observational statistics about a prepared corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusStats {
	pub char_count: usize,
	pub vocab_size: usize,
	pub distinct: String,
}

impl SequenceCorpus {
	/// Number of `(window, target)` pairs, `len(text) - seq_len`.
	pub fn len(&self) -> usize {
		self.codes.len() - self.seq_len
	}

	/// Always false for a corpus built by `prepare`.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn seq_len(&self) -> usize {
		self.seq_len
	}

	/// The whole encoded text.
	pub fn codes(&self) -> &[u32] {
		&self.codes
	}

	/// Window at start position `index`.
	pub fn window(&self, index: usize) -> Option<&[u32]> {
		if index >= self.len() {
			return None;
		}
		Some(&self.codes[index..index + self.seq_len])
	}

	/// Code following the window at `index`.
	pub fn target(&self, index: usize) -> Option<u32> {
		if index >= self.len() {
			return None;
		}
		Some(self.codes[index + self.seq_len])
	}

	pub fn pair(&self, index: usize) -> Option<(&[u32], u32)> {
		Some((self.window(index)?, self.target(index)?))
	}

	/// All windows in text order.
	pub fn windows(&self) -> impl Iterator<Item = &[u32]> + '_ {
		// The last slice of `windows` has no target and is skipped.
		self.codes.windows(self.seq_len).take(self.len())
	}

	/// All targets in text order.
	pub fn targets(&self) -> &[u32] {
		&self.codes[self.seq_len..]
	}

	/// All `(window, target)` pairs in text order.
	pub fn iter(&self) -> impl Iterator<Item = (&[u32], u32)> + '_ {
		self.windows().zip(self.targets().iter().copied())
	}

	pub fn stats(&self, vocabulary: &Vocabulary) -> CorpusStats {
		CorpusStats {
			char_count: self.codes.len(),
			vocab_size: vocabulary.len(),
			distinct: vocabulary.characters().collect(),
		}
	}
}

/// Builds the vocabulary of `text` and slices it into `seq_len` windows.
///
/// # Errors
/// Returns `InvalidInput` if `text` is empty, if `seq_len` is zero, or if
/// `text` has no more than `seq_len` characters (no window can be paired with
/// a target). An empty corpus is never returned.
pub fn prepare(text: &str, seq_len: usize) -> Result<(Vocabulary, SequenceCorpus)> {
	if seq_len == 0 {
		return Err(TextGenError::invalid_input("seq_len must be >= 1"));
	}
	let vocabulary = Vocabulary::from_text(text)?;

	let codes = vocabulary.encode(text)?;
	if codes.len() <= seq_len {
		return Err(TextGenError::invalid_input(format!(
			"text has {} characters, need more than seq_len = {}",
			codes.len(),
			seq_len
		)));
	}

	let corpus = SequenceCorpus { codes, seq_len };
	let stats = corpus.stats(&vocabulary);
	info!("length of data: {}, number of unique chars: {}", stats.char_count, stats.vocab_size);
	debug!("unique chars: {:?}", stats.distinct);
	debug!("prepared {} sequences of length {}", corpus.len(), seq_len);

	Ok((vocabulary, corpus))
}
