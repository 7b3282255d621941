use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::encoder::{SequenceCorpus, Vocabulary};
use crate::error::{Result, TextGenError};
use crate::generator::Window;

/// Strategy used to select the starting window of a generation.
///
/// Seed selection is the only random part of the pipeline and lives here,
/// outside the generator, so generation itself stays deterministic.
///
/// # Variants
/// - `Random(Option<u64>)`: a uniformly chosen corpus window. With `Some(seed)`
///   the choice comes from an explicitly seeded `StdRng` and is reproducible;
///   with `None` it uses OS entropy.
/// - `Index(usize)`: the corpus window starting at the given position.
/// - `Custom(String)`: the last `seq_len` characters of the given text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartSeed {
	Random(Option<u64>),
	Index(usize),
	Custom(String),
}

impl Default for StartSeed {
	fn default() -> Self {
		StartSeed::Random(None)
	}
}

impl StartSeed {
	/// Builds the starting window for `corpus`.
	///
	/// # Errors
	/// Returns `InvalidInput` if an index is out of range, or a custom text is
	/// shorter than `seq_len` or contains characters outside the vocabulary.
	pub fn select(&self, corpus: &SequenceCorpus, vocabulary: &Vocabulary) -> Result<Window> {
		let index = match self {
			StartSeed::Random(None) => rand::rng().random_range(0..corpus.len()),
			StartSeed::Random(Some(seed)) => StdRng::seed_from_u64(*seed).random_range(0..corpus.len()),
			StartSeed::Index(index) => *index,
			StartSeed::Custom(text) => return Self::custom_window(text, corpus.seq_len(), vocabulary),
		};

		let window = corpus.window(index).ok_or_else(|| {
			TextGenError::invalid_input(format!(
				"seed index {index} is out of range, corpus has {} windows",
				corpus.len()
			))
		})?;
		debug!("seed window starts at position {index}");
		Window::new(window)
	}

	fn custom_window(text: &str, seq_len: usize, vocabulary: &Vocabulary) -> Result<Window> {
		let codes = vocabulary.encode(text)?;
		if codes.len() < seq_len {
			return Err(TextGenError::invalid_input(format!(
				"seed text has {} characters, need at least {seq_len}",
				codes.len()
			)));
		}
		Window::new(&codes[codes.len() - seq_len..])
	}
}
