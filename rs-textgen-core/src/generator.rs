use std::collections::VecDeque;

use log::{debug, trace};

use crate::encoder::Vocabulary;
use crate::error::{Result, TextGenError};
use crate::model::{ModelInput, Predictor};

/// Fixed-size sliding window of character codes.
///
/// Backed by a ring buffer allocated once: `slide` appends the new code and
/// evicts the oldest in O(1), so the length never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window {
	codes: VecDeque<u32>,
}

impl Window {
	/// Creates a window holding a copy of `codes`.
	///
	/// # Errors
	/// Returns `InvalidInput` if `codes` is empty.
	pub fn new(codes: &[u32]) -> Result<Self> {
		if codes.is_empty() {
			return Err(TextGenError::invalid_input("a window needs at least one code"));
		}
		let mut buffer = VecDeque::with_capacity(codes.len());
		buffer.extend(codes.iter().copied());
		Ok(Self { codes: buffer })
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}

	/// Never true for a window built by `new`.
	pub fn is_empty(&self) -> bool {
		self.codes.is_empty()
	}

	/// Codes from oldest to newest.
	pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
		self.codes.iter().copied()
	}

	pub fn to_vec(&self) -> Vec<u32> {
		self.iter().collect()
	}

	/// Appends `code` and drops the oldest code.
	pub fn slide(&mut self, code: u32) {
		self.codes.pop_front();
		self.codes.push_back(code);
	}
}

/// Index of the largest score, the first one on ties.
///
/// NaN scores never win. Returns `None` if no score is comparable.
pub fn argmax(scores: &[f32]) -> Option<usize> {
	let mut best: Option<(usize, f32)> = None;
	for (index, score) in scores.iter().copied().enumerate() {
		if score.is_nan() {
			continue;
		}
		match best {
			Some((_, best_score)) if score <= best_score => {}
			_ => best = Some((index, score)),
		}
	}
	best.map(|(index, _)| index)
}

/// Autoregressive greedy generation over a sliding window.
///
/// # Responsibilities
/// - Normalise the window and query the model once per step
/// - Pick the most probable code and map it back to a character
/// - Slide the window forward by the new code
///
/// Each generator owns its window; the model is only borrowed and never
/// mutated. With a fixed model and seed the output is fully deterministic.
pub struct Generator<'a, M: Predictor + ?Sized> {
	model: &'a M,
	vocabulary: &'a Vocabulary,
	vocab_size: usize,
	window: Window,
	/// Reused across steps.
	input: ModelInput,
}

impl<'a, M: Predictor + ?Sized> Generator<'a, M> {
	/// Creates a generator starting from `seed`.
	///
	/// # Errors
	/// Returns `InvalidInput` if `vocab_size` is zero or a seed code is not
	/// below `vocab_size`.
	pub fn new(model: &'a M, seed: Window, vocab_size: usize, vocabulary: &'a Vocabulary) -> Result<Self> {
		if vocab_size == 0 {
			return Err(TextGenError::invalid_input("vocab_size must be >= 1"));
		}
		if let Some(code) = seed.iter().find(|code| *code as usize >= vocab_size) {
			return Err(TextGenError::invalid_input(format!(
				"seed code {code} is out of range for a vocabulary of {vocab_size}"
			)));
		}

		let input = ModelInput::from_codes(seed.iter(), vocab_size);
		Ok(Self { model, vocabulary, vocab_size, window: seed, input })
	}

	/// Current window state.
	pub fn window(&self) -> &Window {
		&self.window
	}

	/// Produces one character and slides the window.
	///
	/// # Errors
	/// - `ConfigMismatch` if the model's declared output dimension, or the
	///   length of its distribution, differs from `vocab_size`
	/// - `InvalidCode` if the selected code has no character
	/// - Any error raised by the model itself
	pub fn step(&mut self) -> Result<char> {
		if let Some(model_vocab_size) = self.model.vocab_size() {
			if model_vocab_size != self.vocab_size {
				return Err(TextGenError::ConfigMismatch {
					expected: self.vocab_size,
					actual: model_vocab_size,
				});
			}
		}

		self.input.refill(self.window.iter(), self.vocab_size);
		let distribution = self.model.predict(&self.input)?;
		if distribution.len() != self.vocab_size {
			return Err(TextGenError::ConfigMismatch {
				expected: self.vocab_size,
				actual: distribution.len(),
			});
		}

		let next_code = argmax(&distribution)
			.ok_or_else(|| TextGenError::invalid_input("model returned only NaN scores"))? as u32;
		let next_char = self
			.vocabulary
			.char_of(next_code)
			.ok_or(TextGenError::InvalidCode(next_code))?;
		trace!("predicted code {next_code} ({next_char:?})");

		self.window.slide(next_code);
		Ok(next_char)
	}

	/// Runs `length` steps and returns the generated characters in order.
	pub fn run(&mut self, length: usize) -> Result<String> {
		let mut result = String::with_capacity(length);
		for _ in 0..length {
			result.push(self.step()?);
		}
		debug!("generated {} characters", length);
		Ok(result)
	}
}

/// Generates `length` characters from `seed` using greedy argmax selection.
///
/// `length == 0` returns an empty string without querying the model.
pub fn generate<M: Predictor + ?Sized>(
	model: &M,
	seed: Window,
	vocab_size: usize,
	vocabulary: &Vocabulary,
	length: usize,
) -> Result<String> {
	Generator::new(model, seed, vocab_size, vocabulary)?.run(length)
}
