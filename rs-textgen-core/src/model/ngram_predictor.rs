use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::context_table::ContextTable;
use super::input::ModelInput;
use super::{Checkpoint, Predictor};
use crate::error::{Result, TextGenError};
use crate::io;

/// Bumped whenever the serialized layout changes.
const CHECKPOINT_VERSION: u32 = 1;

/// Count-based back-off predictor over character codes.
///
/// Holds one `ContextTable` per context length `0..=order`. A prediction
/// looks up the longest context the window ends with that was seen while
/// fitting, and returns the relative frequencies of the codes that followed
/// it. The empty context is always known, so every prediction succeeds.
///
/// # Invariants
/// - `order >= 1`
/// - `tables[n].n() == n` for every `n` in `0..=order`
/// - `tables[0]` is not empty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramPredictor {
	version: u32,
	order: usize,
	vocab_size: usize,
	tables: Vec<ContextTable>,
}

impl NGramPredictor {
	fn empty(order: usize, vocab_size: usize) -> Self {
		Self {
			version: CHECKPOINT_VERSION,
			order,
			vocab_size,
			tables: (0..=order).map(ContextTable::new).collect(),
		}
	}

	/// Fits the predictor on an encoded corpus.
	///
	/// # Behavior
	/// - Splits the targets into chunks (based on CPU cores * factor).
	/// - Each worker thread counts its chunk, reading up to `order` codes
	///   before the chunk start as context, so no target is counted twice.
	/// - Partial predictors are merged as they arrive on the channel.
	///
	/// # Errors
	/// Returns `InvalidInput` if `order` is zero, `codes` is empty, or a code
	/// is not below `vocab_size`.
	pub fn fit(codes: &[u32], vocab_size: usize, order: usize) -> Result<Self> {
		if order == 0 {
			return Err(TextGenError::invalid_input("order must be >= 1"));
		}
		if codes.is_empty() {
			return Err(TextGenError::invalid_input("cannot fit on an empty corpus"));
		}
		if let Some(code) = codes.iter().find(|code| **code as usize >= vocab_size) {
			return Err(TextGenError::invalid_input(format!(
				"code {code} is out of range for a vocabulary of {vocab_size}"
			)));
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = codes.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for start in (0..codes.len()).step_by(chunk_size) {
				let tx = tx.clone();
				let end = (start + chunk_size).min(codes.len());
				let lo = start.saturating_sub(order);

				scope.spawn(move || {
					let mut partial = NGramPredictor::empty(order, vocab_size);
					for table in &mut partial.tables {
						table.add_targets(&codes[lo..end], start - lo);
					}
					// The receiver outlives the scope.
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		let mut model = NGramPredictor::empty(order, vocab_size);
		for partial in rx.iter() {
			model.merge(&partial)?;
		}

		debug!("fitted back-off predictor of order {order} on {} codes using {cpus} cpus", codes.len());
		Ok(model)
	}

	/// Loads the checkpoint at `path` if it exists, otherwise fits a new
	/// predictor on `codes` and writes it to `path`.
	pub fn load_or_fit<P: AsRef<Path>>(path: P, codes: &[u32], vocab_size: usize, order: usize) -> Result<Self> {
		let path = path.as_ref();
		if path.exists() {
			let model = Self::load(path)?;
			if model.order != order {
				warn!(
					"checkpoint {} has order {}, requested {order}; using the checkpoint",
					path.display(),
					model.order
				);
			}
			if model.vocab_size != vocab_size {
				warn!(
					"checkpoint {} was fitted on a vocabulary of {}, corpus has {vocab_size}",
					path.display(),
					model.vocab_size
				);
			}
			return Ok(model);
		}

		let model = Self::fit(codes, vocab_size, order)?;
		model.save(path)?;
		Ok(model)
	}

	/// Output dimension: the size of the vocabulary the predictor was fitted against.
	pub fn vocab_size(&self) -> usize {
		self.vocab_size
	}

	/// Longest context used for a prediction.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Merges another predictor fitted with the same order and vocabulary.
	///
	/// # Errors
	/// Returns `InvalidInput` if order or vocabulary size differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order || self.vocab_size != other.vocab_size {
			return Err(TextGenError::invalid_input(format!(
				"predictor mismatch: order {}/{}, vocab {}/{}",
				self.order, other.order, self.vocab_size, other.vocab_size
			)));
		}

		for (table, other_table) in self.tables.iter_mut().zip(&other.tables) {
			table.merge(other_table)?;
		}

		Ok(())
	}

	/// Checks the invariants of a deserialized predictor.
	fn validate(&self) -> Result<()> {
		if self.version != CHECKPOINT_VERSION {
			return Err(TextGenError::ModelLoad(format!(
				"unsupported checkpoint version {} (expected {CHECKPOINT_VERSION})",
				self.version
			)));
		}
		let well_formed = self.order >= 1
			&& self.vocab_size >= 1
			&& self.tables.len() == self.order + 1
			&& self.tables.iter().enumerate().all(|(n, table)| table.n() == n)
			&& !self.tables[0].is_empty();
		if !well_formed {
			return Err(TextGenError::ModelLoad("checkpoint tables are inconsistent".to_owned()));
		}
		Ok(())
	}
}

impl Predictor for NGramPredictor {
	fn vocab_size(&self) -> Option<usize> {
		Some(self.vocab_size)
	}

	fn predict(&self, input: &ModelInput) -> Result<Vec<f32>> {
		let window = input.denormalize(self.vocab_size)?;

		let longest = self.order.min(window.len());
		for table in self.tables[..=longest].iter().rev() {
			if let Some(state) = table.lookup(&window) {
				return Ok(state.distribution(self.vocab_size));
			}
		}

		// Unreachable for a validated predictor: the empty context is always known.
		Err(TextGenError::ModelLoad("predictor has no observations".to_owned()))
	}
}

impl Checkpoint for NGramPredictor {
	fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path)
			.map_err(|e| TextGenError::ModelLoad(format!("cannot read {}: {e}", path.display())))?;
		let model: Self = postcard::from_bytes(&bytes)
			.map_err(|e| TextGenError::ModelLoad(format!("cannot decode {}: {e}", path.display())))?;
		model.validate()?;

		info!(
			"loaded checkpoint {} (order {}, vocabulary of {})",
			path.display(),
			model.order,
			model.vocab_size
		);
		Ok(model)
	}

	fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		io::write_atomic(&path, &bytes)?;
		info!("saved checkpoint {} ({} bytes)", path.as_ref().display(), bytes.len());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn input(codes: &[u32], vocab_size: usize) -> ModelInput {
		ModelInput::from_codes(codes.iter().copied(), vocab_size)
	}

	#[test]
	fn predicts_the_observed_continuation() {
		// a=0 b=1 c=2
		let codes = [0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2];
		let model = NGramPredictor::fit(&codes, 3, 2).unwrap();

		assert_eq!(model.predict(&input(&[2, 0, 1], 3)).unwrap(), vec![0.0, 0.0, 1.0]);
		assert_eq!(model.predict(&input(&[0, 1, 2], 3)).unwrap(), vec![1.0, 0.0, 0.0]);
	}

	#[test]
	fn backs_off_to_shorter_context() {
		let codes = [0, 1, 2, 0, 1, 2];
		let model = NGramPredictor::fit(&codes, 3, 2).unwrap();

		// "cb" was never seen, "b" was: always followed by "c".
		assert_eq!(model.predict(&input(&[2, 1], 3)).unwrap(), vec![0.0, 0.0, 1.0]);
	}

	#[test]
	fn falls_back_to_code_frequencies() {
		let codes = [0, 0, 0, 1];
		let model = NGramPredictor::fit(&codes, 3, 1).unwrap();

		// code 2 never occurred, so neither does any context ending with it.
		assert_eq!(model.predict(&input(&[2], 3)).unwrap(), vec![0.75, 0.25, 0.0]);
	}

	#[test]
	fn output_length_is_vocab_size() {
		let model = NGramPredictor::fit(&[0, 1, 0], 5, 3).unwrap();
		assert_eq!(model.predict(&input(&[0, 1], 5)).unwrap().len(), 5);
	}

	#[test]
	fn parallel_fit_matches_sequential_counting() {
		let codes: Vec<u32> = (0..5000u32).map(|i| (i * 7 + i / 13) % 11).collect();
		let model = NGramPredictor::fit(&codes, 11, 4).unwrap();

		let mut expected = NGramPredictor::empty(4, 11);
		for table in &mut expected.tables {
			table.add_targets(&codes, 0);
		}
		assert_eq!(model, expected);
	}

	#[test]
	fn fit_rejects_bad_arguments() {
		assert!(NGramPredictor::fit(&[0, 1], 2, 0).is_err());
		assert!(NGramPredictor::fit(&[], 2, 1).is_err());
		assert!(NGramPredictor::fit(&[0, 2], 2, 1).is_err());
	}

	#[test]
	fn merge_rejects_mismatch() {
		let mut left = NGramPredictor::fit(&[0, 1], 2, 1).unwrap();
		let right = NGramPredictor::fit(&[0, 1], 3, 1).unwrap();
		assert!(left.merge(&right).is_err());
	}

	#[test]
	fn rejects_inconsistent_checkpoint() {
		let mut model = NGramPredictor::fit(&[0, 1, 1], 2, 2).unwrap();
		model.tables.pop();
		assert!(matches!(model.validate(), Err(TextGenError::ModelLoad(_))));

		let mut model = NGramPredictor::fit(&[0, 1, 1], 2, 2).unwrap();
		model.version = CHECKPOINT_VERSION + 1;
		assert!(matches!(model.validate(), Err(TextGenError::ModelLoad(_))));
	}
}
