//! Boundary between the generator and the predictive model.
//!
//! The generator only needs a `Predictor`: something that maps a normalised
//! window to one score per vocabulary entry. Architecture and training are the
//! model's business. This module provides:
//! - The `Predictor` and `Checkpoint` traits
//! - The normalised input tensor (`ModelInput`)
//! - A count-based back-off reference model (`NGramPredictor`)

use std::path::Path;

use crate::error::Result;

/// Normalised `(1, seq_len, 1)` input tensor.
pub mod input;

/// Back-off context model fitted by counting, persisted with `postcard`.
pub mod ngram_predictor;

/// Transition counts for every context of one fixed length.
mod context_table;

/// One context and the codes observed after it.
mod state;

pub use input::ModelInput;
pub use ngram_predictor::NGramPredictor;

/// A trained model queried one window at a time.
///
/// `predict` returns one non-negative score per vocabulary entry. Scores need
/// not sum to 1: only the position of the maximum is used.
pub trait Predictor {
	/// Output dimension the model was built for, when it declares one.
	///
	/// A declared size lets a mismatched vocabulary be rejected before the
	/// model ever sees an input it cannot interpret. Models returning `None`
	/// are checked on the length of their first distribution instead.
	fn vocab_size(&self) -> Option<usize> {
		None
	}

	fn predict(&self, input: &ModelInput) -> Result<Vec<f32>>;
}

/// Stub models and adapters around external frameworks can be plain closures.
/// They declare no output dimension.
impl<F> Predictor for F
where
	F: Fn(&ModelInput) -> Result<Vec<f32>>,
{
	fn predict(&self, input: &ModelInput) -> Result<Vec<f32>> {
		self(input)
	}
}

/// A model that can be restored from, and written to, a checkpoint file.
///
/// Unreadable or incompatible checkpoints are reported as `ModelLoad`.
pub trait Checkpoint: Sized {
	fn load<P: AsRef<Path>>(path: P) -> Result<Self>;

	fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}
