use crate::error::{Result, TextGenError};
use crate::seed::StartSeed;

pub const DEFAULT_SEQ_LEN: usize = 100;
pub const DEFAULT_LENGTH: usize = 100;
pub const DEFAULT_ORDER: usize = 8;

/// Parameters of one preparation + generation run.
///
/// Everything the pipeline needs is passed explicitly through this struct;
/// there is no process-wide state.
///
/// # Invariants
/// - `seq_len >= 1`
/// - `1 <= order <= seq_len`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
	/// Length of every window, both in the corpus and while generating.
	seq_len: usize,

	/// Number of characters to generate.
	pub length: usize,

	/// Longest context of the reference back-off model.
	order: usize,

	/// How the starting window is chosen.
	pub start_seed: StartSeed,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			seq_len: DEFAULT_SEQ_LEN,
			length: DEFAULT_LENGTH,
			order: DEFAULT_ORDER,
			start_seed: StartSeed::default(),
		}
	}
}

impl GenerationConfig {
	pub fn seq_len(&self) -> usize {
		self.seq_len
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Sets the window length.
	///
	/// A shorter window also caps `order`.
	///
	/// # Errors
	/// Returns an error if `seq_len` is zero.
	pub fn set_seq_len(&mut self, seq_len: usize) -> Result<()> {
		if seq_len == 0 {
			return Err(TextGenError::invalid_input("seq_len must be >= 1"));
		}
		self.seq_len = seq_len;
		self.order = self.order.min(seq_len);
		Ok(())
	}

	/// Sets the back-off order.
	///
	/// # Errors
	/// Returns an error if `order` is zero or longer than `seq_len`.
	pub fn set_order(&mut self, order: usize) -> Result<()> {
		if order == 0 || order > self.seq_len {
			return Err(TextGenError::invalid_input(format!(
				"order must be between 1 and seq_len = {}, got {order}",
				self.seq_len
			)));
		}
		self.order = order;
		Ok(())
	}
}
