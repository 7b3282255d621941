use crate::error::{Result, TextGenError};

/// Normalised model input of shape `(1, seq_len, 1)`.
///
/// Each value is a character code divided by the vocabulary size. Models are
/// fitted against this exact scaling, so the same denominator must be used at
/// generation time.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInput {
	values: Vec<f32>,
}

impl ModelInput {
	/// Normalises `codes` by `vocab_size`.
	pub fn from_codes<I>(codes: I, vocab_size: usize) -> Self
	where
		I: IntoIterator<Item = u32>,
	{
		let mut input = Self { values: Vec::new() };
		input.refill(codes, vocab_size);
		input
	}

	/// Overwrites the values in place, reusing the allocation.
	pub(crate) fn refill<I>(&mut self, codes: I, vocab_size: usize)
	where
		I: IntoIterator<Item = u32>,
	{
		let denominator = vocab_size as f32;
		self.values.clear();
		self.values.extend(codes.into_iter().map(|code| code as f32 / denominator));
	}

	/// Batch size is always 1 and there is a single feature per step.
	pub fn shape(&self) -> [usize; 3] {
		[1, self.values.len(), 1]
	}

	pub fn seq_len(&self) -> usize {
		self.values.len()
	}

	/// Flattened values, row-major.
	pub fn values(&self) -> &[f32] {
		&self.values
	}

	/// Recovers the integer codes, inverting the normalisation.
	///
	/// # Errors
	/// Returns `InvalidInput` if a value is not finite or maps outside
	/// `[0, vocab_size)`.
	pub fn denormalize(&self, vocab_size: usize) -> Result<Vec<u32>> {
		let scale = vocab_size as f32;
		self.values
			.iter()
			.map(|value| {
				let code = (value * scale).round();
				if !code.is_finite() || code < 0.0 || code >= scale {
					return Err(TextGenError::invalid_input(format!(
						"input value {value} does not map to a code below {vocab_size}"
					)));
				}
				Ok(code as u32)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn values_are_divided_by_vocab_size() {
		let input = ModelInput::from_codes([0, 1, 3], 4);
		assert_eq!(input.values(), &[0.0, 0.25, 0.75]);
		assert_eq!(input.shape(), [1, 3, 1]);
	}

	#[test]
	fn denormalize_recovers_codes() {
		let codes: Vec<u32> = (0..97).collect();
		let input = ModelInput::from_codes(codes.iter().copied(), 97);
		assert_eq!(input.denormalize(97).unwrap(), codes);
	}

	#[test]
	fn denormalize_rejects_out_of_range() {
		let input = ModelInput::from_codes([5], 4);
		assert!(matches!(input.denormalize(4), Err(TextGenError::InvalidInput(_))));
	}

	#[test]
	fn refill_replaces_previous_values() {
		let mut input = ModelInput::from_codes([1, 1], 2);
		input.refill([0, 1, 0], 2);
		assert_eq!(input.values(), &[0.0, 0.5, 0.0]);
	}
}
