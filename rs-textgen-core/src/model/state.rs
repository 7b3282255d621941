use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextGenError};

/// Represents one context of the back-off table.
///
/// A `State` corresponds to a fixed sequence of preceding codes (`key`) and
/// stores how often each code was observed right after it.
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - `total` is the sum of all occurrence counts
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct State {
	/// Preceding codes identifying this state.
	key: Vec<u32>,
	/// Next code → number of observations.
	transitions: HashMap<u32, u64>,
	total: u64,
}

impl State {
	pub(crate) fn new(key: &[u32]) -> Self {
		Self {
			key: key.to_vec(),
			transitions: HashMap::new(),
			total: 0,
		}
	}

	/// Records one occurrence of `next_code` after this context.
	pub(crate) fn add_transition(&mut self, next_code: u32) {
		*self.transitions.entry(next_code).or_insert(0) += 1;
		self.total += 1;
	}

	/// Relative frequency of every code in `[0, vocab_size)`.
	///
	/// Codes never observed after this context score 0. Codes at or above
	/// `vocab_size` are ignored.
	pub(crate) fn distribution(&self, vocab_size: usize) -> Vec<f32> {
		let mut distribution = vec![0.0; vocab_size];
		if self.total == 0 {
			return distribution;
		}
		let total = self.total as f64;
		for (code, occurrence) in &self.transitions {
			if let Some(slot) = distribution.get_mut(*code as usize) {
				*slot = (*occurrence as f64 / total) as f32;
			}
		}
		distribution
	}

	/// Merges another state with the same key, summing counts.
	///
	/// # Errors
	/// Returns `InvalidInput` if the keys differ.
	pub(crate) fn merge(&mut self, other: &Self) -> Result<()> {
		if self.key != other.key {
			return Err(TextGenError::invalid_input("cannot merge states with different keys"));
		}

		for (next_code, occurrence) in &other.transitions {
			*self.transitions.entry(*next_code).or_insert(0) += *occurrence;
		}
		self.total += other.total;

		Ok(())
	}
}
