use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::State;
use crate::error::{Result, TextGenError};

/// Transition counts for contexts of exactly `n` preceding codes.
///
/// `n == 0` is the empty context: plain code frequencies.
///
/// # Invariants
/// - Every key in `states` has length `n`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ContextTable {
	n: usize,
	states: HashMap<Vec<u32>, State>,
}

impl ContextTable {
	pub(crate) fn new(n: usize) -> Self {
		Self { n, states: HashMap::new() }
	}

	pub(crate) fn n(&self) -> usize {
		self.n
	}

	/// Counts every target in `codes[from..]` against its `n` preceding codes.
	///
	/// Targets with fewer than `n` predecessors in `codes` are skipped.
	pub(crate) fn add_targets(&mut self, codes: &[u32], from: usize) {
		for i in from.max(self.n)..codes.len() {
			let prefix = &codes[i - self.n..i];
			let state = self
				.states
				.entry(prefix.to_vec())
				.or_insert_with(|| State::new(prefix));
			state.add_transition(codes[i]);
		}
	}

	/// State for the last `n` codes of `window`.
	///
	/// Returns `None` if the window is shorter than `n` or the context was
	/// never observed.
	pub(crate) fn lookup(&self, window: &[u32]) -> Option<&State> {
		if window.len() < self.n {
			return None;
		}
		self.states.get(&window[window.len() - self.n..])
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Merges another table of the same context length.
	///
	/// # Errors
	/// Returns `InvalidInput` if the context lengths differ.
	pub(crate) fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(TextGenError::invalid_input(format!(
				"context length mismatch: {} vs {}",
				self.n, other.n
			)));
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}
