use std::collections::{BTreeSet, HashMap};

use crate::error::{Result, TextGenError};

/// Bidirectional mapping between the distinct characters of a corpus and
/// dense integer codes `[0, len)`.
///
/// Codes are assigned in ascending Unicode scalar order, so the same corpus
/// always yields the same mapping. A model is only meaningful together with
/// the vocabulary it was fitted against.
///
/// # Invariants
/// - `chars[code_of(c)] == c` for every character `c` in the vocabulary
/// - `chars` is strictly increasing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
	/// Code → character, indexed by code.
	chars: Vec<char>,
	/// Character → code.
	codes: HashMap<char, u32>,
}

impl Vocabulary {
	/// Builds the vocabulary of `text`.
	///
	/// # Errors
	/// Returns `InvalidInput` if `text` is empty.
	pub fn from_text(text: &str) -> Result<Self> {
		if text.is_empty() {
			return Err(TextGenError::invalid_input("cannot build a vocabulary from empty text"));
		}
		let distinct: BTreeSet<char> = text.chars().collect();
		let chars: Vec<char> = distinct.into_iter().collect();
		let codes = chars
			.iter()
			.enumerate()
			.map(|(code, c)| (*c, code as u32))
			.collect();

		Ok(Self { chars, codes })
	}

	/// Number of distinct characters.
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	pub fn code_of(&self, c: char) -> Option<u32> {
		self.codes.get(&c).copied()
	}

	pub fn char_of(&self, code: u32) -> Option<char> {
		self.chars.get(code as usize).copied()
	}

	/// Distinct characters in code order.
	pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
		self.chars.iter().copied()
	}

	/// Encodes every character of `text`.
	///
	/// # Errors
	/// Returns `InvalidInput` on the first character outside the vocabulary.
	pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
		text.chars()
			.map(|c| {
				self.code_of(c)
					.ok_or_else(|| TextGenError::invalid_input(format!("character {c:?} is not in the vocabulary")))
			})
			.collect()
	}

	/// Decodes a sequence of codes back to text.
	///
	/// # Errors
	/// Returns `InvalidCode` on the first code outside `[0, len)`.
	pub fn decode(&self, codes: &[u32]) -> Result<String> {
		codes
			.iter()
			.map(|code| self.char_of(*code).ok_or(TextGenError::InvalidCode(*code)))
			.collect()
	}
}
