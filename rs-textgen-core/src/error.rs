use thiserror::Error;

/// Errors raised while preparing data, loading a model or generating text.
#[derive(Error, Debug)]
pub enum TextGenError {
	/// Malformed or too-short corpus, bad `seq_len`, bad seed or config value.
	#[error("Invalid input: {0}")]
	InvalidInput(String),

	/// The model's output dimension disagrees with the vocabulary size.
	#[error("Config mismatch: expected a distribution of {expected} scores, model returned {actual}")]
	ConfigMismatch { expected: usize, actual: usize },

	/// A predicted code has no character in the vocabulary.
	#[error("Invalid code: {0} is not in the vocabulary")]
	InvalidCode(u32),

	/// Required command-line argument not supplied.
	#[error("Missing argument: {0}")]
	MissingArgument(String),

	/// Checkpoint unreadable or incompatible.
	#[error("Model load failure: {0}")]
	ModelLoad(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

impl TextGenError {
	pub fn invalid_input(message: impl Into<String>) -> Self {
		TextGenError::InvalidInput(message.into())
	}
}

pub type Result<T> = std::result::Result<T, TextGenError>;
