use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a whole UTF-8 text file into memory.
///
/// Line endings are kept as-is: they are characters of the corpus like any other.
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Builds a sibling path with a new extension.
///
/// Example:
/// `models/shakespeare.ckpt` + `"part"` → `models/shakespeare.part`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Writes `bytes` to `path` through a temporary sibling file, then renames it.
///
/// A reader never observes a half-written checkpoint.
pub(crate) fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	let partial = build_output_path(path, "part")?;
	fs::write(&partial, bytes)?;
	fs::rename(&partial, path)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_replaces_extension() {
		let path = build_output_path("models/tiny.ckpt", "part").unwrap();
		assert_eq!(path, PathBuf::from("models/tiny.part"));
	}

	#[test]
	fn output_path_without_parent_stays_relative() {
		let path = build_output_path("tiny.ckpt", "part").unwrap();
		assert_eq!(path, PathBuf::from("tiny.part"));
	}

	#[test]
	fn atomic_write_then_read_back() {
		let dir = std::env::temp_dir().join(format!("rs-textgen-io-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		let target = dir.join("corpus.txt");

		write_atomic(&target, "héllo\nworld".as_bytes()).unwrap();

		assert_eq!(read_text(&target).unwrap(), "héllo\nworld");
		assert!(!dir.join("corpus.part").exists());
		fs::remove_dir_all(&dir).unwrap();
	}
}
