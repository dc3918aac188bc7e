use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::blocks::{ADD_FILE, DELETE_FILE, UPDATE_FILE, scan_paths, split_blocks};
use crate::commit::{Commit, patch_to_commit};
use crate::parser::parse_block;
use crate::sanitize::{repair_hunk_headers, sanitize_patch_text};
use crate::{ActionKind, Error, Result};

/// Effects a commit through the injected callbacks.
///
/// Every target path (write and remove alike) is validated against
/// `AbsolutePath` before the first side effect, so an absolute path can never
/// leave a half-applied commit behind. Callback failures mid-commit are not
/// rolled back; callers needing atomicity layer their own transaction.
pub fn apply_commit(
	commit: &Commit,
	mut write: impl FnMut(&str, &str) -> io::Result<()>,
	mut remove: impl FnMut(&str) -> io::Result<()>,
) -> Result<()> {
	// -- Validate targets before any side effect
	for (path, change) in commit {
		ensure_relative(path)?;
		if let Some(move_path) = &change.move_path {
			ensure_relative(move_path)?;
		}
	}

	// -- Effect
	for (path, change) in commit {
		match change.kind {
			ActionKind::Delete => {
				remove(path).map_err(|err| Error::remove_file(path, err))?;
				tracing::debug!("removed {path}");
			}
			ActionKind::Add => {
				let content = content_of(path, change.new_content.as_deref())?;
				write(path, content).map_err(|err| Error::write_file(path, err))?;
				tracing::debug!("added {path}");
			}
			ActionKind::Update => {
				let content = content_of(path, change.new_content.as_deref())?;
				if let Some(dest) = &change.move_path {
					write(dest, content).map_err(|err| Error::write_file(dest, err))?;
					remove(path).map_err(|err| Error::remove_file(path, err))?;
					tracing::debug!("moved {path} -> {dest}");
				} else {
					write(path, content).map_err(|err| Error::write_file(path, err))?;
					tracing::debug!("updated {path}");
				}
			}
		}
	}

	Ok(())
}

/// Convenience pipeline: sanitize, repair headers, split into blocks, and for
/// each block load originals through `read`, parse, resolve, apply. Returns
/// `"Done!"` so hosts can surface the original tool's success string.
pub fn process_patch(
	text: &str,
	mut read: impl FnMut(&str) -> io::Result<String>,
	mut write: impl FnMut(&str, &str) -> io::Result<()>,
	mut remove: impl FnMut(&str) -> io::Result<()>,
) -> Result<&'static str> {
	let lines = repair_hunk_headers(sanitize_patch_text(text));
	let blocks = split_blocks(&lines)?;
	if blocks.is_empty() {
		return Err(Error::invalid_patch_envelope("no '*** Begin Patch' block found"));
	}

	for block in blocks {
		let originals = load_originals(block, &mut read)?;
		let (patch, _fuzz) = parse_block(block, &originals)?;
		let commit = patch_to_commit(&patch, &originals)?;
		apply_commit(&commit, &mut write, &mut remove)?;
	}

	Ok("Done!")
}

/// Loads the snapshot a block parses against: every `Update`/`Delete` target
/// must exist (`FileNotFound` otherwise), and `Add` targets are probed so an
/// existing file surfaces as `FileAlreadyExists` at parse time.
pub fn load_originals(
	block: &[String],
	mut read: impl FnMut(&str) -> io::Result<String>,
) -> Result<BTreeMap<String, String>> {
	let mut originals = BTreeMap::new();

	for path in scan_paths(block, &[UPDATE_FILE, DELETE_FILE]) {
		let content = read(&path).map_err(|err| Error::file_not_found(&path, err))?;
		originals.insert(path, content);
	}
	for path in scan_paths(block, &[ADD_FILE]) {
		if let Ok(content) = read(&path) {
			originals.insert(path, content);
		}
	}

	Ok(originals)
}

// region:    --- Support

fn ensure_relative(path: &str) -> Result<()> {
	if Path::new(path).is_absolute() {
		return Err(Error::absolute_path(path));
	}
	Ok(())
}

fn content_of<'a>(path: &str, content: Option<&'a str>) -> Result<&'a str> {
	content.ok_or_else(|| Error::Custom(format!("no new content for '{path}'")))
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
