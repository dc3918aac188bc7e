use crate::sanitize::sanitize_patch_text;
use crate::{Error, Result};

pub(crate) const BEGIN_PATCH: &str = "*** Begin Patch";
pub(crate) const END_PATCH: &str = "*** End Patch";
pub(crate) const ADD_FILE: &str = "*** Add File: ";
pub(crate) const DELETE_FILE: &str = "*** Delete File: ";
pub(crate) const UPDATE_FILE: &str = "*** Update File: ";
pub(crate) const MOVE_TO: &str = "*** Move to: ";
pub(crate) const END_OF_FILE: &str = "*** End of File";

/// Splits a sanitized line sequence into self-contained patch blocks, each
/// running from `*** Begin Patch` to `*** End Patch` inclusive. Lines outside
/// any block are ignored.
pub fn split_blocks(lines: &[String]) -> Result<Vec<&[String]>> {
	let mut blocks = Vec::new();
	let mut i = 0;

	while i < lines.len() {
		if lines[i] != BEGIN_PATCH {
			i += 1;
			continue;
		}
		let end = lines[i..]
			.iter()
			.position(|l| l == END_PATCH)
			.ok_or(Error::UnterminatedBlock { begin_line: i + 1 })?;
		blocks.push(&lines[i..=i + end]);
		i += end + 1;
	}

	Ok(blocks)
}

/// Pre-scans patch text for the existing files it will read (`Update` and
/// `Delete` targets), across all blocks, in first-seen order. Used by hosts
/// to load originals before parsing.
pub fn identify_files_needed(text: &str) -> Vec<String> {
	let lines = sanitize_patch_text(text);
	scan_paths(&lines, &[UPDATE_FILE, DELETE_FILE])
}

/// Pre-scans patch text for the files its `Add` actions will create.
pub fn identify_files_added(text: &str) -> Vec<String> {
	let lines = sanitize_patch_text(text);
	scan_paths(&lines, &[ADD_FILE])
}

// region:    --- Support

pub(crate) fn scan_paths(lines: &[String], prefixes: &[&str]) -> Vec<String> {
	let mut paths: Vec<String> = Vec::new();

	for line in lines {
		for prefix in prefixes {
			if let Some(path) = line.strip_prefix(prefix) {
				if !paths.iter().any(|p| p == path) {
					paths.push(path.to_string());
				}
			}
		}
	}

	paths
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
