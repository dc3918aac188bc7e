use std::collections::BTreeMap;

use crate::{ActionKind, Error, Patch, PatchAction, Result};

/// Commit-level record of one file's transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
	pub kind: ActionKind,
	pub old_content: Option<String>,
	pub new_content: Option<String>,
	pub move_path: Option<String>,
}

/// The set of final file states a patch resolves to. Paths whose content is
/// unchanged are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
	changes: BTreeMap<String, FileChange>,
}

impl Commit {
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	pub fn len(&self) -> usize {
		self.changes.len()
	}

	pub fn get(&self, path: &str) -> Option<&FileChange> {
		self.changes.get(path)
	}

	/// One `(status, path)` pair per affected file, in map order: `A` for
	/// adds, `M` for updates (reported under the move target when present),
	/// `D` for deletes.
	pub fn paths_touched(&self) -> Vec<(char, String)> {
		self.changes
			.iter()
			.map(|(path, change)| match change.kind {
				ActionKind::Add => ('A', path.clone()),
				ActionKind::Delete => ('D', path.clone()),
				ActionKind::Update => ('M', change.move_path.clone().unwrap_or_else(|| path.clone())),
			})
			.collect()
	}
}

// region:    --- Iterators

impl Commit {
	pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, FileChange> {
		self.changes.iter()
	}
}

impl<'a> IntoIterator for &'a Commit {
	type Item = (&'a String, &'a FileChange);
	type IntoIter = std::collections::btree_map::Iter<'a, String, FileChange>;

	fn into_iter(self) -> Self::IntoIter {
		self.changes.iter()
	}
}

// endregion: --- Iterators

/// Resolves a parsed `Patch` against the original file snapshot into a
/// `Commit` of final file states. Pure: no I/O.
pub fn patch_to_commit(patch: &Patch, originals: &BTreeMap<String, String>) -> Result<Commit> {
	let mut changes = BTreeMap::new();

	for (path, action) in patch {
		match action.kind {
			ActionKind::Delete => {
				let old = originals.get(path).ok_or_else(|| Error::missing_file(path))?;
				changes.insert(
					path.clone(),
					FileChange {
						kind: ActionKind::Delete,
						old_content: Some(old.clone()),
						new_content: None,
						move_path: None,
					},
				);
			}
			ActionKind::Add => {
				let new_file = action
					.new_file
					.clone()
					.ok_or_else(|| Error::Custom(format!("Add action for '{path}' has no content")))?;
				changes.insert(
					path.clone(),
					FileChange {
						kind: ActionKind::Add,
						old_content: None,
						new_content: Some(new_file),
						move_path: None,
					},
				);
			}
			ActionKind::Update => {
				let old = originals.get(path).ok_or_else(|| Error::missing_file(path))?;
				let new = replay_chunks(path, old, action)?;
				if new == *old && action.move_path.is_none() {
					continue;
				}
				changes.insert(
					path.clone(),
					FileChange {
						kind: ActionKind::Update,
						old_content: Some(old.clone()),
						new_content: Some(new),
						move_path: action.move_path.clone(),
					},
				);
			}
		}
	}

	Ok(Commit { changes })
}

// region:    --- Support

/// Replays an update's chunks against the original content: verbatim copy up
/// to each chunk's origin, insertions in place of deletions, verbatim tail.
fn replay_chunks(path: &str, original: &str, action: &PatchAction) -> Result<String> {
	let orig_lines: Vec<&str> = original.split('\n').collect();
	let mut dest: Vec<&str> = Vec::with_capacity(orig_lines.len());
	let mut cursor = 0usize;

	for chunk in &action.chunks {
		if chunk.orig_index > orig_lines.len() || chunk.orig_index + chunk.del_lines.len() > orig_lines.len() {
			return Err(Error::ChunkOutOfRange {
				path: path.to_string(),
				orig_index: chunk.orig_index,
				line_count: orig_lines.len(),
			});
		}
		if cursor > chunk.orig_index {
			return Err(Error::ChunkOrderViolation {
				path: path.to_string(),
				orig_index: chunk.orig_index,
				cursor,
			});
		}
		dest.extend(&orig_lines[cursor..chunk.orig_index]);
		dest.extend(chunk.ins_lines.iter().map(String::as_str));
		cursor = chunk.orig_index + chunk.del_lines.len();
	}
	dest.extend(&orig_lines[cursor..]);

	Ok(dest.join("\n"))
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
