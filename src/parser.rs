use std::collections::BTreeMap;

use crate::blocks::{ADD_FILE, BEGIN_PATCH, DELETE_FILE, END_OF_FILE, END_PATCH, MOVE_TO, UPDATE_FILE};
use crate::matcher::find_context;
use crate::sanitize::{is_positional_anchor, repair_hunk_headers, sanitize_patch_text};
use crate::{Chunk, Error, Patch, PatchAction, Result};

/// Parses raw patch text into a `Patch` against the given snapshot of
/// original file contents. Pure: never touches I/O. The second return is the
/// accumulated fuzz, an advisory penalty for every tolerated deviation.
pub fn text_to_patch(text: &str, originals: &BTreeMap<String, String>) -> Result<(Patch, u64)> {
	let lines = repair_hunk_headers(sanitize_patch_text(text));
	parse_block(&lines, originals)
}

/// Parses one already-sanitized block (envelope markers intact). Hosts that
/// split a multi-block text themselves go through this entry so sanitized
/// lines are not sanitized twice.
pub fn parse_block(lines: &[String], originals: &BTreeMap<String, String>) -> Result<(Patch, u64)> {
	if lines.len() < 2 || lines.first().is_none_or(|l| l != BEGIN_PATCH) {
		return Err(Error::invalid_patch_envelope("patch must start with '*** Begin Patch'"));
	}
	if lines.last().is_none_or(|l| l != END_PATCH) {
		return Err(Error::invalid_patch_envelope("patch must end with '*** End Patch'"));
	}

	let mut parser = BlockParser {
		lines,
		index: 1,
		originals,
		patch: Patch::new(),
		fuzz: 0,
	};
	parser.parse()?;

	Ok((parser.patch, parser.fuzz))
}

// region:    --- BlockParser

struct BlockParser<'a> {
	lines: &'a [String],
	index: usize,
	originals: &'a BTreeMap<String, String>,
	patch: Patch,
	fuzz: u64,
}

/// One peeked update section: the expected slice of the original file
/// (context + deletions) plus the chunks carved out of it, with
/// section-relative `orig_index` values.
struct Section {
	old: Vec<String>,
	chunks: Vec<Chunk>,
	eof: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
	Keep,
	Add,
	Delete,
}

impl BlockParser<'_> {
	/// Document-level state machine: every iteration starts at a file-scope
	/// directive and fully consumes one action.
	fn parse(&mut self) -> Result<()> {
		while self.index < self.lines.len() - 1 {
			let line = &self.lines[self.index];

			if let Some(path) = line.strip_prefix(UPDATE_FILE) {
				let path = path.to_string();
				self.index += 1;
				self.parse_update(&path)?;
			} else if let Some(path) = line.strip_prefix(DELETE_FILE) {
				let path = path.to_string();
				self.index += 1;
				self.parse_delete(&path)?;
			} else if let Some(path) = line.strip_prefix(ADD_FILE) {
				let path = path.to_string();
				self.index += 1;
				self.parse_add(&path)?;
			} else {
				return Err(Error::unknown_line(line, self.position()));
			}
		}
		Ok(())
	}

	fn parse_delete(&mut self, path: &str) -> Result<()> {
		self.ensure_fresh_path(path)?;
		if !self.originals.contains_key(path) {
			return Err(Error::missing_file(path));
		}
		self.patch.insert(path.to_string(), PatchAction::delete());
		Ok(())
	}

	fn parse_add(&mut self, path: &str) -> Result<()> {
		self.ensure_fresh_path(path)?;
		if self.originals.contains_key(path) {
			return Err(Error::file_already_exists(path));
		}

		let mut content = String::new();
		while self.index < self.lines.len() - 1 {
			let line = &self.lines[self.index];
			if line.starts_with("***") {
				break;
			}
			let Some(text) = line.strip_prefix('+') else {
				return Err(Error::invalid_add_file_line(path, line));
			};
			content.push_str(text);
			content.push('\n');
			self.index += 1;
		}

		self.patch.insert(path.to_string(), PatchAction::add(content));
		Ok(())
	}

	fn parse_update(&mut self, path: &str) -> Result<()> {
		self.ensure_fresh_path(path)?;
		let Some(original) = self.originals.get(path) else {
			return Err(Error::missing_file(path));
		};
		let orig_lines: Vec<String> = original.split('\n').map(String::from).collect();

		let move_path = self
			.lines
			.get(self.index)
			.and_then(|l| l.strip_prefix(MOVE_TO))
			.map(String::from);
		if move_path.is_some() {
			self.index += 1;
		}

		let mut action = PatchAction::update(move_path);
		// Origin cursor: sections must locate at or after it.
		let mut cursor = 0usize;

		while self.index < self.lines.len() - 1 {
			let line = &self.lines[self.index];
			if line == END_PATCH
				|| line.starts_with(UPDATE_FILE)
				|| line.starts_with(DELETE_FILE)
				|| line.starts_with(ADD_FILE)
			{
				break;
			}

			if let Some(anchor) = line.strip_prefix("@@") {
				self.index += 1;
				let anchor = anchor.strip_prefix(' ').unwrap_or(anchor);
				if !anchor.is_empty() && !is_positional_anchor(anchor) {
					cursor = self.seek_anchor(&orig_lines, anchor, cursor);
				}
				continue;
			}

			let mut section = self.peek_section()?;
			if section.old.is_empty() && section.chunks.is_empty() && !section.eof {
				return Err(Error::invalid_hunk_line(&self.lines[self.index], self.position()));
			}

			let mut old: &[String] = &section.old;
			let mut found = find_context(&orig_lines, old, cursor, section.eof);

			// A trailing empty context line is usually the artifact of
			// splitting a newline-terminated file; retry without it.
			if found.is_none() && old.last().is_some_and(|s| s.is_empty()) {
				old = &old[..old.len() - 1];
				found = find_context(&orig_lines, old, cursor, section.eof);
				if found.is_some() {
					trim_trailing_empty_edit(&mut section.chunks, section.old.len());
				}
			}

			let Some((origin, fuzz)) = found else {
				let snippet = section.old.first().cloned().unwrap_or_default();
				return Err(if section.eof {
					Error::invalid_eof_context(path, snippet)
				} else {
					Error::invalid_context(path, snippet, cursor)
				});
			};
			self.fuzz += fuzz;

			let matched_len = old.len();
			for mut chunk in section.chunks {
				chunk.orig_index += origin;
				action.chunks.push(chunk);
			}
			cursor = origin + matched_len;
		}

		self.patch.insert(path.to_string(), action);
		Ok(())
	}

	/// Collects the next run of chunk lines (` `/`+`/`-` prefixed, with a
	/// missing prefix tolerated as context) into parallel `old`, deletion and
	/// insertion sequences, emitting a `Chunk` each time the mode returns to
	/// keep after a run of edits.
	fn peek_section(&mut self) -> Result<Section> {
		let mut old: Vec<String> = Vec::new();
		let mut del_lines: Vec<String> = Vec::new();
		let mut ins_lines: Vec<String> = Vec::new();
		let mut chunks: Vec<Chunk> = Vec::new();
		let mut mode = Mode::Keep;

		while self.index < self.lines.len() {
			let line = &self.lines[self.index];
			if line.starts_with("@@")
				|| line == "***"
				|| line == END_PATCH
				|| line == END_OF_FILE
				|| line.starts_with(UPDATE_FILE)
				|| line.starts_with(DELETE_FILE)
				|| line.starts_with(ADD_FILE)
			{
				break;
			}
			if line.starts_with("***") {
				return Err(Error::invalid_hunk_line(line, self.position()));
			}
			self.index += 1;

			let last_mode = mode;
			let (next_mode, content) = if let Some(rest) = line.strip_prefix('+') {
				(Mode::Add, rest)
			} else if let Some(rest) = line.strip_prefix('-') {
				(Mode::Delete, rest)
			} else if let Some(rest) = line.strip_prefix(' ') {
				(Mode::Keep, rest)
			} else {
				// Missing prefix, common LLM omission: treat as context.
				(Mode::Keep, line.as_str())
			};
			mode = next_mode;

			if mode == Mode::Keep && last_mode != Mode::Keep && (!del_lines.is_empty() || !ins_lines.is_empty()) {
				chunks.push(Chunk {
					orig_index: old.len() - del_lines.len(),
					del_lines: std::mem::take(&mut del_lines),
					ins_lines: std::mem::take(&mut ins_lines),
				});
			}

			match mode {
				Mode::Delete => {
					del_lines.push(content.to_string());
					old.push(content.to_string());
				}
				Mode::Add => ins_lines.push(content.to_string()),
				Mode::Keep => old.push(content.to_string()),
			}
		}

		if !del_lines.is_empty() || !ins_lines.is_empty() {
			chunks.push(Chunk {
				orig_index: old.len() - del_lines.len(),
				del_lines,
				ins_lines,
			});
		}

		let eof = self.lines.get(self.index).is_some_and(|l| l == END_OF_FILE);
		if eof {
			self.index += 1;
		}

		Ok(Section { old, chunks, eof })
	}

	/// Seeks an `@@ <text>` anchor in the original file from the cursor:
	/// strict equality first, then trimmed equality at +1 fuzz. An anchor
	/// that is found nowhere is ignored; the section context alone must
	/// locate the chunk.
	fn seek_anchor(&mut self, orig_lines: &[String], anchor: &str, cursor: usize) -> usize {
		for (i, line) in orig_lines.iter().enumerate().skip(cursor) {
			if line == anchor {
				return i + 1;
			}
		}
		let trimmed = anchor.trim();
		for (i, line) in orig_lines.iter().enumerate().skip(cursor) {
			if line.trim() == trimmed {
				self.fuzz += 1;
				return i + 1;
			}
		}
		cursor
	}

	fn ensure_fresh_path(&self, path: &str) -> Result<()> {
		if self.patch.contains(path) {
			return Err(Error::duplicate_path(path));
		}
		Ok(())
	}

	/// 1-based line number within the block, counting the Begin marker.
	fn position(&self) -> usize {
		self.index + 1
	}
}

/// Drops the trailing empty deletion/insertion of the last chunk when the
/// section's expected slice was matched without its final empty line.
fn trim_trailing_empty_edit(chunks: &mut [Chunk], old_len: usize) {
	let Some(last) = chunks.last_mut() else { return };
	if last.orig_index + last.del_lines.len() != old_len {
		return;
	}
	if last.del_lines.last().is_some_and(|s| s.is_empty()) {
		last.del_lines.pop();
		if last.ins_lines.last().is_some_and(|s| s.is_empty()) {
			last.ins_lines.pop();
		}
	}
}

// endregion: --- BlockParser

// region:    --- Tests


// endregion: --- Tests
