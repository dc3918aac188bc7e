use unicode_normalization::UnicodeNormalization;

/// Penalty added when an `*** End of File` anchor had to be ignored and the
/// context was found mid-file instead.
pub(crate) const EOF_FALLBACK_PENALTY: u64 = 10_000;

const RSTRIP_PENALTY: u64 = 1;
const TRIM_PENALTY: u64 = 100;
const CANON_PENALTY: u64 = 1_000;
const WINDOW_PENALTY: u64 = 50_000;

/// How far the last-resort window rung looks around the cursor, in lines.
const WINDOW_RADIUS: isize = 2;
/// Fraction of context lines that must match exactly inside the window,
/// in percent.
const WINDOW_MIN_PCT: usize = 80;

/// Locates `context` inside `file_lines`, scanning from `start`.
///
/// Matching is a ladder: identity, right-trim, full trim, Unicode
/// canonicalisation, then a bounded window around the cursor. The first rung
/// that succeeds wins and contributes its penalty; `None` means no rung
/// matched and the caller must fail loudly. When `eof` is set the terminal
/// position is tried first; finding the context anywhere else costs an extra
/// `EOF_FALLBACK_PENALTY`.
pub(crate) fn find_context(
	file_lines: &[String],
	context: &[String],
	start: usize,
	eof: bool,
) -> Option<(usize, u64)> {
	if eof {
		let anchor = file_lines.len().saturating_sub(context.len());
		if let Some(found) = find_context_core(file_lines, context, anchor) {
			return Some(found);
		}
		let (index, fuzz) = scan_ladder(file_lines, context, start)?;
		return Some((index, fuzz + EOF_FALLBACK_PENALTY));
	}

	scan_ladder(file_lines, context, start)
}

// region:    --- Support

fn scan_ladder(file_lines: &[String], context: &[String], start: usize) -> Option<(usize, u64)> {
	find_context_core(file_lines, context, start).or_else(|| window_match(file_lines, context, start))
}

/// Rungs 1-4: scan every position from `start` with progressively looser
/// line equivalences.
fn find_context_core(file_lines: &[String], context: &[String], start: usize) -> Option<(usize, u64)> {
	if context.is_empty() {
		return Some((start.min(file_lines.len()), 0));
	}

	if let Some(index) = scan(file_lines, context, start, |a, b| a == b) {
		return Some((index, 0));
	}

	if let Some(index) = scan(file_lines, context, start, |a, b| a.trim_end() == b.trim_end()) {
		return Some((index, RSTRIP_PENALTY));
	}

	if let Some(index) = scan(file_lines, context, start, |a, b| a.trim() == b.trim()) {
		return Some((index, TRIM_PENALTY));
	}

	if let Some(index) = scan(file_lines, context, start, |a, b| canon_line(a) == canon_line(b)) {
		return Some((index, CANON_PENALTY));
	}

	None
}

fn scan(
	file_lines: &[String],
	context: &[String],
	start: usize,
	line_eq: impl Fn(&str, &str) -> bool,
) -> Option<usize> {
	let last = file_lines.len().checked_sub(context.len())?;

	(start..=last).find(|&i| {
		context
			.iter()
			.zip(&file_lines[i..i + context.len()])
			.all(|(ctx, line)| line_eq(ctx, line))
	})
}

/// Rung 5: per-line exact equality inside a small window around `start`,
/// accepted when enough of the context lines up. Offsets are tried nearest
/// first so the result is deterministic.
fn window_match(file_lines: &[String], context: &[String], start: usize) -> Option<(usize, u64)> {
	let last = file_lines.len().checked_sub(context.len())?;

	for offset in window_offsets() {
		let pos = start as isize + offset;
		if pos < 0 || pos as usize > last {
			continue;
		}
		let pos = pos as usize;
		let matched = context
			.iter()
			.zip(&file_lines[pos..pos + context.len()])
			.filter(|(ctx, line)| ctx == line)
			.count();
		if matched * 100 >= context.len() * WINDOW_MIN_PCT {
			return Some((pos, WINDOW_PENALTY));
		}
	}

	None
}

fn window_offsets() -> impl Iterator<Item = isize> {
	(0..=WINDOW_RADIUS).flat_map(|d| if d == 0 { vec![0] } else { vec![-d, d] })
}

/// Canonicalises a line for the Unicode rung: NFC normalisation followed by
/// a narrow punctuation fold. The fold maps look-alike dashes, quotes and
/// spaces to ASCII and nothing else; alphabetic look-alikes stay distinct so
/// identifiers never false-positive. U+200B is left intact: it must appear
/// on both sides or neither.
pub(crate) fn canon_line(s: &str) -> String {
	s.nfc().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
	match c {
		'\u{002D}' | '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
		'\u{0022}' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' => '"',
		'\u{0027}' | '\u{2018}'..='\u{201B}' => '\'',
		'\u{00A0}' | '\u{2002}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => ' ',
		_ => c,
	}
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
