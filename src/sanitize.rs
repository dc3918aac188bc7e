use once_cell::sync::Lazy;
use regex::Regex;

/// Lines that survive sanitization: patch directives (`***`), legacy diff
/// file headers (`---`/`+++`), hunk headers (`@@`), and chunk lines
/// (space/plus/minus prefix). Everything else is LLM narration.
static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\*\*\*|---|\+\+\+|@@|[ +\-])").unwrap());

/// Recognisable numeric hunk headers, with tolerance for a space in place of
/// the comma and for missing counts.
static RE_HEADER: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^@@ -(\d+)(?:[ ,](\d+))? \+(\d+)(?:[ ,](\d+))? @@$").unwrap());

/// The anchor text of a canonical numeric header, as produced by
/// `repair_hunk_headers` with the leading `@@ ` stripped.
static RE_POSITIONAL_ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\d+,\d+ \+\d+,\d+ @@$").unwrap());

/// Turns raw patch text (possibly containing LLM chatter, CRLF endings, and
/// stray control characters) into the clean line sequence the rest of the
/// engine operates on.
///
/// Ordering of the steps matters: narration is dropped before trimming so a
/// chunk line's leading whitespace is never inspected out of context, and
/// right-trim happens before the control scrub so the scrub sees final text.
/// Leading whitespace is never touched (it is significant for diff
/// semantics).
pub fn sanitize_patch_text(text: &str) -> Vec<String> {
	let text = text.replace("\r\n", "\n").replace('\r', "\n");

	text.trim()
		.split('\n')
		.filter(|line| RE_TOKEN.is_match(line))
		.map(|line| scrub_control_chars(line.trim_end()))
		.collect()
}

/// Rewrites recognisable hunk-header typos (`@@ -3 +3 @@`, `@@ -3 2 +3 4 @@`)
/// into the canonical `@@ -S,D +S2,I @@` form, supplying `0` for missing
/// counts. All other lines pass through unchanged.
pub fn repair_hunk_headers(lines: Vec<String>) -> Vec<String> {
	lines
		.into_iter()
		.map(|line| match RE_HEADER.captures(&line) {
			Some(caps) => {
				let del = caps.get(2).map_or("0", |m| m.as_str());
				let ins = caps.get(4).map_or("0", |m| m.as_str());
				format!("@@ -{},{del} +{},{ins} @@", &caps[1], &caps[3])
			}
			None => line,
		})
		.collect()
}

/// True when an `@@ <text>` anchor is a repaired numeric header rather than
/// context text. Positional headers carry no context in this format, so the
/// parser must not seek them in the original file.
pub(crate) fn is_positional_anchor(anchor: &str) -> bool {
	RE_POSITIONAL_ANCHOR.is_match(anchor)
}

// region:    --- Support

fn scrub_control_chars(line: &str) -> String {
	if !line.chars().any(is_stray_control) {
		return line.to_string();
	}
	let cleaned: String = line.chars().filter(|c| !is_stray_control(*c)).collect();
	tracing::warn!("stripped control characters from patch line: {cleaned}");
	cleaned
}

/// Control ranges scrubbed from patch lines. Tab (U+0009) stays, it is
/// legitimate indentation; the line-ending characters never reach here.
fn is_stray_control(c: char) -> bool {
	matches!(c, '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000C}' | '\u{000E}'..='\u{001F}')
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
