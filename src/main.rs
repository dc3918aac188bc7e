use std::io::{self, Read};
use std::process;

use patchx::{
	Result, apply_commit, load_originals, parse_block, patch_to_commit, repair_hunk_headers, sanitize_patch_text,
	split_blocks,
};
use simple_fs::{SPath, ensure_file_dir};

fn main() {
	tracing::subscriber::set_global_default(
		tracing_subscriber::fmt()
			.with_max_level(tracing::Level::WARN)
			.with_writer(io::stderr)
			.finish(),
	)
	.expect("install tracing subscriber");

	let dry_run = std::env::args().skip(1).any(|arg| arg == "--dry-run");

	let mut input = String::new();
	if let Err(err) = io::stdin().read_to_string(&mut input) {
		eprintln!("Error: failed to read patch from stdin: {err}");
		process::exit(1);
	}
	if input.trim().is_empty() {
		eprintln!("Error: no patch data on stdin.");
		process::exit(1);
	}

	match run(&input, dry_run) {
		Ok(statuses) => {
			if !dry_run {
				for (status, path) in statuses {
					println!("{status} {path}");
				}
				println!("Done!");
			} else {
				println!("Done! (dry-run)");
			}
		}
		Err(err) => {
			eprintln!("{err}");
			process::exit(1);
		}
	}
}

fn run(input: &str, dry_run: bool) -> Result<Vec<(char, String)>> {
	let lines = repair_hunk_headers(sanitize_patch_text(input));
	let blocks = split_blocks(&lines)?;
	if blocks.is_empty() {
		return Err("no '*** Begin Patch' block found on stdin".into());
	}

	let mut statuses = Vec::new();

	for block in blocks {
		let originals = load_originals(block, |path| std::fs::read_to_string(path))?;
		let (patch, _fuzz) = parse_block(block, &originals)?;
		let commit = patch_to_commit(&patch, &originals)?;
		statuses.extend(commit.paths_touched());
		if !dry_run {
			apply_commit(&commit, write_file, |path| std::fs::remove_file(path))?;
		}
	}

	Ok(statuses)
}

/// Default write callback: creates missing parent directories so `Add File`
/// can introduce files in fresh subtrees.
fn write_file(path: &str, content: &str) -> io::Result<()> {
	ensure_file_dir(&SPath::new(path)).map_err(io::Error::other)?;
	std::fs::write(path, content)
}
