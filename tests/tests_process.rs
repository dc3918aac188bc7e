//! End-to-end tests of `process_patch` over the injected in-memory
//! filesystem callbacks.

mod test_support;

use assertables::assert_contains;
use patchx::Error;
use test_support::MemFs;

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

#[test]
fn test_process_simple_update() -> Result<()> {
	// -- Setup & Fixtures
	let fs = MemFs::new(&[("hello.py", "def f():\n    pass\n")]);
	let text = "*** Begin Patch\n*** Update File: hello.py\n@@\n def f():\n-    pass\n+    raise NotImplementedError()\n*** End Patch";

	// -- Exec
	let done = fs.apply(text)?;

	// -- Check
	assert_eq!(done, "Done!");
	let content = fs.contents("hello.py").ok_or("hello.py missing")?;
	assert_eq!(content, "def f():\n    raise NotImplementedError()\n");

	Ok(())
}

#[test]
fn test_process_add_then_delete_is_noop() -> Result<()> {
	// -- Setup & Fixtures
	let fs = MemFs::empty();
	let add = "*** Begin Patch\n*** Add File: p.txt\n+hello\n+world\n*** End Patch";
	let delete = "*** Begin Patch\n*** Delete File: p.txt\n*** End Patch";

	// -- Exec & Check (intermediate state)
	fs.apply(add)?;
	assert_eq!(fs.contents("p.txt").as_deref(), Some("hello\nworld\n"));

	// -- Exec & Check (final state)
	fs.apply(delete)?;
	assert!(fs.paths().is_empty());

	Ok(())
}

#[test]
fn test_process_move_file() -> Result<()> {
	// -- Setup & Fixtures
	let fs = MemFs::new(&[("old/name.txt", "line\n")]);
	let text = "*** Begin Patch\n*** Update File: old/name.txt\n*** Move to: new/name.txt\n@@\n-line\n+line2\n*** End Patch";

	// -- Exec
	fs.apply(text)?;

	// -- Check
	assert!(fs.contents("old/name.txt").is_none());
	assert_eq!(fs.contents("new/name.txt").as_deref(), Some("line2\n"));

	Ok(())
}

#[test]
fn test_process_multiple_actions_one_block() -> Result<()> {
	// -- Setup & Fixtures
	let fs = MemFs::new(&[
		("update.py", "foo\nbar\n"),
		("delete.py", "obsolete\n"),
	]);
	let text = "*** Begin Patch\n*** Add File: path/add.py\n+abc\n+def\n*** Delete File: delete.py\n*** Update File: update.py\n@@\n foo\n-bar\n+baz\n*** End Patch";

	// -- Exec
	fs.apply(text)?;

	// -- Check
	assert_eq!(fs.contents("path/add.py").as_deref(), Some("abc\ndef\n"));
	assert!(fs.contents("delete.py").is_none());
	assert_eq!(fs.contents("update.py").as_deref(), Some("foo\nbaz\n"));

	Ok(())
}

#[test]
fn test_process_multi_block_input() -> Result<()> {
	// -- Setup & Fixtures
	let fs = MemFs::empty();
	let text = "*** Begin Patch\n*** Add File: a.txt\n+first\n*** End Patch\nnarration between blocks\n*** Begin Patch\n*** Update File: a.txt\n@@\n-first\n+second\n*** End Patch";

	// -- Exec
	fs.apply(text)?;

	// -- Check
	assert_eq!(fs.contents("a.txt").as_deref(), Some("second\n"));

	Ok(())
}

#[test]
fn test_process_crlf_input() -> Result<()> {
	// -- Setup & Fixtures
	let fs = MemFs::new(&[("w.txt", "one\ntwo\n")]);
	let text = "*** Begin Patch\r\n*** Update File: w.txt\r\n@@\r\n one\r\n-two\r\n+deux\r\n*** End Patch\r\n";

	// -- Exec
	fs.apply(text)?;

	// -- Check
	assert_eq!(fs.contents("w.txt").as_deref(), Some("one\ndeux\n"));

	Ok(())
}

#[test]
fn test_process_invalid_context_writes_nothing() {
	// -- Setup & Fixtures
	let fs = MemFs::new(&[("twins.py", "def a():\n    return 1\n\ndef b():\n    return 1\n")]);
	let before = fs.snapshot();
	let text = "*** Begin Patch\n*** Update File: twins.py\n@@\n def x():\n-    return 1\n+    return 2\n*** End Patch";

	// -- Exec
	let res = fs.apply(text);

	// -- Check
	assert!(matches!(res, Err(Error::InvalidContext { .. })));
	assert_eq!(fs.snapshot(), before);
}

#[test]
fn test_process_file_not_found() {
	// -- Setup & Fixtures
	let fs = MemFs::empty();
	let text = "*** Begin Patch\n*** Update File: ghost.txt\n@@\n x\n*** End Patch";

	// -- Exec
	let res = fs.apply(text);

	// -- Check
	let err = res.expect_err("should fail");
	assert!(matches!(err, Error::FileNotFound(_)));
	assert_contains!(err.to_string(), "ghost.txt");
}

#[test]
fn test_process_absolute_path_rejected() {
	// -- Setup & Fixtures
	let fs = MemFs::empty();
	let text = "*** Begin Patch\n*** Add File: /etc/evil.txt\n+boo\n*** End Patch";

	// -- Exec
	let res = fs.apply(text);

	// -- Check
	assert!(matches!(res, Err(Error::AbsolutePath { .. })));
	assert!(fs.paths().is_empty());
}

#[test]
fn test_process_unterminated_block() {
	// -- Setup & Fixtures
	let fs = MemFs::empty();
	let text = "*** Begin Patch\n*** Add File: a.txt\n+x";

	// -- Exec
	let res = fs.apply(text);

	// -- Check
	assert!(matches!(res, Err(Error::UnterminatedBlock { .. })));
	assert!(fs.paths().is_empty());
}

#[test]
fn test_process_no_block_found() {
	// -- Setup & Fixtures
	let fs = MemFs::empty();

	// -- Exec
	let res = fs.apply("just some prose, no patch at all");

	// -- Check
	assert!(matches!(res, Err(Error::InvalidPatchEnvelope { .. })));
}

#[test]
fn test_process_on_real_filesystem() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	let root = dir.path().to_path_buf();
	std::fs::write(root.join("greet.txt"), "hello\nworld\n")?;
	let text = "*** Begin Patch\n*** Update File: greet.txt\n@@\n hello\n-world\n+there\n*** End Patch";

	// -- Exec
	let done = patchx::process_patch(
		text,
		|path| std::fs::read_to_string(root.join(path)),
		|path, content| std::fs::write(root.join(path), content),
		|path| std::fs::remove_file(root.join(path)),
	)?;

	// -- Check
	assert_eq!(done, "Done!");
	assert_eq!(std::fs::read_to_string(root.join("greet.txt"))?, "hello\nthere\n");

	Ok(())
}

#[test]
fn test_process_error_message_names_the_path() {
	// -- Setup & Fixtures
	let fs = MemFs::new(&[("a.txt", "alpha\nbeta\n")]);
	let text = "*** Begin Patch\n*** Update File: a.txt\n@@\n nothing\n like\n-this\n*** End Patch";

	// -- Exec
	let err = fs.apply(text).expect_err("should fail");

	// -- Check
	assert_contains!(err.to_string(), "a.txt");
	assert_contains!(err.to_string(), "nothing");
}
