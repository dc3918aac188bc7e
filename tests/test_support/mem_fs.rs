use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

/// In-memory filesystem backing the three injected engine callbacks, so the
/// integration tests never touch disk.
pub struct MemFs {
	files: RefCell<BTreeMap<String, String>>,
}

impl MemFs {
	pub fn new(entries: &[(&str, &str)]) -> Self {
		Self {
			files: RefCell::new(entries.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect()),
		}
	}

	pub fn empty() -> Self {
		Self::new(&[])
	}

	pub fn contents(&self, path: &str) -> Option<String> {
		self.files.borrow().get(path).cloned()
	}

	pub fn paths(&self) -> Vec<String> {
		self.files.borrow().keys().cloned().collect()
	}

	pub fn snapshot(&self) -> BTreeMap<String, String> {
		self.files.borrow().clone()
	}

	/// Runs `process_patch` against this filesystem.
	pub fn apply(&self, patch_text: &str) -> patchx::Result<&'static str> {
		patchx::process_patch(patch_text, self.read_fn(), self.write_fn(), self.remove_fn())
	}

	pub fn read_fn(&self) -> impl FnMut(&str) -> io::Result<String> + '_ {
		|path: &str| {
			self.files
				.borrow()
				.get(path)
				.cloned()
				.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
		}
	}

	pub fn write_fn(&self) -> impl FnMut(&str, &str) -> io::Result<()> + '_ {
		|path: &str, content: &str| {
			self.files.borrow_mut().insert(path.to_string(), content.to_string());
			Ok(())
		}
	}

	pub fn remove_fn(&self) -> impl FnMut(&str) -> io::Result<()> + '_ {
		|path: &str| {
			self.files
				.borrow_mut()
				.remove(path)
				.map(|_| ())
				.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
		}
	}
}
