use std::collections::BTreeMap;

/// What a patch action does to its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
	Add,
	Delete,
	Update,
}

/// One contiguous edit inside an `Update` action.
///
/// `orig_index` is the line index in the original file where the edit begins.
/// Within one action, chunks are non-overlapping and strictly increasing in
/// `orig_index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
	pub orig_index: usize,
	pub del_lines: Vec<String>,
	pub ins_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchAction {
	pub kind: ActionKind,
	pub chunks: Vec<Chunk>,
	/// Full content of the file, set iff `kind` is `Add`.
	pub new_file: Option<String>,
	/// Rename target, only valid on `Update`.
	pub move_path: Option<String>,
}

impl PatchAction {
	pub fn add(new_file: impl Into<String>) -> Self {
		Self {
			kind: ActionKind::Add,
			chunks: Vec::new(),
			new_file: Some(new_file.into()),
			move_path: None,
		}
	}

	pub fn delete() -> Self {
		Self {
			kind: ActionKind::Delete,
			chunks: Vec::new(),
			new_file: None,
			move_path: None,
		}
	}

	pub fn update(move_path: Option<String>) -> Self {
		Self {
			kind: ActionKind::Update,
			chunks: Vec::new(),
			new_file: None,
			move_path,
		}
	}
}

/// A parsed patch: source path to action, each path at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
	actions: BTreeMap<String, PatchAction>,
}

impl Patch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}

	pub fn len(&self) -> usize {
		self.actions.len()
	}

	pub fn contains(&self, path: &str) -> bool {
		self.actions.contains_key(path)
	}

	pub fn get(&self, path: &str) -> Option<&PatchAction> {
		self.actions.get(path)
	}

	pub(crate) fn insert(&mut self, path: String, action: PatchAction) {
		self.actions.insert(path, action);
	}
}

// region:    --- Iterators

impl Patch {
	pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, PatchAction> {
		self.actions.iter()
	}
}

impl IntoIterator for Patch {
	type Item = (String, PatchAction);
	type IntoIter = std::collections::btree_map::IntoIter<String, PatchAction>;

	fn into_iter(self) -> Self::IntoIter {
		self.actions.into_iter()
	}
}

impl<'a> IntoIterator for &'a Patch {
	type Item = (&'a String, &'a PatchAction);
	type IntoIter = std::collections::btree_map::Iter<'a, String, PatchAction>;

	fn into_iter(self) -> Self::IntoIter {
		self.actions.iter()
	}
}

// endregion: --- Iterators
