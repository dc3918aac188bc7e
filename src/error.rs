use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum Error {
	#[display("{_0}")]
	#[from(String, &String, &str)]
	Custom(String),

	// -- Envelope / Blocks
	#[display("Invalid patch envelope: {reason}")]
	InvalidPatchEnvelope { reason: String },

	#[display("Unterminated patch block: '*** Begin Patch' on line {begin_line} has no matching '*** End Patch'")]
	UnterminatedBlock { begin_line: usize },

	// -- Parse
	#[display("Unknown line {line_number}: {line}")]
	UnknownLine { line: String, line_number: usize },

	#[display("Invalid hunk line {line_number}: {line}")]
	InvalidHunkLine { line: String, line_number: usize },

	#[display("Invalid line in Add File body for '{path}': {line}")]
	InvalidAddFileLine { path: String, line: String },

	#[display("Duplicate path in patch: {path}")]
	DuplicatePath { path: String },

	#[display("Missing file: {path}")]
	MissingFile { path: String },

	#[display("File already exists: {path}")]
	FileAlreadyExists { path: String },

	// -- Context matching
	#[display("Invalid context for '{path}' at line index {index}, near: {snippet}")]
	InvalidContext { path: String, snippet: String, index: usize },

	#[display("Invalid end-of-file context for '{path}', near: {snippet}")]
	InvalidEofContext { path: String, snippet: String },

	// -- Commit build
	#[display("Chunk out of range for '{path}': line index {orig_index} exceeds file of {line_count} lines")]
	ChunkOutOfRange {
		path: String,
		orig_index: usize,
		line_count: usize,
	},

	#[display("Chunk order violation for '{path}': line index {orig_index} is before cursor {cursor}")]
	ChunkOrderViolation {
		path: String,
		orig_index: usize,
		cursor: usize,
	},

	// -- Apply
	#[display("Absolute path rejected: {path}")]
	AbsolutePath { path: String },

	#[display("File not found: {_0}")]
	FileNotFound(PathAndCause),

	#[display("Read file failed: {_0}")]
	ReadFile(PathAndCause),

	#[display("Write file failed: {_0}")]
	WriteFile(PathAndCause),

	#[display("Remove file failed: {_0}")]
	RemoveFile(PathAndCause),
}

#[derive(Debug, Clone, Display)]
#[display("{path}, cause: {cause}")]
pub struct PathAndCause {
	pub path: String,
	pub cause: String,
}

// region:    --- Custom

impl Error {
	pub fn invalid_patch_envelope(reason: impl Into<String>) -> Self {
		Self::InvalidPatchEnvelope { reason: reason.into() }
	}

	pub fn unknown_line(line: impl Into<String>, line_number: usize) -> Self {
		Self::UnknownLine {
			line: line.into(),
			line_number,
		}
	}

	pub fn invalid_hunk_line(line: impl Into<String>, line_number: usize) -> Self {
		Self::InvalidHunkLine {
			line: line.into(),
			line_number,
		}
	}

	pub fn invalid_add_file_line(path: impl Into<String>, line: impl Into<String>) -> Self {
		Self::InvalidAddFileLine {
			path: path.into(),
			line: line.into(),
		}
	}

	pub fn duplicate_path(path: impl Into<String>) -> Self {
		Self::DuplicatePath { path: path.into() }
	}

	pub fn missing_file(path: impl Into<String>) -> Self {
		Self::MissingFile { path: path.into() }
	}

	pub fn file_already_exists(path: impl Into<String>) -> Self {
		Self::FileAlreadyExists { path: path.into() }
	}

	pub fn invalid_context(path: impl Into<String>, snippet: impl Into<String>, index: usize) -> Self {
		Self::InvalidContext {
			path: path.into(),
			snippet: snippet.into(),
			index,
		}
	}

	pub fn invalid_eof_context(path: impl Into<String>, snippet: impl Into<String>) -> Self {
		Self::InvalidEofContext {
			path: path.into(),
			snippet: snippet.into(),
		}
	}

	pub fn absolute_path(path: impl Into<String>) -> Self {
		Self::AbsolutePath { path: path.into() }
	}

	pub fn file_not_found(path: impl Into<String>, err: impl std::error::Error) -> Self {
		Self::FileNotFound(PathAndCause {
			path: path.into(),
			cause: err.to_string(),
		})
	}

	pub fn read_file(path: impl Into<String>, err: impl std::error::Error) -> Self {
		Self::ReadFile(PathAndCause {
			path: path.into(),
			cause: err.to_string(),
		})
	}

	pub fn write_file(path: impl Into<String>, err: impl std::error::Error) -> Self {
		Self::WriteFile(PathAndCause {
			path: path.into(),
			cause: err.to_string(),
		})
	}

	pub fn remove_file(path: impl Into<String>, err: impl std::error::Error) -> Self {
		Self::RemoveFile(PathAndCause {
			path: path.into(),
			cause: err.to_string(),
		})
	}
}

// endregion: --- Custom

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate

// region:    --- Froms

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Custom(err.to_string())
	}
}

// endregion: --- Froms
