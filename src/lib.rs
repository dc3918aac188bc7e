// region:    --- Modules

mod applier;
mod blocks;
mod commit;
mod error;
mod matcher;
mod parser;
mod patch;
mod sanitize;

pub use applier::*;
pub use blocks::*;
pub use commit::*;
pub use error::*;
pub use parser::*;
pub use patch::*;
pub use sanitize::*;

// endregion: --- Modules
