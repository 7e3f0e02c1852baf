pub mod error;
pub mod rename_rule;
pub mod tree_walker;

pub use error::RenameError;
pub use rename_rule::{RenameKind, RenameRule};
pub use tree_walker::{ExclusionSets, TreeWalker, WalkSummary};
