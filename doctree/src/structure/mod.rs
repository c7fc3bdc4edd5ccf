//! Structure builder: a typed, sorted tree of documents and directories.

mod types;
mod walker;

pub use types::{compare_names, TreeNode};
pub use walker::{Scan, StructureBuilder};
