//! Filesystem access shared by the read and write paths.

pub mod locking;

pub use locking::{locked_read, locked_write, PathLocks};
