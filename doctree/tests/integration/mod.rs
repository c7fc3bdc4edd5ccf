//! Integration tests for the document store
//!
//! These tests drive `DocStore` against real temporary directory trees:
//! sandboxing, structure and navigation, health scoring and mutations.

pub mod documents;
pub mod helpers;
pub mod navigation;
pub mod sandbox;
