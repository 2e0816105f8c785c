// src/filesystem/mod.rs

//! Filesystem helpers shared by staging and archiving

pub mod walk;

pub use walk::{WalkOrder, delete_tree, walk_tree};
