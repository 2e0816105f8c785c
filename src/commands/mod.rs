// src/commands/mod.rs
//! Command handlers for the jar2bundle CLI

mod convert;
mod inspect;
mod packages;

pub use convert::{ConvertOptions, cmd_convert};
pub use inspect::cmd_inspect;
pub use packages::cmd_packages;
