//! Storage layer for atomic file operations.

mod slot_file;

pub use slot_file::{SlotFile, SlotFileError, Slots};
