//! Persistence implementations
//!
//! This module provides the file-backed and in-memory implementations of
//! the slot storage trait.

mod file_slot_storage;
mod memory_slot_storage;

pub use file_slot_storage::FileSlotStorage;
pub use memory_slot_storage::MemorySlotStorage;
