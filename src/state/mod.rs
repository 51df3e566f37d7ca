//! Persistence for everything the bot remembers between turns.

pub mod scope;
pub mod storage;

pub use scope::{StateScope, storage_key};
pub use storage::{MemoryStorage, Storage};
