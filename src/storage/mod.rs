//! Storage backends for persisted extension state.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, read_list, write_list, write_value};
