//! Key-value persistence adapters for the call history.
//!
//! [`FileStore`] keeps one JSON document per key in a directory and is what
//! the server uses. [`MemoryStore`] backs tests and ephemeral runs.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
