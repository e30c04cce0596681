//! Built-in storage strategies.

mod memory;

pub use memory::MemoryStorage;
