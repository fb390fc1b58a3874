//! Store implementations.

pub mod memory_provider;

pub use memory_provider::MemoryStore;
