mod memory;

pub use memory::MemoryContentCache;
