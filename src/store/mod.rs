pub mod memory;

pub use memory::MemoryBundleStore;
