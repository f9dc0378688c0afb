pub mod memory;

pub use memory::InMemoryUserRegistry;
