//! Hosts that run the engine outside the Solana runtime.

pub mod memory;

pub use memory::{Execution, MemoryHost, MemoryLedger, MemoryScheduler, MemoryStore, World};
