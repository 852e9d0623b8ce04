pub mod call_queue;
pub mod engine_config;
pub mod schedule;
pub mod vesting_slot;

pub use call_queue::*;
pub use engine_config::*;
pub use schedule::*;
pub use vesting_slot::*;
