//! Account-backed implementations of the engine ports.

pub mod account_store;
pub mod queue_scheduler;
pub mod spl_ledger;

pub use account_store::AccountStore;
pub use queue_scheduler::QueueScheduler;
pub use spl_ledger::SplLedger;
