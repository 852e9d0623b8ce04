pub mod initialize;
pub mod open_call_queue;
pub mod create_vesting_schedule;
pub mod release_vested_tokens;
pub mod execute_deferred_call;
pub mod stop;
pub mod get_next_call_id;
pub mod pause;
pub mod unpause;
pub mod report_execution_status;
pub mod clear_failure;
pub mod nudge;
pub mod fund_fees;

pub use initialize::*;
pub use open_call_queue::*;
pub use create_vesting_schedule::*;
pub use release_vested_tokens::*;
pub use execute_deferred_call::*;
pub use stop::*;
pub use get_next_call_id::*;
pub use pause::*;
pub use unpause::*;
pub use report_execution_status::*;
pub use clear_failure::*;
pub use nudge::*;
pub use fund_fees::*;
