use anchor_lang::prelude::*;

use crate::constants::VESTING_SEED;
use crate::state::{CallId, ScheduleId, VestingSchedule};

/// Status reported for the last execution of a schedule's deferred call.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionStatus {
    #[default]
    Unknown,
    Succeeded,
    Failed,
}

/// Per-schedule control flags, kept apart from the schedule bytes so a
/// malformed record can still be unlocked.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlFlags {
    /// Held for the duration of one release pass.
    pub release_lock: bool,
    pub last_execution_status: ExecutionStatus,
    pub last_failed_period: Option<u64>,
    /// Pending deferred self-invocation, if any.
    pub next_call_id: Option<CallId>,
}

impl ControlFlags {
    pub const SIZE: usize =
        1 +          // release_lock
        1 +          // last_execution_status
        1 + 8 +      // last_failed_period
        1 + CallId::SIZE; // next_call_id

    pub fn is_failed(&self) -> bool {
        self.last_execution_status == ExecutionStatus::Failed
    }
}

/// Storage slot of one schedule.
/// Seeds: [b"vesting", schedule_id.to_le_bytes()]
#[account]
pub struct VestingSlot {
    pub schedule_id: ScheduleId,
    /// Borsh bytes of the `VestingSchedule`; empty when no schedule exists.
    pub schedule_data: Vec<u8>,
    pub flags: ControlFlags,
    /// PDA bump seed
    pub bump: u8,
}

impl VestingSlot {
    pub const SIZE: usize =
        8 +                        // schedule_id
        4 + VestingSchedule::SIZE + // schedule_data
        ControlFlags::SIZE +       // flags
        1;                         // bump

    pub fn address(schedule_id: ScheduleId) -> Pubkey {
        Pubkey::find_program_address(&[VESTING_SEED, &schedule_id.to_le_bytes()], &crate::ID).0
    }
}
