use anchor_lang::prelude::*;

use crate::constants::SINGLE_SLOT_ID;
use crate::state::{CallId, ScheduleId};

/// How schedules are keyed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreMode {
    /// One schedule per engine; creation overwrites it.
    #[default]
    SingleSlot,
    /// Each creation takes the next id from the schedule counter.
    Keyed,
}

/// Engine-wide state PDA; also the authority of every vault and the fee escrow.
#[account]
pub struct EngineConfig {
    /// Owner recorded by the constructor.
    pub owner: Pubkey,
    /// When set, creation and release are no-ops.
    pub paused: bool,
    pub store_mode: StoreMode,
    /// Schedules created so far.
    pub schedule_count: u64,
    pub housekeeping_period: u64,
    pub housekeeping_call: Option<CallId>,
    pub last_heartbeat: u64,
    /// PDA bump seed
    pub bump: u8,
}

impl EngineConfig {
    pub const SIZE: usize =
        32 +               // owner
        1 +                // paused
        1 +                // store_mode
        8 +                // schedule_count
        8 +                // housekeeping_period
        1 + CallId::SIZE + // housekeeping_call
        8 +                // last_heartbeat
        1;                 // bump

    /// Id the next creation will be stored under.
    pub fn expected_schedule_id(&self) -> ScheduleId {
        match self.store_mode {
            StoreMode::SingleSlot => SINGLE_SLOT_ID,
            StoreMode::Keyed => self.schedule_count,
        }
    }
}
