use anchor_lang::prelude::*;

use crate::engine::ScheduleStore;
use crate::error::VestingError;
use crate::state::{
    CallId, ControlFlags, EngineConfig, Lookup, ScheduleId, StoreMode, VestingSchedule,
    VestingSlot,
};

/// `ScheduleStore` over the config account and (at most) one vesting slot.
///
/// An instruction only ever touches the schedule whose slot it was handed;
/// any other id reads as empty and refuses writes.
pub struct AccountStore<'a> {
    config: &'a mut EngineConfig,
    slot: Option<&'a mut VestingSlot>,
}

impl<'a> AccountStore<'a> {
    pub fn new(config: &'a mut EngineConfig, slot: Option<&'a mut VestingSlot>) -> Self {
        Self { config, slot }
    }

    fn slot_for(&self, id: ScheduleId) -> Option<&VestingSlot> {
        self.slot.as_deref().filter(|s| s.schedule_id == id)
    }

    fn slot_mut(&mut self, id: ScheduleId) -> Result<&mut VestingSlot> {
        let slot = self
            .slot
            .as_deref_mut()
            .ok_or(VestingError::MissingAccount)?;
        require!(slot.schedule_id == id, VestingError::InvalidScheduleId);
        Ok(slot)
    }
}

impl ScheduleStore for AccountStore<'_> {
    fn owner(&self) -> Pubkey {
        self.config.owner
    }

    fn is_paused(&self) -> bool {
        self.config.paused
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.config.paused = paused;
        Ok(())
    }

    fn store_mode(&self) -> StoreMode {
        self.config.store_mode
    }

    fn allocate_schedule_id(&mut self) -> Result<ScheduleId> {
        let id = self.config.expected_schedule_id();
        // The slot handed in must be the one derived from this id.
        self.slot_mut(id)?;
        self.config.schedule_count = self
            .config
            .schedule_count
            .checked_add(1)
            .ok_or(VestingError::MathOverflow)?;
        Ok(id)
    }

    fn load_schedule(&self, id: ScheduleId) -> Lookup<VestingSchedule> {
        self.slot_for(id)
            .map_or(Lookup::Empty, |slot| VestingSchedule::lookup(&slot.schedule_data))
    }

    fn save_schedule(&mut self, id: ScheduleId, schedule: &VestingSchedule) -> Result<()> {
        let bytes = schedule.encode()?;
        self.slot_mut(id)?.schedule_data = bytes;
        Ok(())
    }

    fn load_flags(&self, id: ScheduleId) -> ControlFlags {
        self.slot_for(id).map(|s| s.flags).unwrap_or_default()
    }

    fn save_flags(&mut self, id: ScheduleId, flags: &ControlFlags) -> Result<()> {
        self.slot_mut(id)?.flags = *flags;
        Ok(())
    }

    fn housekeeping_call(&self) -> Option<CallId> {
        self.config.housekeeping_call
    }

    fn set_housekeeping_call(&mut self, call: Option<CallId>) -> Result<()> {
        self.config.housekeeping_call = call;
        Ok(())
    }

    fn record_heartbeat(&mut self, period: u64) -> Result<()> {
        self.config.last_heartbeat = period;
        Ok(())
    }
}
