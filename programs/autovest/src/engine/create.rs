use anchor_lang::prelude::*;

use crate::constants::{RELEASE_MAX_GAS, SINGLE_SLOT_ID};
use crate::dispatch::ReleaseArgs;
use crate::engine::{DeferredCalls, Engine, ScheduleStore, TokenLedger};
use crate::error::VestingError;
use crate::events::ScheduleCreated;
use crate::state::{
    ControlFlags, CreateParams, EntryPoint, Lookup, ScheduleId, StoreMode, VestingSchedule,
};

impl<S: ScheduleStore, D: DeferredCalls> Engine<'_, S, D> {
    /// Escrows `total_amount` from `caller` and books the first release.
    ///
    /// Returns `None` (and does nothing) while the engine is paused. In
    /// single-slot mode the slot is only reusable once its schedule has
    /// completed.
    pub fn create_vesting_schedule<L: TokenLedger>(
        &mut self,
        ledger: &mut L,
        caller: &Pubkey,
        params: &CreateParams,
    ) -> Result<Option<ScheduleId>> {
        if self.store.is_paused() {
            msg!("create_vesting_schedule: engine paused");
            return Ok(None);
        }

        if self.store.store_mode() == StoreMode::SingleSlot {
            if let Lookup::Found(current) = self.store.load_schedule(SINGLE_SLOT_ID) {
                require!(current.is_completed(), VestingError::ScheduleActive);
            }
        }

        let mut schedule = VestingSchedule::new(params, self.now)?;
        let total = schedule.total_amount;
        let token = schedule.token;

        let allowance = ledger.allowance(&token, caller, &self.contract)?;
        require!(allowance >= total, VestingError::InsufficientAllowance);

        let before = ledger.balance_of(&token, &self.contract)?;
        ledger.transfer_from(&token, &self.contract, caller, &self.contract, total)?;
        let after = ledger.balance_of(&token, &self.contract)?;
        let expected = before.checked_add(total).ok_or(VestingError::MathOverflow)?;
        require!(after >= expected, VestingError::DepositShortfall);

        let id = self.store.allocate_schedule_id()?;
        // A reused slot whose record was unreadable may still have a call
        // queued; it would only ever no-op.
        if let Some(stale) = self.store.load_flags(id).next_call_id {
            self.cancel_if_pending(&stale)?;
        }

        let payload = ReleaseArgs {
            schedule_id: id,
            beneficiary: schedule.beneficiary,
        }
        .encode()?;
        let (slot, call_id) = self.book_call(
            EntryPoint::ReleaseVestedTokens,
            payload,
            schedule.next_release_period,
            RELEASE_MAX_GAS,
        )?;
        schedule.next_release_period = slot.period;

        self.store.save_schedule(id, &schedule)?;
        self.store.save_flags(
            id,
            &ControlFlags {
                next_call_id: Some(call_id),
                ..ControlFlags::default()
            },
        )?;

        emit!(ScheduleCreated {
            schedule_id: id,
            beneficiary: schedule.beneficiary,
            token,
            total_amount: total,
            release_percentage: schedule.release_percentage,
            release_interval: schedule.release_interval,
            next_release_period: schedule.next_release_period,
            call_id,
        });

        Ok(Some(id))
    }
}
