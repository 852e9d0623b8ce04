use anchor_lang::prelude::*;

use crate::constants::{HOUSEKEEPING_MAX_GAS, RELEASE_MAX_GAS, STALL_GRACE_PERIODS};
use crate::dispatch::ReleaseArgs;
use crate::engine::{DeferredCalls, Engine, NudgeOutcome, ScheduleStore, SkipReason};
use crate::error::VestingError;
use crate::events::{Heartbeat, ScheduleNudged};
use crate::state::{CallId, EntryPoint, Lookup, ScheduleId};

impl<S: ScheduleStore, D: DeferredCalls> Engine<'_, S, D> {
    /// Cancels the pending release of `id`. Owner only.
    pub fn stop(&mut self, caller: &Pubkey, id: ScheduleId) -> Result<CallId> {
        require_keys_eq!(*caller, self.store.owner(), VestingError::Unauthorized);

        let mut flags = self.store.load_flags(id);
        let call_id = flags.next_call_id.ok_or(VestingError::NoPendingCall)?;
        require!(
            self.calls.pending_slot(&call_id)?.is_some(),
            VestingError::NoPendingCall
        );
        self.cancel_call(&call_id)?;

        flags.next_call_id = None;
        self.store.save_flags(id, &flags)?;
        Ok(call_id)
    }

    /// Watchdog: re-books the release of a schedule whose pending call is
    /// gone or has been overdue for more than `STALL_GRACE_PERIODS`.
    pub fn nudge(&mut self, caller: &Pubkey, id: ScheduleId) -> Result<NudgeOutcome> {
        require_keys_eq!(*caller, self.store.owner(), VestingError::Unauthorized);

        if self.store.is_paused() {
            return Ok(NudgeOutcome::Skipped(SkipReason::Paused));
        }
        let mut flags = self.store.load_flags(id);
        if flags.is_failed() {
            return Ok(NudgeOutcome::Skipped(SkipReason::ExecutionFailed));
        }
        let mut schedule = match self.store.load_schedule(id) {
            Lookup::Empty => return Ok(NudgeOutcome::Skipped(SkipReason::NoSchedule)),
            Lookup::Corrupt => return Ok(NudgeOutcome::Skipped(SkipReason::CorruptRecord)),
            Lookup::Found(schedule) => schedule,
        };
        if schedule.is_completed() {
            return Ok(NudgeOutcome::Skipped(SkipReason::Completed));
        }
        if flags.release_lock {
            return Ok(NudgeOutcome::Skipped(SkipReason::Locked));
        }

        if let Some(pending) = flags.next_call_id {
            if let Some(slot) = self.calls.pending_slot(&pending)? {
                if self.now <= slot.period.saturating_add(STALL_GRACE_PERIODS) {
                    return Ok(NudgeOutcome::Alive(pending));
                }
                self.cancel_call(&pending)?;
            }
        }

        let earliest = self.now.max(schedule.next_release_period);
        let payload = ReleaseArgs {
            schedule_id: id,
            beneficiary: schedule.beneficiary,
        }
        .encode()?;
        let (slot, call_id) = self.book_call(
            EntryPoint::ReleaseVestedTokens,
            payload,
            earliest,
            RELEASE_MAX_GAS,
        )?;

        schedule.next_release_period = slot.period;
        self.store.save_schedule(id, &schedule)?;
        flags.next_call_id = Some(call_id);
        self.store.save_flags(id, &flags)?;

        emit!(ScheduleNudged {
            schedule_id: id,
            call_id,
            next_release_period: slot.period,
        });
        Ok(NudgeOutcome::Rescheduled(call_id))
    }

    /// Books the housekeeping call `period` periods from now.
    pub fn register_housekeeping(&mut self, period: u64) -> Result<Option<CallId>> {
        if period == 0 {
            return Ok(None);
        }
        let earliest = self
            .now
            .checked_add(period)
            .ok_or(VestingError::MathOverflow)?;
        let (_, call_id) =
            self.book_call(EntryPoint::Housekeeping, Vec::new(), earliest, HOUSEKEEPING_MAX_GAS)?;
        self.store.set_housekeeping_call(Some(call_id))?;
        Ok(Some(call_id))
    }

    pub fn run_housekeeping(&mut self) -> Result<()> {
        self.store.record_heartbeat(self.now)?;
        self.store.set_housekeeping_call(None)?;
        emit!(Heartbeat {
            period: self.now,
            paused: self.store.is_paused(),
        });
        Ok(())
    }
}
