use anchor_lang::prelude::*;

use crate::constants::RELEASE_MAX_GAS;
use crate::dispatch::ReleaseArgs;
use crate::engine::{DeferredCalls, Engine, ReleaseOutcome, ScheduleStore, SkipReason, TokenLedger};
use crate::error::VestingError;
use crate::events::{ReleaseSkipped, TokensReleased};
use crate::state::{EntryPoint, Lookup, ScheduleId};

impl<S: ScheduleStore, D: DeferredCalls> Engine<'_, S, D> {
    /// One release pass. Business conditions return `Skipped`; only invariant
    /// violations (e.g. a transfer that does not credit the beneficiary) abort.
    pub fn release_vested_tokens<L: TokenLedger>(
        &mut self,
        ledger: &mut L,
        args: &ReleaseArgs,
    ) -> Result<ReleaseOutcome> {
        let id = args.schedule_id;

        if self.store.is_paused() {
            return Ok(self.skip(id, SkipReason::Paused));
        }

        let mut flags = self.store.load_flags(id);
        if flags.is_failed() {
            return Ok(self.skip(id, SkipReason::ExecutionFailed));
        }

        let mut schedule = match self.store.load_schedule(id) {
            Lookup::Empty => return Ok(self.skip(id, SkipReason::NoSchedule)),
            Lookup::Corrupt => {
                flags.release_lock = false;
                self.store.save_flags(id, &flags)?;
                return Ok(self.skip(id, SkipReason::CorruptRecord));
            }
            Lookup::Found(schedule) => schedule,
        };

        if schedule.beneficiary != args.beneficiary {
            return Ok(self.skip(id, SkipReason::BeneficiaryMismatch));
        }
        if self.now < schedule.next_release_period {
            return Ok(self.skip(id, SkipReason::NotDue));
        }
        if schedule.is_completed() {
            return Ok(self.skip(id, SkipReason::Completed));
        }
        if flags.release_lock {
            return Ok(self.skip(id, SkipReason::Locked));
        }

        flags.release_lock = true;
        self.store.save_flags(id, &flags)?;

        let amount = schedule.next_release_amount()?;
        let beneficiary = schedule.beneficiary;
        let before = ledger.balance_of(&schedule.token, &beneficiary)?;
        ledger.transfer(&schedule.token, &self.contract, &beneficiary, amount)?;
        let after = ledger.balance_of(&schedule.token, &beneficiary)?;
        require!(after > before, VestingError::TransferNotCredited);

        schedule.record_release(amount)?;

        // A direct release supersedes the queued call for this period.
        if let Some(superseded) = flags.next_call_id.take() {
            self.cancel_if_pending(&superseded)?;
        }

        let completed = schedule.is_completed();
        if !completed {
            let due = self
                .now
                .checked_add(schedule.release_interval)
                .ok_or(VestingError::MathOverflow)?;
            let (slot, call_id) = self.book_call(
                EntryPoint::ReleaseVestedTokens,
                args.encode()?,
                due,
                RELEASE_MAX_GAS,
            )?;
            schedule.next_release_period = slot.period;
            flags.next_call_id = Some(call_id);
        }
        self.store.save_schedule(id, &schedule)?;

        flags.release_lock = false;
        self.store.save_flags(id, &flags)?;

        emit!(TokensReleased {
            schedule_id: id,
            beneficiary,
            amount,
            amount_claimed: schedule.amount_claimed,
            total_amount: schedule.total_amount,
            next_release_period: schedule.next_release_period,
            completed,
        });

        Ok(ReleaseOutcome::Released {
            amount,
            amount_claimed: schedule.amount_claimed,
            completed,
            next_call: flags.next_call_id,
        })
    }

    pub(crate) fn skip(&self, id: ScheduleId, reason: SkipReason) -> ReleaseOutcome {
        msg!("release {} skipped: {}", id, reason);
        emit!(ReleaseSkipped {
            schedule_id: id,
            reason,
            period: self.now,
        });
        ReleaseOutcome::Skipped(reason)
    }
}
