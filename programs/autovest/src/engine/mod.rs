//! Host-agnostic release engine.
//!
//! Every operation runs inside one host invocation and relies on the host
//! to discard all of its writes when it returns an error.

use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::SLOT_SEARCH_WINDOW;
use crate::error::VestingError;
use crate::events::{DeferredCallCancelled, DeferredCallRegistered};
use crate::state::{CallId, EntryPoint, ScheduleId, Slot};

pub mod admin;
pub mod control;
pub mod create;
pub mod ports;
pub mod release;

#[cfg(test)]
mod tests;

pub use ports::*;

/// Why a release (or nudge) returned without mutating anything.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Paused,
    ExecutionFailed,
    NoSchedule,
    CorruptRecord,
    BeneficiaryMismatch,
    NotDue,
    Completed,
    Locked,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Paused => "engine paused",
            SkipReason::ExecutionFailed => "last execution failed",
            SkipReason::NoSchedule => "no schedule",
            SkipReason::CorruptRecord => "malformed schedule record",
            SkipReason::BeneficiaryMismatch => "beneficiary mismatch",
            SkipReason::NotDue => "not due",
            SkipReason::Completed => "schedule completed",
            SkipReason::Locked => "release in flight",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Skipped(SkipReason),
    Released {
        amount: u64,
        amount_claimed: u64,
        completed: bool,
        next_call: Option<CallId>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NudgeOutcome {
    Skipped(SkipReason),
    /// The pending call is still expected to fire.
    Alive(CallId),
    Rescheduled(CallId),
}

/// One invocation's view of the engine: store, deferred-call primitive,
/// the engine's own address and the current period.
pub struct Engine<'h, S, D> {
    store: &'h mut S,
    calls: &'h mut D,
    contract: Pubkey,
    now: u64,
}

impl<'h, S: ScheduleStore, D: DeferredCalls> Engine<'h, S, D> {
    pub fn new(store: &'h mut S, calls: &'h mut D, contract: Pubkey, now: u64) -> Self {
        Self {
            store,
            calls,
            contract,
            now,
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Books `entry` at the cheapest slot in `[earliest, earliest + SLOT_SEARCH_WINDOW]`.
    fn book_call(
        &mut self,
        entry: EntryPoint,
        payload: Vec<u8>,
        earliest: u64,
        max_gas: u64,
    ) -> Result<(Slot, CallId)> {
        let latest = earliest
            .checked_add(SLOT_SEARCH_WINDOW)
            .ok_or(VestingError::MathOverflow)?;
        let slot = self
            .calls
            .find_cheapest_slot(earliest, latest, max_gas, payload.len() as u64)?;
        let call_id = self.calls.register(slot, entry, payload, max_gas)?;

        emit!(DeferredCallRegistered {
            call_id,
            entry,
            period: slot.period,
            thread: slot.thread,
        });
        Ok((slot, call_id))
    }

    fn cancel_call(&mut self, call_id: &CallId) -> Result<()> {
        self.calls.cancel(call_id)?;
        emit!(DeferredCallCancelled { call_id: *call_id });
        Ok(())
    }

    /// Pending call of `id`; aborts when none is queued.
    pub fn next_call_id(&self, id: ScheduleId) -> Result<CallId> {
        let call_id = self
            .store
            .load_flags(id)
            .next_call_id
            .ok_or(VestingError::NoPendingCall)?;
        require!(
            self.calls.pending_slot(&call_id)?.is_some(),
            VestingError::NoPendingCall
        );
        Ok(call_id)
    }

    /// Cancels `call_id` if it is still queued; a call that already fired
    /// or was dropped is left alone.
    fn cancel_if_pending(&mut self, call_id: &CallId) -> Result<()> {
        if self.calls.pending_slot(call_id)?.is_some() {
            self.cancel_call(call_id)?;
        }
        Ok(())
    }
}
