//! Owner-only switches that only touch the store.

use anchor_lang::prelude::*;

use crate::engine::ScheduleStore;
use crate::error::VestingError;
use crate::events::{EnginePaused, EngineUnpaused, ExecutionStatusReported, FailureCleared};
use crate::state::{ExecutionStatus, ScheduleId};

pub fn pause<S: ScheduleStore>(store: &mut S, caller: &Pubkey) -> Result<()> {
    require_keys_eq!(*caller, store.owner(), VestingError::Unauthorized);
    require!(!store.is_paused(), VestingError::AlreadyPaused);
    store.set_paused(true)?;
    emit!(EnginePaused { owner: *caller });
    Ok(())
}

pub fn unpause<S: ScheduleStore>(store: &mut S, caller: &Pubkey) -> Result<()> {
    require_keys_eq!(*caller, store.owner(), VestingError::Unauthorized);
    require!(store.is_paused(), VestingError::NotPaused);
    store.set_paused(false)?;
    emit!(EngineUnpaused { owner: *caller });
    Ok(())
}

/// Records the outcome of a deferred execution as observed by the operator.
/// A `Failed` status halts automatic releases of `id` until cleared.
pub fn report_execution_status<S: ScheduleStore>(
    store: &mut S,
    caller: &Pubkey,
    id: ScheduleId,
    status: ExecutionStatus,
    period: u64,
) -> Result<()> {
    require_keys_eq!(*caller, store.owner(), VestingError::Unauthorized);
    mark_execution(store, id, status, period)?;
    emit!(ExecutionStatusReported {
        schedule_id: id,
        status,
        period,
    });
    Ok(())
}

pub fn clear_failure<S: ScheduleStore>(store: &mut S, caller: &Pubkey, id: ScheduleId) -> Result<()> {
    require_keys_eq!(*caller, store.owner(), VestingError::Unauthorized);
    let mut flags = store.load_flags(id);
    flags.last_execution_status = ExecutionStatus::Unknown;
    flags.last_failed_period = None;
    store.save_flags(id, &flags)?;
    emit!(FailureCleared { schedule_id: id });
    Ok(())
}

pub fn mark_execution<S: ScheduleStore>(
    store: &mut S,
    id: ScheduleId,
    status: ExecutionStatus,
    period: u64,
) -> Result<()> {
    let mut flags = store.load_flags(id);
    flags.last_execution_status = status;
    if status == ExecutionStatus::Failed {
        flags.last_failed_period = Some(period);
    }
    store.save_flags(id, &flags)
}
