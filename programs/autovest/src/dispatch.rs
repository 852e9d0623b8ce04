//! Tagged dispatch of engine entry points.
//!
//! Deferred calls carry an `EntryPoint` tag plus a Borsh payload;
//! `Operation::from_deferred` is the only place that turns them back into
//! an operation, and `dispatch` maps every operation to its handler.

use anchor_lang::prelude::*;

use crate::engine::{admin, DeferredCalls, Engine, NudgeOutcome, ReleaseOutcome, ScheduleStore, TokenLedger};
use crate::error::VestingError;
use crate::state::{CallId, CreateParams, EntryPoint, ExecutionStatus, ScheduleId};

/// Arguments of `release_vested_tokens`. The beneficiary is an expectation
/// checked against the stored schedule, not a selector.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseArgs {
    pub schedule_id: ScheduleId,
    pub beneficiary: Pubkey,
}

impl ReleaseArgs {
    pub const SIZE: usize = 8 + 32;

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        self.serialize(&mut buf)
            .map_err(|_| error!(VestingError::MalformedPayload))?;
        Ok(buf)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    CreateVestingSchedule(CreateParams),
    ReleaseVestedTokens(ReleaseArgs),
    Stop {
        schedule_id: ScheduleId,
    },
    GetNextCallId {
        schedule_id: ScheduleId,
    },
    Pause,
    Unpause,
    ReportExecutionStatus {
        schedule_id: ScheduleId,
        status: ExecutionStatus,
        period: u64,
    },
    ClearFailure {
        schedule_id: ScheduleId,
    },
    Nudge {
        schedule_id: ScheduleId,
    },
    Housekeeping,
}

impl Operation {
    /// Decodes the operation a deferred call was registered for.
    pub fn from_deferred(entry: EntryPoint, payload: &[u8]) -> Result<Self> {
        match entry {
            EntryPoint::ReleaseVestedTokens => ReleaseArgs::try_from_slice(payload)
                .map(Operation::ReleaseVestedTokens)
                .map_err(|_| error!(VestingError::MalformedPayload)),
            EntryPoint::Housekeeping => {
                require!(payload.is_empty(), VestingError::MalformedPayload);
                Ok(Operation::Housekeeping)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Created(Option<ScheduleId>),
    Release(ReleaseOutcome),
    Stopped(CallId),
    CallId(String),
    Nudge(NudgeOutcome),
    Done,
}

/// Runs `op` on behalf of `caller` against the given collaborators.
pub fn dispatch<S, L, D>(
    store: &mut S,
    ledger: &mut L,
    calls: &mut D,
    contract: Pubkey,
    now: u64,
    caller: &Pubkey,
    op: Operation,
) -> Result<Response>
where
    S: ScheduleStore,
    L: TokenLedger,
    D: DeferredCalls,
{
    let response = match op {
        Operation::CreateVestingSchedule(params) => Response::Created(
            Engine::new(store, calls, contract, now).create_vesting_schedule(ledger, caller, &params)?,
        ),
        Operation::ReleaseVestedTokens(args) => Response::Release(
            Engine::new(store, calls, contract, now).release_vested_tokens(ledger, &args)?,
        ),
        Operation::Stop { schedule_id } => {
            Response::Stopped(Engine::new(store, calls, contract, now).stop(caller, schedule_id)?)
        }
        Operation::GetNextCallId { schedule_id } => Response::CallId(
            Engine::new(store, calls, contract, now)
                .next_call_id(schedule_id)?
                .to_string(),
        ),
        Operation::Pause => {
            admin::pause(store, caller)?;
            Response::Done
        }
        Operation::Unpause => {
            admin::unpause(store, caller)?;
            Response::Done
        }
        Operation::ReportExecutionStatus {
            schedule_id,
            status,
            period,
        } => {
            admin::report_execution_status(store, caller, schedule_id, status, period)?;
            Response::Done
        }
        Operation::ClearFailure { schedule_id } => {
            admin::clear_failure(store, caller, schedule_id)?;
            Response::Done
        }
        Operation::Nudge { schedule_id } => {
            Response::Nudge(Engine::new(store, calls, contract, now).nudge(caller, schedule_id)?)
        }
        Operation::Housekeeping => {
            require_keys_eq!(*caller, contract, VestingError::Unauthorized);
            Engine::new(store, calls, contract, now).run_housekeeping()?;
            Response::Done
        }
    };
    Ok(response)
}
