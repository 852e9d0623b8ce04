use anchor_lang::prelude::*;

use crate::engine::SkipReason;
use crate::state::{CallId, EntryPoint, ExecutionStatus};

#[event]
pub struct EngineInitialized {
    pub owner: Pubkey,
    pub housekeeping_period: u64,
}

#[event]
pub struct ScheduleCreated {
    pub schedule_id: u64,
    pub beneficiary: Pubkey,
    pub token: Pubkey,
    pub total_amount: u64,
    pub release_percentage: u8,
    pub release_interval: u64,
    pub next_release_period: u64,
    pub call_id: CallId,
}

#[event]
pub struct TokensReleased {
    pub schedule_id: u64,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub amount_claimed: u64,
    pub total_amount: u64,
    pub next_release_period: u64,
    pub completed: bool,
}

#[event]
pub struct ReleaseSkipped {
    pub schedule_id: u64,
    pub reason: SkipReason,
    pub period: u64,
}

#[event]
pub struct DeferredCallRegistered {
    pub call_id: CallId,
    pub entry: EntryPoint,
    pub period: u64,
    pub thread: u8,
}

#[event]
pub struct DeferredCallCancelled {
    pub call_id: CallId,
}

#[event]
pub struct DeferredCallExecuted {
    pub call_id: CallId,
    pub entry: EntryPoint,
    pub keeper: Pubkey,
    pub fee: u64,
}

#[event]
pub struct EnginePaused {
    pub owner: Pubkey,
}

#[event]
pub struct EngineUnpaused {
    pub owner: Pubkey,
}

#[event]
pub struct ExecutionStatusReported {
    pub schedule_id: u64,
    pub status: ExecutionStatus,
    pub period: u64,
}

#[event]
pub struct FailureCleared {
    pub schedule_id: u64,
}

#[event]
pub struct ScheduleNudged {
    pub schedule_id: u64,
    pub call_id: CallId,
    pub next_release_period: u64,
}

#[event]
pub struct Heartbeat {
    pub period: u64,
    pub paused: bool,
}

#[event]
pub struct FeesFunded {
    pub payer: Pubkey,
    pub amount: u64,
}

#[event]
pub struct CallQueueOpened {
    pub bucket: u64,
    pub payer: Pubkey,
}
