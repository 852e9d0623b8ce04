//! Collaborator seams of the release engine.
//!
//! The engine never touches accounts, CPIs or clocks directly; each host
//! (the Anchor program, the in-memory host) supplies these.

use anchor_lang::prelude::*;

use crate::state::{CallId, ControlFlags, EntryPoint, Lookup, ScheduleId, Slot, StoreMode, VestingSchedule};

/// Persistent schedule records plus engine-level values.
pub trait ScheduleStore {
    fn owner(&self) -> Pubkey;
    fn is_paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool) -> Result<()>;
    fn store_mode(&self) -> StoreMode;

    /// Id the next creation is stored under; advances the schedule counter.
    fn allocate_schedule_id(&mut self) -> Result<ScheduleId>;

    fn load_schedule(&self, id: ScheduleId) -> Lookup<VestingSchedule>;
    fn save_schedule(&mut self, id: ScheduleId, schedule: &VestingSchedule) -> Result<()>;

    /// Flags of `id`; defaults when nothing is stored.
    fn load_flags(&self, id: ScheduleId) -> ControlFlags;
    fn save_flags(&mut self, id: ScheduleId, flags: &ControlFlags) -> Result<()>;

    fn housekeeping_call(&self) -> Option<CallId>;
    fn set_housekeeping_call(&mut self, call: Option<CallId>) -> Result<()>;
    fn record_heartbeat(&mut self, period: u64) -> Result<()>;
}

/// Balance, allowance and transfer primitives of the token ledger.
pub trait TokenLedger {
    fn allowance(&mut self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> Result<u64>;

    /// Fresh balance read (never cached across a transfer).
    fn balance_of(&mut self, token: &Pubkey, holder: &Pubkey) -> Result<u64>;

    /// Moves tokens out of an account the engine controls.
    fn transfer(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()>;

    /// Moves tokens on behalf of `from`, consuming `spender`'s allowance.
    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<()>;
}

/// Slot market and deferred self-invocation primitive.
pub trait DeferredCalls {
    fn find_cheapest_slot(&self, start: u64, end: u64, max_gas: u64, payload_len: u64) -> Result<Slot>;

    /// Registers a call at `slot`, paying its fee.
    fn register(&mut self, slot: Slot, entry: EntryPoint, payload: Vec<u8>, max_gas: u64) -> Result<CallId>;

    /// Cancels a pending call, refunding its fee.
    fn cancel(&mut self, id: &CallId) -> Result<()>;

    /// Slot of a still-pending call. Errors when the host cannot see the
    /// queue shard the call would live in.
    fn pending_slot(&self, id: &CallId) -> Result<Option<Slot>>;
}
