//! In-memory reference host.
//!
//! Provides what the chain provides to the program: a transactional
//! boundary (each operation runs against a staged copy of the world that is
//! only committed on success), a token ledger, and a deferred-call run loop
//! that fires calls in slot order.

use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;

use crate::dispatch::{dispatch, Operation, Response};
use crate::engine::{admin, DeferredCalls, Engine, ScheduleStore, TokenLedger};
use crate::error::VestingError;
use crate::events::DeferredCallExecuted;
use crate::state::{
    cheapest_slot, CallId, CallQueue, ControlFlags, DeferredCall, EntryPoint, ExecutionStatus,
    Lookup, ScheduleId, Slot, StoreMode, VestingSchedule,
};

#[derive(Clone, Debug)]
pub struct MemoryStore {
    pub owner: Pubkey,
    pub paused: bool,
    pub mode: StoreMode,
    pub schedule_count: u64,
    /// Raw schedule bytes, as a key/value store would hold them.
    pub records: BTreeMap<ScheduleId, Vec<u8>>,
    pub flags: BTreeMap<ScheduleId, ControlFlags>,
    pub housekeeping_call: Option<CallId>,
    pub last_heartbeat: u64,
}

impl MemoryStore {
    pub fn new(owner: Pubkey, mode: StoreMode) -> Self {
        Self {
            owner,
            paused: false,
            mode,
            schedule_count: 0,
            records: BTreeMap::new(),
            flags: BTreeMap::new(),
            housekeeping_call: None,
            last_heartbeat: 0,
        }
    }
}

impl ScheduleStore for MemoryStore {
    fn owner(&self) -> Pubkey {
        self.owner
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.paused = paused;
        Ok(())
    }

    fn store_mode(&self) -> StoreMode {
        self.mode
    }

    fn allocate_schedule_id(&mut self) -> Result<ScheduleId> {
        let id = match self.mode {
            StoreMode::SingleSlot => crate::constants::SINGLE_SLOT_ID,
            StoreMode::Keyed => self.schedule_count,
        };
        self.schedule_count = self
            .schedule_count
            .checked_add(1)
            .ok_or(VestingError::MathOverflow)?;
        Ok(id)
    }

    fn load_schedule(&self, id: ScheduleId) -> Lookup<VestingSchedule> {
        match self.records.get(&id) {
            Some(bytes) => VestingSchedule::lookup(bytes),
            None => Lookup::Empty,
        }
    }

    fn save_schedule(&mut self, id: ScheduleId, schedule: &VestingSchedule) -> Result<()> {
        self.records.insert(id, schedule.encode()?);
        Ok(())
    }

    fn load_flags(&self, id: ScheduleId) -> ControlFlags {
        self.flags.get(&id).copied().unwrap_or_default()
    }

    fn save_flags(&mut self, id: ScheduleId, flags: &ControlFlags) -> Result<()> {
        self.flags.insert(id, *flags);
        Ok(())
    }

    fn housekeeping_call(&self) -> Option<CallId> {
        self.housekeeping_call
    }

    fn set_housekeeping_call(&mut self, call: Option<CallId>) -> Result<()> {
        self.housekeeping_call = call;
        Ok(())
    }

    fn record_heartbeat(&mut self, period: u64) -> Result<()> {
        self.last_heartbeat = period;
        Ok(())
    }
}

/// Minimal fungible ledger keyed by (token, holder).
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<(Pubkey, Pubkey), u64>,
    allowances: BTreeMap<(Pubkey, Pubkey, Pubkey), u64>,
    /// Holders whose incoming transfers are debited but never credited.
    withheld: BTreeSet<Pubkey>,
}

impl MemoryLedger {
    pub fn mint(&mut self, token: Pubkey, holder: Pubkey, amount: u64) {
        *self.balances.entry((token, holder)).or_default() += amount;
    }

    pub fn approve(&mut self, token: Pubkey, owner: Pubkey, spender: Pubkey, amount: u64) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn balance(&self, token: &Pubkey, holder: &Pubkey) -> u64 {
        self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
    }

    /// Simulates a misbehaving token that swallows transfers to `holder`.
    pub fn withhold_credits_to(&mut self, holder: Pubkey) {
        self.withheld.insert(holder);
    }

    pub fn restore_credits_to(&mut self, holder: &Pubkey) {
        self.withheld.remove(holder);
    }

    fn move_tokens(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let source = self.balances.entry((*token, *from)).or_default();
        *source = source
            .checked_sub(amount)
            .ok_or(VestingError::InsufficientBalance)?;
        if !self.withheld.contains(to) {
            let dest = self.balances.entry((*token, *to)).or_default();
            *dest = dest.checked_add(amount).ok_or(VestingError::MathOverflow)?;
        }
        Ok(())
    }
}

impl TokenLedger for MemoryLedger {
    fn allowance(&mut self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> Result<u64> {
        Ok(self
            .allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0))
    }

    fn balance_of(&mut self, token: &Pubkey, holder: &Pubkey) -> Result<u64> {
        Ok(self.balance(token, holder))
    }

    fn transfer(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        self.move_tokens(token, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        let key = (*token, *from, *spender);
        let allowed = self.allowances.get(&key).copied().unwrap_or(0);
        let left = allowed
            .checked_sub(amount)
            .ok_or(VestingError::InsufficientAllowance)?;
        self.allowances.insert(key, left);
        self.move_tokens(token, from, to, amount)
    }
}

/// Deferred-call market backed by the same `CallQueue` shards the program
/// stores on-chain, with fees drawn from a lamport budget. Shards are
/// opened on first use.
#[derive(Clone, Debug)]
pub struct MemoryScheduler {
    pub shards: BTreeMap<u64, CallQueue>,
    now: u64,
    pub fee_balance: u64,
    /// Fees handed to executors of fired calls.
    pub fees_paid: u64,
}

impl MemoryScheduler {
    pub fn new(fee_balance: u64) -> Self {
        Self {
            shards: BTreeMap::new(),
            now: 0,
            fee_balance,
            fees_paid: 0,
        }
    }

    pub fn calls(&self) -> impl Iterator<Item = &DeferredCall> {
        self.shards.values().flat_map(|shard| shard.calls.iter())
    }

    /// Earliest due call across all shards.
    pub fn next_due(&self, now: u64) -> Option<&DeferredCall> {
        self.shards
            .values()
            .filter_map(|shard| shard.next_due(now))
            .min_by_key(|call| call.slot)
    }

    fn take(&mut self, id: &CallId) -> Result<DeferredCall> {
        self.shards
            .get_mut(&id.bucket())
            .ok_or(VestingError::CallNotFound)?
            .cancel(id)
    }
}

impl DeferredCalls for MemoryScheduler {
    fn find_cheapest_slot(&self, start: u64, end: u64, max_gas: u64, payload_len: u64) -> Result<Slot> {
        cheapest_slot(start, end, |slot| {
            let bucket = CallQueue::bucket_of(slot.period);
            Ok(match self.shards.get(&bucket) {
                Some(shard) => shard.quote(slot, max_gas, payload_len),
                None => CallQueue::empty(bucket).quote(slot, max_gas, payload_len),
            })
        })
    }

    fn register(&mut self, slot: Slot, entry: EntryPoint, payload: Vec<u8>, max_gas: u64) -> Result<CallId> {
        let bucket = CallQueue::bucket_of(slot.period);
        let call = self
            .shards
            .entry(bucket)
            .or_insert_with(|| CallQueue::empty(bucket))
            .book(slot, entry, payload, max_gas, self.now)?;
        self.fee_balance = self
            .fee_balance
            .checked_sub(call.fee)
            .ok_or(VestingError::InsufficientFeeBalance)?;
        Ok(call.id)
    }

    fn cancel(&mut self, id: &CallId) -> Result<()> {
        let call = self.take(id)?;
        self.fee_balance = self
            .fee_balance
            .checked_add(call.fee)
            .ok_or(VestingError::MathOverflow)?;
        Ok(())
    }

    fn pending_slot(&self, id: &CallId) -> Result<Option<Slot>> {
        Ok(self
            .shards
            .get(&id.bucket())
            .and_then(|shard| shard.get(id))
            .map(|call| call.slot))
    }
}

/// Everything an invocation may mutate.
#[derive(Clone, Debug)]
pub struct World {
    pub now: u64,
    pub contract: Pubkey,
    pub store: MemoryStore,
    pub ledger: MemoryLedger,
    pub calls: MemoryScheduler,
}

impl World {
    fn apply(&mut self, caller: &Pubkey, op: Operation) -> Result<Response> {
        self.calls.now = self.now;
        dispatch(
            &mut self.store,
            &mut self.ledger,
            &mut self.calls,
            self.contract,
            self.now,
            caller,
            op,
        )
    }
}

/// Result of one fired deferred call.
#[derive(Debug)]
pub struct Execution {
    pub call_id: CallId,
    pub slot: Slot,
    pub entry: EntryPoint,
    pub result: Result<Response>,
}

pub struct MemoryHost {
    world: World,
}

impl MemoryHost {
    /// Runs the constructor: records `owner` and books the housekeeping call.
    pub fn new(
        owner: Pubkey,
        mode: StoreMode,
        housekeeping_period: u64,
        fee_balance: u64,
    ) -> Result<Self> {
        let mut world = World {
            now: 0,
            contract: Pubkey::new_unique(),
            store: MemoryStore::new(owner, mode),
            ledger: MemoryLedger::default(),
            calls: MemoryScheduler::new(fee_balance),
        };
        let contract = world.contract;
        Engine::new(&mut world.store, &mut world.calls, contract, 0)
            .register_housekeeping(housekeeping_period)?;
        Ok(Self { world })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for setting up ledgers and injecting faults.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn now(&self) -> u64 {
        self.world.now
    }

    pub fn contract(&self) -> Pubkey {
        self.world.contract
    }

    pub fn schedule(&self, id: ScheduleId) -> Lookup<VestingSchedule> {
        self.world.store.load_schedule(id)
    }

    pub fn flags(&self, id: ScheduleId) -> ControlFlags {
        self.world.store.load_flags(id)
    }

    pub fn pending_calls(&self) -> usize {
        self.world.calls.calls().count()
    }

    /// Executes `op` atomically: on error nothing it wrote survives.
    pub fn execute(&mut self, caller: &Pubkey, op: Operation) -> Result<Response> {
        let mut staged = self.world.clone();
        let response = staged.apply(caller, op)?;
        self.world = staged;
        Ok(response)
    }

    /// Advances time to `target`, firing every due deferred call in slot
    /// order. A fired call is consumed whether or not it succeeds; a failed
    /// release marks its schedule `Failed`.
    pub fn advance_to(&mut self, target: u64) -> Vec<Execution> {
        let mut executions = Vec::new();
        while let Some(call) = self.world.calls.next_due(target).cloned() {
            self.world.now = self.world.now.max(call.slot.period);
            if self.world.calls.take(&call.id).is_err() {
                break;
            }
            self.world.calls.fees_paid = self.world.calls.fees_paid.saturating_add(call.fee);
            let contract = self.world.contract;
            emit!(DeferredCallExecuted {
                call_id: call.id,
                entry: call.entry,
                keeper: contract,
                fee: call.fee,
            });

            let result = Operation::from_deferred(call.entry, &call.payload)
                .and_then(|op| self.execute(&contract, op));
            if result.is_err() {
                self.report_failure(&call.entry, &call.payload);
            }
            executions.push(Execution {
                call_id: call.id,
                slot: call.slot,
                entry: call.entry,
                result,
            });
        }
        self.world.now = self.world.now.max(target);
        executions
    }

    fn report_failure(&mut self, entry: &EntryPoint, payload: &[u8]) {
        if let Ok(Operation::ReleaseVestedTokens(args)) = Operation::from_deferred(*entry, payload) {
            let now = self.world.now;
            if admin::mark_execution(&mut self.world.store, args.schedule_id, ExecutionStatus::Failed, now)
                .is_err()
            {
                msg!("failed to record execution failure of schedule {}", args.schedule_id);
            }
        }
    }
}
