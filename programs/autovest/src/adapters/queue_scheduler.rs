use anchor_lang::prelude::*;

use crate::constants::CALL_QUEUE_SEED;
use crate::engine::DeferredCalls;
use crate::error::VestingError;
use crate::state::{cheapest_slot, CallId, CallQueue, DeferredCall, EntryPoint, Slot};

/// `DeferredCalls` over the queue shards passed as remaining accounts.
/// Fees are escrowed by moving lamports from the config PDA into the shard
/// holding the call and back on cancellation.
///
/// Every bucket the instruction touches must be supplied: the bucket of a
/// call being cancelled or consumed and every bucket of a booking window.
pub struct QueueScheduler<'info> {
    shards: Vec<Account<'info, CallQueue>>,
    fee_source: AccountInfo<'info>,
    now: u64,
}

impl<'info> QueueScheduler<'info> {
    /// Deserializes and checks the shard accounts: each must be a `CallQueue`
    /// at the PDA of its own bucket, and no bucket may repeat.
    pub fn load(
        infos: &'info [AccountInfo<'info>],
        fee_source: AccountInfo<'info>,
        now: u64,
    ) -> Result<Self> {
        let mut shards: Vec<Account<'info, CallQueue>> = Vec::with_capacity(infos.len());
        for info in infos {
            let shard: Account<'info, CallQueue> = Account::try_from(info)?;
            let address = Pubkey::create_program_address(
                &[CALL_QUEUE_SEED, &shard.bucket.to_le_bytes(), &[shard.bump]],
                &crate::ID,
            )
            .map_err(|_| error!(VestingError::InvalidQueueShard))?;
            require_keys_eq!(info.key(), address, VestingError::InvalidQueueShard);
            require!(
                shards.iter().all(|s| s.bucket != shard.bucket),
                VestingError::InvalidQueueShard
            );
            shards.push(shard);
        }
        Ok(Self {
            shards,
            fee_source,
            now,
        })
    }

    fn shard(&self, bucket: u64) -> Result<&Account<'info, CallQueue>> {
        self.shards
            .iter()
            .find(|s| s.bucket == bucket)
            .ok_or_else(|| error!(VestingError::MissingAccount))
    }

    /// Writable shard of `bucket`.
    fn shard_mut(&mut self, bucket: u64) -> Result<&mut Account<'info, CallQueue>> {
        let shard = self
            .shards
            .iter_mut()
            .find(|s| s.bucket == bucket)
            .ok_or_else(|| error!(VestingError::MissingAccount))?;
        require!(shard.to_account_info().is_writable, VestingError::InvalidQueueShard);
        Ok(shard)
    }

    /// Removes a due call and pays its escrowed fee to `keeper`.
    pub fn take_due(&mut self, id: &CallId, keeper: &AccountInfo<'info>) -> Result<DeferredCall> {
        let now = self.now;
        let shard = self.shard_mut(id.bucket())?;
        let call = shard.take_due(id, now)?;
        move_lamports(&shard.to_account_info(), keeper, call.fee)?;
        Ok(call)
    }

    /// Writes every shard back to its account. Remaining accounts are not
    /// persisted by Anchor, so handlers call this before returning.
    pub fn persist(&self) -> Result<()> {
        for shard in self.shards.iter().filter(|s| s.to_account_info().is_writable) {
            shard.exit(&crate::ID)?;
        }
        Ok(())
    }
}

/// Moves `amount` lamports between two program-owned accounts, keeping
/// `from` rent exempt.
pub fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    let floor = Rent::get()?.minimum_balance(from.data_len());
    transfer_lamports(from, to, amount, floor)
}

/// Moves `amount` lamports unless that would leave `from` below `floor`.
pub fn transfer_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64, floor: u64) -> Result<()> {
    let available = from.lamports().saturating_sub(floor);
    require!(available >= amount, VestingError::InsufficientFeeBalance);

    **from.try_borrow_mut_lamports()? -= amount;
    let mut to_lamports = to.try_borrow_mut_lamports()?;
    **to_lamports = (**to_lamports)
        .checked_add(amount)
        .ok_or(VestingError::MathOverflow)?;
    Ok(())
}

impl DeferredCalls for QueueScheduler<'_> {
    fn find_cheapest_slot(&self, start: u64, end: u64, max_gas: u64, payload_len: u64) -> Result<Slot> {
        cheapest_slot(start, end, |slot| {
            Ok(self
                .shard(CallQueue::bucket_of(slot.period))?
                .quote(slot, max_gas, payload_len))
        })
    }

    fn register(&mut self, slot: Slot, entry: EntryPoint, payload: Vec<u8>, max_gas: u64) -> Result<CallId> {
        let now = self.now;
        let fee_source = self.fee_source.clone();
        let shard = self.shard_mut(CallQueue::bucket_of(slot.period))?;
        let call = shard.book(slot, entry, payload, max_gas, now)?;
        move_lamports(&fee_source, &shard.to_account_info(), call.fee)?;
        Ok(call.id)
    }

    fn cancel(&mut self, id: &CallId) -> Result<()> {
        let fee_source = self.fee_source.clone();
        let shard = self.shard_mut(id.bucket())?;
        let call = shard.cancel(id)?;
        move_lamports(&shard.to_account_info(), &fee_source, call.fee)
    }

    fn pending_slot(&self, id: &CallId) -> Result<Option<Slot>> {
        Ok(self.shard(id.bucket())?.get(id).map(|c| c.slot))
    }
}
