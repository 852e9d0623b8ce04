use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::{
    BASE_CALL_FEE, GAS_PER_LAMPORT, MAX_CALL_PAYLOAD, MAX_PENDING_CALLS, PAYLOAD_BYTE_FEE,
    QUEUE_BUCKET_PERIODS, SLOT_GAS_CAPACITY, THREADS_PER_PERIOD,
};
use crate::error::VestingError;

/// Opaque identifier of a registered deferred call: the queue bucket it
/// lives in (LE) followed by a BLAKE3 tag.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallId(pub [u8; 16]);

impl CallId {
    pub const SIZE: usize = 16;

    /// Bucket prefix plus BLAKE3 over the shard sequence number and the booked slot.
    pub fn derive(sequence: u64, slot: Slot, entry: EntryPoint) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"autovest:deferred-call");
        hasher.update(&sequence.to_le_bytes());
        hasher.update(&slot.period.to_le_bytes());
        hasher.update(&[slot.thread, entry as u8]);
        let mut id = [0u8; 16];
        id[..8].copy_from_slice(&CallQueue::bucket_of(slot.period).to_le_bytes());
        id[8..].copy_from_slice(&hasher.finalize().as_bytes()[..8]);
        Self(id)
    }

    /// Queue bucket holding this call.
    pub fn bucket(&self) -> u64 {
        let mut bucket = [0u8; 8];
        bucket.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(bucket)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("D")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// A (period, thread) execution position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub period: u64,
    pub thread: u8,
}

impl Slot {
    pub const SIZE: usize = 8 + 1;
}

/// Entry points a deferred call may target.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EntryPoint {
    ReleaseVestedTokens,
    Housekeeping,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeferredCall {
    pub id: CallId,
    pub slot: Slot,
    pub entry: EntryPoint,
    pub payload: Vec<u8>,
    pub max_gas: u64,
    /// Lamports escrowed at registration.
    pub fee: u64,
}

impl DeferredCall {
    pub const SIZE: usize =
        CallId::SIZE +         // id
        Slot::SIZE +           // slot
        1 +                    // entry
        4 + MAX_CALL_PAYLOAD + // payload
        8 +                    // max_gas
        8;                     // fee
}

/// One shard of the deferred-call queue: the calls booked into periods
/// `[bucket * QUEUE_BUCKET_PERIODS, (bucket + 1) * QUEUE_BUCKET_PERIODS)`
/// plus the slot market over them.
/// Seeds: [b"call_queue", bucket.to_le_bytes()]
#[account]
#[derive(Debug)]
pub struct CallQueue {
    pub bucket: u64,
    /// Registrations so far; feeds call-id derivation.
    pub sequence: u64,
    pub calls: Vec<DeferredCall>,
    /// PDA bump seed
    pub bump: u8,
}

impl CallQueue {
    pub const SIZE: usize =
        8 +                                        // bucket
        8 +                                        // sequence
        4 + DeferredCall::SIZE * MAX_PENDING_CALLS + // calls
        1;                                         // bump

    pub fn empty(bucket: u64) -> Self {
        Self {
            bucket,
            sequence: 0,
            calls: Vec::new(),
            bump: 0,
        }
    }

    pub fn bucket_of(period: u64) -> u64 {
        period / QUEUE_BUCKET_PERIODS
    }

    pub fn booked_gas(&self, slot: Slot) -> u64 {
        self.calls
            .iter()
            .filter(|c| c.slot == slot)
            .fold(0u64, |acc, c| acc.saturating_add(c.max_gas))
    }

    /// Fee of booking `max_gas` into `slot`, or `None` if the slot lacks
    /// capacity or the shard is full. The gas price rises linearly with the
    /// gas already booked in the slot.
    pub fn quote(&self, slot: Slot, max_gas: u64, payload_len: u64) -> Option<u64> {
        if self.calls.len() >= MAX_PENDING_CALLS {
            return None;
        }
        let booked = self.booked_gas(slot);
        if booked.checked_add(max_gas)? > SLOT_GAS_CAPACITY {
            return None;
        }
        let gas_fee = (max_gas as u128)
            .checked_mul(SLOT_GAS_CAPACITY as u128 + booked as u128)?
            / (SLOT_GAS_CAPACITY as u128 * GAS_PER_LAMPORT as u128);
        u64::try_from(gas_fee)
            .ok()?
            .checked_add(BASE_CALL_FEE)?
            .checked_add(payload_len.checked_mul(PAYLOAD_BYTE_FEE)?)
    }

    /// Books a call into `slot` and returns it (fee included).
    pub fn book(
        &mut self,
        slot: Slot,
        entry: EntryPoint,
        payload: Vec<u8>,
        max_gas: u64,
        now: u64,
    ) -> Result<DeferredCall> {
        require!(slot.period >= now, VestingError::SlotInPast);
        require!(
            Self::bucket_of(slot.period) == self.bucket,
            VestingError::InvalidQueueShard
        );
        require!(slot.thread < THREADS_PER_PERIOD, VestingError::NoSlotAvailable);
        require!(payload.len() <= MAX_CALL_PAYLOAD, VestingError::PayloadTooLarge);
        require!(self.calls.len() < MAX_PENDING_CALLS, VestingError::CallQueueFull);
        let fee = self
            .quote(slot, max_gas, payload.len() as u64)
            .ok_or(VestingError::NoSlotAvailable)?;

        let id = CallId::derive(self.sequence, slot, entry);
        self.sequence = self
            .sequence
            .checked_add(1)
            .ok_or(VestingError::MathOverflow)?;

        let call = DeferredCall {
            id,
            slot,
            entry,
            payload,
            max_gas,
            fee,
        };
        self.calls.push(call.clone());
        Ok(call)
    }

    pub fn get(&self, id: &CallId) -> Option<&DeferredCall> {
        self.calls.iter().find(|c| c.id == *id)
    }

    pub fn cancel(&mut self, id: &CallId) -> Result<DeferredCall> {
        let pos = self
            .calls
            .iter()
            .position(|c| c.id == *id)
            .ok_or(VestingError::CallNotFound)?;
        Ok(self.calls.remove(pos))
    }

    /// Removes a call whose slot has been reached.
    pub fn take_due(&mut self, id: &CallId, now: u64) -> Result<DeferredCall> {
        let call = self.get(id).ok_or(VestingError::CallNotFound)?;
        require!(call.slot.period <= now, VestingError::CallNotDue);
        self.cancel(id)
    }

    /// Earliest due call in (period, thread, registration) order.
    pub fn next_due(&self, now: u64) -> Option<&DeferredCall> {
        // `calls` is append-only apart from removals, so the first minimum
        // by slot is also the earliest registration for that slot.
        self.calls
            .iter()
            .filter(|c| c.slot.period <= now)
            .min_by_key(|c| c.slot)
    }
}

/// Cheapest slot in `[start, end]` under `quote`; ties go to the earliest
/// slot. `quote` yields `None` for slots that cannot take the call.
pub fn cheapest_slot<F>(start: u64, end: u64, mut quote: F) -> Result<Slot>
where
    F: FnMut(Slot) -> Result<Option<u64>>,
{
    require!(start <= end, VestingError::NoSlotAvailable);
    let mut best: Option<(u64, Slot)> = None;
    for period in start..=end {
        for thread in 0..THREADS_PER_PERIOD {
            let slot = Slot { period, thread };
            let Some(fee) = quote(slot)? else {
                continue;
            };
            if best.map_or(true, |(best_fee, _)| fee < best_fee) {
                best = Some((fee, slot));
            }
        }
    }
    best.map(|(_, slot)| slot)
        .ok_or_else(|| error!(VestingError::NoSlotAvailable))
}
