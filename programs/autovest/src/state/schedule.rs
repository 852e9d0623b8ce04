use anchor_lang::prelude::*;

use crate::constants::PERCENT_DENOMINATOR;
use crate::error::VestingError;

pub type ScheduleId = u64;

/// Result of reading a stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    Empty,
    Corrupt,
    Found(T),
}

/// Creation input (beneficiary, token, amount and release plan).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreateParams {
    pub beneficiary: Pubkey,
    pub token: Pubkey,
    pub total_amount: u64,
    pub lock_period: u64,
    pub release_interval: u64,
    pub release_percentage: u8,
}

/// The vesting record driven by the release engine.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingSchedule {
    /// Receives every payout.
    pub beneficiary: Pubkey,
    /// Mint of the escrowed token.
    pub token: Pubkey,
    pub total_amount: u64,
    /// Cumulative payouts; never exceeds `total_amount`.
    pub amount_claimed: u64,
    /// Delay before the first release (creation only).
    pub lock_period: u64,
    /// Periods between releases.
    pub release_interval: u64,
    /// Share of `total_amount` paid per release, in [1, 100].
    pub release_percentage: u8,
    /// Period of the next payout; frozen once completed.
    pub next_release_period: u64,
}

impl VestingSchedule {
    pub const SIZE: usize =
        32 + // beneficiary
        32 + // token
        8 +  // total_amount
        8 +  // amount_claimed
        8 +  // lock_period
        8 +  // release_interval
        1 +  // release_percentage
        8;   // next_release_period

    /// Validates `params` and builds a fresh schedule starting at `now + lock_period`.
    pub fn new(params: &CreateParams, now: u64) -> Result<Self> {
        require!(params.total_amount > 0, VestingError::InvalidTotalAmount);
        require!(params.release_interval > 0, VestingError::InvalidReleaseInterval);
        require!(
            (1..=100).contains(&params.release_percentage),
            VestingError::InvalidReleasePercentage
        );

        let start_period = now
            .checked_add(params.lock_period)
            .ok_or(VestingError::MathOverflow)?;

        let schedule = Self {
            beneficiary: params.beneficiary,
            token: params.token,
            total_amount: params.total_amount,
            amount_claimed: 0,
            lock_period: params.lock_period,
            release_interval: params.release_interval,
            release_percentage: params.release_percentage,
            next_release_period: start_period,
        };
        require!(
            schedule.per_release_amount()? > 0,
            VestingError::ReleaseAmountTooSmall
        );
        Ok(schedule)
    }

    /// floor(total_amount * release_percentage / 100)
    pub fn per_release_amount(&self) -> Result<u64> {
        let v = (self.total_amount as u128)
            .checked_mul(self.release_percentage as u128)
            .ok_or(VestingError::MathOverflow)?
            / PERCENT_DENOMINATOR as u128;
        Ok(u64::try_from(v).map_err(|_| VestingError::MathOverflow)?)
    }

    pub fn remaining(&self) -> u64 {
        self.total_amount.saturating_sub(self.amount_claimed)
    }

    /// Amount of the next payout, clamped to the remainder.
    pub fn next_release_amount(&self) -> Result<u64> {
        Ok(self.per_release_amount()?.min(self.remaining()))
    }

    pub fn is_completed(&self) -> bool {
        self.amount_claimed >= self.total_amount
    }

    pub fn record_release(&mut self, amount: u64) -> Result<()> {
        let claimed = self
            .amount_claimed
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        require!(claimed <= self.total_amount, VestingError::MathOverflow);
        self.amount_claimed = claimed;
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        self.serialize(&mut buf)
            .map_err(|_| error!(VestingError::MalformedPayload))?;
        Ok(buf)
    }

    /// Decodes a stored record; an empty buffer means "no schedule".
    pub fn lookup(data: &[u8]) -> Lookup<Self> {
        if data.is_empty() {
            return Lookup::Empty;
        }
        match Self::try_from_slice(data) {
            Ok(schedule) => Lookup::Found(schedule),
            Err(_) => Lookup::Corrupt,
        }
    }
}
