use anchor_lang::prelude::*;

use crate::adapters::{AccountStore, QueueScheduler};
use crate::constants::{CONFIG_SEED, VESTING_SEED};
use crate::engine::Engine;
use crate::state::{EngineConfig, VestingSlot};

/// Returns the pending call id of `schedule_id` as return data. Aborts
/// when nothing is pending.
///
/// Remaining accounts: the queue shard of the recorded call.
pub fn get_next_call_id<'info>(
    ctx: Context<'_, '_, 'info, 'info, GetNextCallId<'info>>,
    schedule_id: u64,
) -> Result<String> {
    let now = Clock::get()?.slot;
    let config_info = ctx.accounts.config.to_account_info();
    let contract = config_info.key();

    let accounts = &mut *ctx.accounts;
    let mut store = AccountStore::new(&mut accounts.config, Some(&mut *accounts.vesting_slot));
    let mut calls = QueueScheduler::load(ctx.remaining_accounts, config_info, now)?;
    let call_id = Engine::new(&mut store, &mut calls, contract, now).next_call_id(schedule_id)?;
    Ok(call_id.to_string())
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct GetNextCallId<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    #[account(
        seeds = [VESTING_SEED, schedule_id.to_le_bytes().as_ref()],
        bump = vesting_slot.bump
    )]
    pub vesting_slot: Account<'info, VestingSlot>,
}
