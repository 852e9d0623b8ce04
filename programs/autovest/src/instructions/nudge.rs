use anchor_lang::prelude::*;

use crate::adapters::{AccountStore, QueueScheduler};
use crate::constants::{CONFIG_SEED, VESTING_SEED};
use crate::engine::Engine;
use crate::state::{EngineConfig, VestingSlot};

/// Watchdog: re-books the release of a schedule whose deferred call was
/// stopped, dropped or missed.
///
/// Remaining accounts: the shard of the recorded call (if any) and the
/// shards covering the booking window.
pub fn nudge<'info>(ctx: Context<'_, '_, 'info, 'info, Nudge<'info>>, schedule_id: u64) -> Result<()> {
    let now = Clock::get()?.slot;
    let owner = ctx.accounts.owner.key();
    let config_info = ctx.accounts.config.to_account_info();
    let contract = config_info.key();

    let accounts = &mut *ctx.accounts;
    let mut store = AccountStore::new(&mut accounts.config, Some(&mut *accounts.vesting_slot));
    let mut calls = QueueScheduler::load(ctx.remaining_accounts, config_info, now)?;
    let outcome = Engine::new(&mut store, &mut calls, contract, now).nudge(&owner, schedule_id)?;
    calls.persist()?;
    msg!("nudge {}: {:?}", schedule_id, outcome);
    Ok(())
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct Nudge<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    #[account(
        mut,
        seeds = [VESTING_SEED, schedule_id.to_le_bytes().as_ref()],
        bump = vesting_slot.bump
    )]
    pub vesting_slot: Account<'info, VestingSlot>,

    pub owner: Signer<'info>,
}
