use anchor_lang::prelude::*;

use crate::adapters::{AccountStore, QueueScheduler};
use crate::constants::{CONFIG_SEED, VESTING_SEED};
use crate::engine::Engine;
use crate::state::{EngineConfig, VestingSlot};

/// Cancels the pending release of `schedule_id`. The schedule itself is
/// left untouched and can be restarted with `nudge`.
///
/// Remaining accounts: the queue shard of the pending call.
pub fn stop<'info>(ctx: Context<'_, '_, 'info, 'info, Stop<'info>>, schedule_id: u64) -> Result<()> {
    let now = Clock::get()?.slot;
    let owner = ctx.accounts.owner.key();
    let config_info = ctx.accounts.config.to_account_info();
    let contract = config_info.key();

    let accounts = &mut *ctx.accounts;
    let mut store = AccountStore::new(&mut accounts.config, Some(&mut *accounts.vesting_slot));
    let mut calls = QueueScheduler::load(ctx.remaining_accounts, config_info, now)?;
    let cancelled = Engine::new(&mut store, &mut calls, contract, now).stop(&owner, schedule_id)?;
    calls.persist()?;
    msg!("schedule {} stopped, cancelled {}", schedule_id, cancelled);
    Ok(())
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct Stop<'info> {
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
