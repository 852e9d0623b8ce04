use anchor_lang::prelude::*;

use crate::adapters::AccountStore;
use crate::constants::{CONFIG_SEED, VESTING_SEED};
use crate::engine::admin;
use crate::state::{EngineConfig, VestingSlot};

pub fn clear_failure(ctx: Context<ClearFailure>, schedule_id: u64) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let accounts = &mut *ctx.accounts;
    let mut store = AccountStore::new(&mut accounts.config, Some(&mut *accounts.vesting_slot));
    admin::clear_failure(&mut store, &owner, schedule_id)
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct ClearFailure<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    #[account(
        mut,
        seeds = [VESTING_SEED, schedule_id.to_le_bytes().as_ref()],
        bump = vesting_slot.bump
    )]
    pub vesting_slot: Account<'info, VestingSlot>,

    pub owner: Signer<'info>,
}
