use anchor_lang::prelude::*;

use crate::adapters::AccountStore;
use crate::constants::CONFIG_SEED;
use crate::engine::admin;
use crate::state::EngineConfig;

pub fn pause(ctx: Context<Pause>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let mut store = AccountStore::new(&mut ctx.accounts.config, None);
    admin::pause(&mut store, &owner)
}

#[derive(Accounts)]
pub struct Pause<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,
    pub owner: Signer<'info>,
}
