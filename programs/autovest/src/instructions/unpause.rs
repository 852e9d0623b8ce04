use anchor_lang::prelude::*;

use crate::adapters::AccountStore;
use crate::constants::CONFIG_SEED;
use crate::engine::admin;
use crate::state::EngineConfig;

pub fn unpause(ctx: Context<Unpause>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let mut store = AccountStore::new(&mut ctx.accounts.config, None);
    admin::unpause(&mut store, &owner)
}

#[derive(Accounts)]
pub struct Unpause<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,
    pub owner: Signer<'info>,
}
