use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::CONFIG_SEED;
use crate::events::FeesFunded;
use crate::state::EngineConfig;

/// Tops up the lamports deferred-call fees are paid from.
pub fn fund_fees(ctx: Context<FundFees>, amount: u64) -> Result<()> {
    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.payer.to_account_info(),
                to: ctx.accounts.config.to_account_info(),
            },
        ),
        amount,
    )?;
    emit!(FeesFunded {
        payer: ctx.accounts.payer.key(),
        amount,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct FundFees<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}
