use anchor_lang::prelude::*;

use crate::adapters::AccountStore;
use crate::constants::{CONFIG_SEED, VESTING_SEED};
use crate::engine::admin;
use crate::state::{EngineConfig, ExecutionStatus, VestingSlot};

/// Operator report of how the last deferred execution of `schedule_id`
/// went. `Failed` halts further releases until `clear_failure`.
pub fn report_execution_status(
    ctx: Context<ReportExecutionStatus>,
    schedule_id: u64,
    status: ExecutionStatus,
    period: u64,
) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let accounts = &mut *ctx.accounts;
    let mut store = AccountStore::new(&mut accounts.config, Some(&mut *accounts.vesting_slot));
    admin::report_execution_status(&mut store, &owner, schedule_id, status, period)
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct ReportExecutionStatus<'info> {
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
