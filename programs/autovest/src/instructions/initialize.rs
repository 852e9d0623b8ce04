use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::adapters::{AccountStore, QueueScheduler};
use crate::constants::{CONFIG_SEED, SINGLE_SLOT_ID, SINGLE_SLOT_ID_BYTES, VESTING_SEED};
use crate::engine::Engine;
use crate::events::{EngineInitialized, FeesFunded};
use crate::state::{ControlFlags, EngineConfig, StoreMode, VestingSlot};

/// Constructor: records the signer as owner, prepares the single-slot
/// record, optionally funds the fee escrow and books housekeeping.
///
/// Remaining accounts: with a non-zero `housekeeping_period`, the open
/// queue shards covering its booking window.
pub fn initialize<'info>(
    ctx: Context<'_, '_, 'info, 'info, Initialize<'info>>,
    housekeeping_period: u64,
    store_mode: StoreMode,
    fee_deposit: u64,
) -> Result<()> {
    let owner = ctx.accounts.owner.key();

    let config = &mut ctx.accounts.config;
    config.owner = owner;
    config.paused = false;
    config.store_mode = store_mode;
    config.schedule_count = 0;
    config.housekeeping_period = housekeeping_period;
    config.housekeeping_call = None;
    config.last_heartbeat = 0;
    config.bump = ctx.bumps.config;

    let slot = &mut ctx.accounts.single_slot;
    slot.schedule_id = SINGLE_SLOT_ID;
    slot.schedule_data = Vec::new();
    slot.flags = ControlFlags::default();
    slot.bump = ctx.bumps.single_slot;

    if fee_deposit > 0 {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.owner.to_account_info(),
                    to: ctx.accounts.config.to_account_info(),
                },
            ),
            fee_deposit,
        )?;
        emit!(FeesFunded {
            payer: owner,
            amount: fee_deposit,
        });
    }

    emit!(EngineInitialized {
        owner,
        housekeeping_period,
    });

    let now = Clock::get()?.slot;
    let config_info = ctx.accounts.config.to_account_info();
    let contract = config_info.key();
    let mut store = AccountStore::new(&mut ctx.accounts.config, None);
    let mut calls = QueueScheduler::load(ctx.remaining_accounts, config_info, now)?;
    if let Some(call_id) = Engine::new(&mut store, &mut calls, contract, now)
        .register_housekeeping(housekeeping_period)?
    {
        msg!("housekeeping booked: {}", call_id);
    }
    calls.persist()
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + EngineConfig::SIZE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, EngineConfig>,

    #[account(
        init,
        payer = owner,
        space = 8 + VestingSlot::SIZE,
        seeds = [VESTING_SEED, SINGLE_SLOT_ID_BYTES],
        bump
    )]
    pub single_slot: Account<'info, VestingSlot>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}
