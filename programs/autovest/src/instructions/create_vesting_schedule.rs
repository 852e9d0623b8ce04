use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::adapters::{AccountStore, QueueScheduler, SplLedger};
use crate::constants::{CONFIG_SEED, VAULT_SEED, VESTING_SEED};
use crate::engine::Engine;
use crate::error::VestingError;
use crate::state::{CreateParams, EngineConfig, VestingSlot};

/// Escrows `total_amount` of `mint` from the funder (who must have
/// delegated at least that much to the config PDA) and books the first
/// release. A no-op while paused.
///
/// `schedule_id` must be the id the store mode allocates next; the slot
/// PDA is derived from it. Remaining accounts: the queue shards covering
/// the first booking window.
pub fn create_vesting_schedule<'info>(
    ctx: Context<'_, '_, 'info, 'info, CreateVestingSchedule<'info>>,
    schedule_id: u64,
    beneficiary: Pubkey,
    total_amount: u64,
    lock_period: u64,
    release_interval: u64,
    release_percentage: u8,
) -> Result<()> {
    let now = Clock::get()?.slot;
    let funder = ctx.accounts.funder.key();
    let params = CreateParams {
        beneficiary,
        token: ctx.accounts.mint.key(),
        total_amount,
        lock_period,
        release_interval,
        release_percentage,
    };

    let slot = &mut ctx.accounts.vesting_slot;
    slot.schedule_id = schedule_id;
    slot.bump = ctx.bumps.vesting_slot;

    let config_bump = ctx.accounts.config.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[CONFIG_SEED, &[config_bump]]];
    let config_info = ctx.accounts.config.to_account_info();
    let contract = config_info.key();

    let accounts = &mut *ctx.accounts;
    let mut ledger = SplLedger::new(
        accounts.token_program.to_account_info(),
        config_info.clone(),
        signer_seeds,
        &mut accounts.vault,
        &mut accounts.funder_token_account,
    );
    let mut store = AccountStore::new(&mut accounts.config, Some(&mut *accounts.vesting_slot));
    let mut calls = QueueScheduler::load(ctx.remaining_accounts, config_info, now)?;

    match Engine::new(&mut store, &mut calls, contract, now).create_vesting_schedule(
        &mut ledger,
        &funder,
        &params,
    )? {
        Some(id) => msg!("schedule {} created", id),
        None => msg!("schedule not created: engine paused"),
    }
    calls.persist()
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct CreateVestingSchedule<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    #[account(
        init_if_needed,
        payer = funder,
        space = 8 + VestingSlot::SIZE,
        seeds = [VESTING_SEED, schedule_id.to_le_bytes().as_ref()],
        bump
    )]
    pub vesting_slot: Account<'info, VestingSlot>,

    #[account(
        init_if_needed,
        payer = funder,
        token::mint = mint,
        token::authority = config,
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = funder_token_account.owner == funder.key() @ VestingError::InvalidTokenAccount,
        constraint = funder_token_account.mint == mint.key() @ VestingError::InvalidTokenMint,
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub funder: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
