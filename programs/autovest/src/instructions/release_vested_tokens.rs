use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::adapters::{AccountStore, QueueScheduler, SplLedger};
use crate::constants::{CONFIG_SEED, VAULT_SEED, VESTING_SEED};
use crate::dispatch::ReleaseArgs;
use crate::engine::{Engine, ReleaseOutcome};
use crate::error::VestingError;
use crate::state::{EngineConfig, VestingSlot};

/// Direct release. Anyone may call it; every business condition that is
/// not met turns it into a logged no-op.
///
/// Remaining accounts: the shard of the schedule's pending call and the
/// shards covering the next booking window.
pub fn release_vested_tokens<'info>(
    ctx: Context<'_, '_, 'info, 'info, ReleaseVestedTokens<'info>>,
    schedule_id: u64,
    beneficiary: Pubkey,
) -> Result<()> {
    let now = Clock::get()?.slot;
    let accounts = &mut *ctx.accounts;
    let mut calls = QueueScheduler::load(
        ctx.remaining_accounts,
        accounts.config.to_account_info(),
        now,
    )?;
    run_release(
        ReleaseAccounts {
            config: &mut accounts.config,
            vesting_slot: &mut accounts.vesting_slot,
            vault: &mut accounts.vault,
            beneficiary_token_account: &mut accounts.beneficiary_token_account,
            token_program: accounts.token_program.to_account_info(),
        },
        &mut calls,
        &ReleaseArgs {
            schedule_id,
            beneficiary,
        },
        now,
    )?;
    calls.persist()
}

/// Accounts one release pass touches, however it was invoked.
pub(crate) struct ReleaseAccounts<'a, 'info> {
    pub config: &'a mut Account<'info, EngineConfig>,
    pub vesting_slot: &'a mut Account<'info, VestingSlot>,
    pub vault: &'a mut Account<'info, TokenAccount>,
    pub beneficiary_token_account: &'a mut Account<'info, TokenAccount>,
    pub token_program: AccountInfo<'info>,
}

pub(crate) fn run_release<'info>(
    accounts: ReleaseAccounts<'_, 'info>,
    calls: &mut QueueScheduler<'info>,
    args: &ReleaseArgs,
    now: u64,
) -> Result<ReleaseOutcome> {
    let ReleaseAccounts {
        config,
        vesting_slot,
        vault,
        beneficiary_token_account,
        token_program,
    } = accounts;

    check_payout_account(beneficiary_token_account, &args.beneficiary, &vault.mint)?;

    let config_bump = config.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[CONFIG_SEED, &[config_bump]]];
    let config_info = config.to_account_info();
    let contract = config_info.key();

    let mut ledger = SplLedger::new(
        token_program,
        config_info,
        signer_seeds,
        vault,
        beneficiary_token_account,
    );
    let mut store = AccountStore::new(config, Some(&mut **vesting_slot));

    Engine::new(&mut store, calls, contract, now).release_vested_tokens(&mut ledger, args)
}

/// The payout account must belong to the beneficiary and hold the vault's mint.
pub(crate) fn check_payout_account(account: &TokenAccount, beneficiary: &Pubkey, mint: &Pubkey) -> Result<()> {
    require_keys_eq!(account.owner, *beneficiary, VestingError::InvalidTokenAccount);
    require_keys_eq!(account.mint, *mint, VestingError::InvalidTokenMint);
    Ok(())
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct ReleaseVestedTokens<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    #[account(
        mut,
        seeds = [VESTING_SEED, schedule_id.to_le_bytes().as_ref()],
        bump = vesting_slot.bump
    )]
    pub vesting_slot: Account<'info, VestingSlot>,

    #[account(mut, seeds = [VAULT_SEED, vault.mint.as_ref()], bump)]
    pub vault: Account<'info, TokenAccount>,

    /// Checked by `check_payout_account`.
    #[account(mut)]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
