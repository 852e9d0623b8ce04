use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::adapters::{AccountStore, QueueScheduler};
use crate::constants::{CONFIG_SEED, VAULT_SEED};
use crate::dispatch::Operation;
use crate::engine::Engine;
use crate::error::VestingError;
use crate::events::DeferredCallExecuted;
use crate::instructions::release_vested_tokens::{run_release, ReleaseAccounts};
use crate::state::{CallId, EngineConfig, VestingSlot};

/// Keeper crank: consumes a due deferred call, pays its escrowed fee to the
/// keeper and runs the entry point it was booked for.
///
/// If the entry point aborts the whole transaction (fee payout included)
/// reverts and the call stays queued.
///
/// Remaining accounts: the shard holding `call_id` and, for releases, the
/// shards covering the next booking window.
pub fn execute_deferred_call<'info>(
    ctx: Context<'_, '_, 'info, 'info, ExecuteDeferredCall<'info>>,
    call_id: CallId,
) -> Result<()> {
    let now = Clock::get()?.slot;
    let accounts = &mut *ctx.accounts;
    let config_info = accounts.config.to_account_info();
    let contract = config_info.key();
    let mut calls = QueueScheduler::load(ctx.remaining_accounts, config_info, now)?;

    let keeper = accounts.keeper.to_account_info();
    let call = calls.take_due(&call_id, &keeper)?;
    emit!(DeferredCallExecuted {
        call_id,
        entry: call.entry,
        keeper: keeper.key(),
        fee: call.fee,
    });

    match Operation::from_deferred(call.entry, &call.payload)? {
        Operation::ReleaseVestedTokens(args) => {
            let vesting_slot = accounts
                .vesting_slot
                .as_mut()
                .ok_or(VestingError::MissingAccount)?;
            require_keys_eq!(
                vesting_slot.key(),
                VestingSlot::address(args.schedule_id),
                VestingError::InvalidScheduleId
            );
            let vault = accounts.vault.as_mut().ok_or(VestingError::MissingAccount)?;
            let (vault_address, _) =
                Pubkey::find_program_address(&[VAULT_SEED, vault.mint.as_ref()], &crate::ID);
            require_keys_eq!(vault.key(), vault_address, VestingError::InvalidTokenAccount);
            let beneficiary_token_account = accounts
                .beneficiary_token_account
                .as_mut()
                .ok_or(VestingError::MissingAccount)?;
            let token_program = accounts
                .token_program
                .as_ref()
                .ok_or(VestingError::MissingAccount)?
                .to_account_info();

            let outcome = run_release(
                ReleaseAccounts {
                    config: &mut accounts.config,
                    vesting_slot,
                    vault,
                    beneficiary_token_account,
                    token_program,
                },
                &mut calls,
                &args,
                now,
            )?;
            msg!("deferred release {}: {:?}", args.schedule_id, outcome);
        }
        Operation::Housekeeping => {
            let mut store = AccountStore::new(&mut accounts.config, None);
            Engine::new(&mut store, &mut calls, contract, now).run_housekeeping()?;
        }
        _ => return err!(VestingError::MalformedPayload),
    }
    calls.persist()
}

#[derive(Accounts)]
pub struct ExecuteDeferredCall<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, EngineConfig>,

    /// Release calls only; checked against the payload's schedule id.
    #[account(mut)]
    pub vesting_slot: Option<Account<'info, VestingSlot>>,

    #[account(mut)]
    pub vault: Option<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub beneficiary_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Option<Program<'info, Token>>,

    #[account(mut)]
    pub keeper: Signer<'info>,
}
