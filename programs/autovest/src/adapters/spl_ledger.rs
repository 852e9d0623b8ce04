use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::engine::TokenLedger;
use crate::error::VestingError;

/// `TokenLedger` over the two token accounts an instruction was given:
/// the engine vault (held by the config PDA) and one counterparty account
/// (the funder on creation, the beneficiary on release).
pub struct SplLedger<'a, 'info> {
    token_program: AccountInfo<'info>,
    /// Config PDA: vault owner and delegate of funder accounts.
    authority: AccountInfo<'info>,
    signer_seeds: &'a [&'a [&'a [u8]]],
    vault: &'a mut Account<'info, TokenAccount>,
    counterparty: &'a mut Account<'info, TokenAccount>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Vault,
    Counterparty,
}

impl<'a, 'info> SplLedger<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        authority: AccountInfo<'info>,
        signer_seeds: &'a [&'a [&'a [u8]]],
        vault: &'a mut Account<'info, TokenAccount>,
        counterparty: &'a mut Account<'info, TokenAccount>,
    ) -> Self {
        Self {
            token_program,
            authority,
            signer_seeds,
            vault,
            counterparty,
        }
    }

    fn side(&self, token: &Pubkey, holder: &Pubkey) -> Result<Side> {
        let side = if *holder == self.authority.key() {
            Side::Vault
        } else if *holder == self.counterparty.owner {
            Side::Counterparty
        } else {
            return err!(VestingError::UnknownTokenAccount);
        };
        require_keys_eq!(self.account(side).mint, *token, VestingError::InvalidTokenMint);
        Ok(side)
    }

    fn account(&self, side: Side) -> &Account<'info, TokenAccount> {
        match side {
            Side::Vault => &*self.vault,
            Side::Counterparty => &*self.counterparty,
        }
    }

    fn account_mut(&mut self, side: Side) -> &mut Account<'info, TokenAccount> {
        match side {
            Side::Vault => &mut *self.vault,
            Side::Counterparty => &mut *self.counterparty,
        }
    }

    /// Transfer signed by the config PDA, either as vault owner or as the
    /// funder's delegate.
    fn signed_transfer(&self, from: Side, to: Side, amount: u64) -> Result<()> {
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.account(from).to_account_info(),
                    to: self.account(to).to_account_info(),
                    authority: self.authority.clone(),
                },
                self.signer_seeds,
            ),
            amount,
        )
    }
}

impl TokenLedger for SplLedger<'_, '_> {
    fn allowance(&mut self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> Result<u64> {
        let side = self.side(token, owner)?;
        let account = self.account(side);
        Ok(match account.delegate {
            COption::Some(delegate) if delegate == *spender => account.delegated_amount,
            _ => 0,
        })
    }

    fn balance_of(&mut self, token: &Pubkey, holder: &Pubkey) -> Result<u64> {
        let side = self.side(token, holder)?;
        let account = self.account_mut(side);
        account.reload()?;
        Ok(account.amount)
    }

    fn transfer(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let from = self.side(token, from)?;
        let to = self.side(token, to)?;
        require!(
            matches!(from, Side::Vault),
            VestingError::InvalidTokenAccount
        );
        self.signed_transfer(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        require_keys_eq!(*spender, self.authority.key(), VestingError::Unauthorized);
        let from = self.side(token, from)?;
        let to = self.side(token, to)?;
        require!(
            matches!(from, Side::Counterparty),
            VestingError::InvalidTokenAccount
        );
        self.signed_transfer(from, to, amount)
    }
}
