use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{TREASURY_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::state::Vault;

/// Fund the treasury. Open to anyone; spending requires a `Transfer` proposal.
pub fn deposit_tokens(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::InvalidAmount);

    let vault = &ctx.accounts.vault;
    require_keys_eq!(
        ctx.accounts.depositor_token_account.mint,
        vault.mint,
        VaultError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.depositor_token_account.owner,
        ctx.accounts.depositor.key(),
        VaultError::InvalidTokenAccount
    );
    require!(
        ctx.accounts.depositor_token_account.amount >= amount,
        VaultError::InsufficientFunds
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.depositor_token_account.to_account_info(),
                to: ctx.accounts.treasury.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        ),
        amount,
    )?;

    ctx.accounts.treasury.reload()?;

    emit!(TokensDeposited {
        depositor: ctx.accounts.depositor.key(),
        amount,
        treasury_balance: ctx.accounts.treasury.amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct DepositTokens<'info> {
    #[account(seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, vault.key().as_ref()],
        bump = vault.treasury_bump,
        constraint = treasury.mint == vault.mint @ VaultError::InvalidTokenMint,
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub depositor_token_account: Account<'info, TokenAccount>,

    pub depositor: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensDeposited {
    pub depositor: Pubkey,
    pub amount: u64,
    pub treasury_balance: u64,
}
