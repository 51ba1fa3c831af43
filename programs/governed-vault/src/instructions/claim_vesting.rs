use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{ESCROW_SEED, VAULT_SEED, VESTING_SEED};
use crate::error::VaultError;
use crate::state::{Vault, VestingSchedule};
use crate::utils::token::vault_transfer;

pub fn claim_vesting(ctx: Context<ClaimVesting>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let beneficiary = ctx.accounts.beneficiary.key();

    let amount = ctx.accounts.vesting.claim(&beneficiary, now)?;

    let destination = &ctx.accounts.beneficiary_token_account;
    require_keys_eq!(destination.mint, ctx.accounts.vault.mint, VaultError::InvalidTokenMint);
    require_keys_eq!(destination.owner, beneficiary, VaultError::InvalidTokenAccount);

    vault_transfer(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.escrow.to_account_info(),
        destination.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.vault.mint,
        ctx.accounts.vault.bump,
        amount,
    )?;

    ctx.accounts.vault.release_vesting(amount)?;

    let vesting = &ctx.accounts.vesting;
    emit!(VestingClaimed {
        vault: ctx.accounts.vault.key(),
        vesting_id: vesting.id,
        beneficiary,
        amount,
        claimed: vesting.claimed,
        total: vesting.total,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimVesting<'info> {
    #[account(mut, seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [VESTING_SEED, vault.key().as_ref(), &vesting.id.to_le_bytes()],
        bump = vesting.bump,
        has_one = vault @ VaultError::UnknownVesting,
    )]
    pub vesting: Box<Account<'info, VestingSchedule>>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, vault.key().as_ref()],
        bump = vault.escrow_bump,
    )]
    pub escrow: Account<'info, TokenAccount>,

    #[account(mut)]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub beneficiary: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct VestingClaimed {
    pub vault: Pubkey,
    pub vesting_id: u64,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub claimed: u64,
    pub total: u64,
}
