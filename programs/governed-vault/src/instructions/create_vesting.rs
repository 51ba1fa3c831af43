use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::auth::TransactionSigners;
use crate::constants::{ESCROW_SEED, VAULT_SEED, VESTING_SEED};
use crate::error::VaultError;
use crate::governance::vesting_digest;
use crate::state::{Vault, VestingSchedule};

/// Open a vesting schedule funded from the beneficiary's token account.
///
/// Principals co-sign by passing themselves as signer accounts in `remaining_accounts`;
/// their count must meet the vault threshold.
pub fn create_vesting(
    ctx: Context<CreateVesting>,
    id: u64,
    total: u64,
    start_ts: i64,
    duration: u64,
) -> Result<()> {
    let vault_key = ctx.accounts.vault.key();
    let beneficiary = ctx.accounts.beneficiary.key();

    let signers = TransactionSigners::from_accounts(ctx.remaining_accounts).with(beneficiary);
    // Transaction signatures already cover these terms as instruction data; the digest
    // is the message for verifiers that check detached proofs.
    let digest = vesting_digest(&vault_key, id, &beneficiary, total, start_ts, duration);
    ctx.accounts
        .vault
        .authorize(&signers.approvals(), &digest, &signers)?;

    let source = &ctx.accounts.beneficiary_token_account;
    require_keys_eq!(source.mint, ctx.accounts.vault.mint, VaultError::InvalidTokenMint);
    require_keys_eq!(source.owner, beneficiary, VaultError::InvalidTokenAccount);

    let schedule = &mut ctx.accounts.vesting;
    schedule.open(
        vault_key,
        id,
        beneficiary,
        total,
        start_ts,
        duration,
        ctx.bumps.vesting,
    )?;
    schedule.ensure_funded(source.amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.beneficiary_token_account.to_account_info(),
                to: ctx.accounts.escrow.to_account_info(),
                authority: ctx.accounts.beneficiary.to_account_info(),
            },
        ),
        total,
    )?;

    ctx.accounts.vault.lock_vesting(total)?;

    msg!("Vesting {} created: {} over {}s", id, total, duration);
    emit!(VestingCreated {
        vault: vault_key,
        vesting_id: id,
        beneficiary,
        total,
        start_ts,
        duration,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(id: u64)]
pub struct CreateVesting<'info> {
    #[account(mut, seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Box<Account<'info, Vault>>,

    /// Re-using an id lands on the existing account and fails with `DuplicateId`.
    #[account(
        init_if_needed,
        payer = beneficiary,
        space = 8 + VestingSchedule::SIZE,
        seeds = [VESTING_SEED, vault.key().as_ref(), &id.to_le_bytes()],
        bump
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

    #[account(mut)]
    pub beneficiary: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct VestingCreated {
    pub vault: Pubkey,
    pub vesting_id: u64,
    pub beneficiary: Pubkey,
    pub total: u64,
    pub start_ts: i64,
    pub duration: u64,
}
