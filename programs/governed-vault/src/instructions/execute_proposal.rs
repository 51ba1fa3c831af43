use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{ESCROW_SEED, PROPOSAL_SEED, TREASURY_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::governance::{DestinationAccount, Outcome, SettlementAccounts};
use crate::state::{CancelSettlement, Proposal, Vault, VestingSchedule};
use crate::utils::token::vault_transfer;

/// Execute a proposal whose approvals meet the current threshold.
///
/// Approvals are re-counted against the principal set as it is now. The action and
/// any token movement it implies commit together with `executed = true`; if a
/// transfer fails the whole instruction fails and the proposal stays pending.
pub fn execute_proposal(mut ctx: Context<ExecuteProposal>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault.key();
    let supplied = SettlementAccounts {
        treasury_balance: ctx.accounts.treasury.as_ref().map(|t| t.amount),
        destination: ctx
            .accounts
            .destination
            .as_ref()
            .map(|d| DestinationAccount {
                key: d.key(),
                mint: d.mint,
                owner: d.owner,
            }),
    };

    let accounts = &mut ctx.accounts;
    let (outcome, approvals) = accounts.proposal.execute(
        &mut accounts.vault,
        accounts.vesting.as_deref_mut(),
        &supplied,
        now,
    )?;

    match outcome {
        Outcome::Transfer { amount, .. } => settle_transfer(ctx.accounts, amount)?,
        Outcome::VestingCancelled {
            beneficiary,
            settlement,
            ..
        } => settle_cancel(ctx.accounts, beneficiary, settlement)?,
        _ => {}
    }

    emit_outcome(vault_key, &ctx.accounts.vault, &outcome);

    let nonce = ctx.accounts.proposal.nonce;
    msg!("Proposal {} executed", nonce);
    emit!(ProposalExecuted {
        vault: vault_key,
        nonce,
        executor: ctx.accounts.executor.key(),
        approvals: approvals as u8,
        executed_at: now,
    });

    Ok(())
}

/// Destination, mint and balance were checked before the action ran.
fn settle_transfer<'info>(accounts: &ExecuteProposal<'info>, amount: u64) -> Result<()> {
    let treasury = accounts
        .treasury
        .as_ref()
        .ok_or(VaultError::MissingAccount)?;
    let dest = accounts
        .destination
        .as_ref()
        .ok_or(VaultError::MissingAccount)?;
    let token_program = accounts
        .token_program
        .as_ref()
        .ok_or(VaultError::MissingAccount)?;

    vault_transfer(
        token_program.to_account_info(),
        treasury.to_account_info(),
        dest.to_account_info(),
        accounts.vault.to_account_info(),
        accounts.vault.mint,
        accounts.vault.bump,
        amount,
    )
}

fn settle_cancel<'info>(
    accounts: &ExecuteProposal<'info>,
    beneficiary: Pubkey,
    settlement: CancelSettlement,
) -> Result<()> {
    if settlement.total()? == 0 {
        return Ok(());
    }
    let escrow = accounts
        .escrow
        .as_ref()
        .ok_or(VaultError::MissingAccount)?;
    let token_program = accounts
        .token_program
        .as_ref()
        .ok_or(VaultError::MissingAccount)?;
    let vault = &accounts.vault;

    if settlement.to_beneficiary > 0 {
        let dest = accounts
            .destination
            .as_ref()
            .ok_or(VaultError::MissingAccount)?;
        require_keys_eq!(dest.owner, beneficiary, VaultError::InvalidTokenAccount);
        require_keys_eq!(dest.mint, vault.mint, VaultError::InvalidTokenMint);
        vault_transfer(
            token_program.to_account_info(),
            escrow.to_account_info(),
            dest.to_account_info(),
            vault.to_account_info(),
            vault.mint,
            vault.bump,
            settlement.to_beneficiary,
        )?;
    }

    if settlement.to_treasury > 0 {
        let treasury = accounts
            .treasury
            .as_ref()
            .ok_or(VaultError::MissingAccount)?;
        vault_transfer(
            token_program.to_account_info(),
            escrow.to_account_info(),
            treasury.to_account_info(),
            vault.to_account_info(),
            vault.mint,
            vault.bump,
            settlement.to_treasury,
        )?;
    }

    Ok(())
}

fn emit_outcome(vault_key: Pubkey, vault: &Vault, outcome: &Outcome) {
    match *outcome {
        Outcome::Transfer {
            destination,
            amount,
        } => emit!(TreasuryTransfer {
            vault: vault_key,
            destination,
            amount,
        }),
        Outcome::PrincipalAdded { principal } => emit!(PrincipalAdded {
            vault: vault_key,
            principal,
            principal_count: vault.principals.len() as u8,
        }),
        Outcome::PrincipalRemoved {
            principal,
            clamped_from,
        } => {
            if let Some(old) = clamped_from {
                msg!("Threshold clamped from {} to {}", old, vault.threshold);
            }
            emit!(PrincipalRemoved {
                vault: vault_key,
                principal,
                principal_count: vault.principals.len() as u8,
                threshold: vault.threshold,
                clamped_from,
            })
        }
        Outcome::ThresholdChanged { old, new } => emit!(ThresholdChanged {
            vault: vault_key,
            old,
            new,
        }),
        Outcome::VestingPauseSet {
            vesting_id, paused, ..
        } => emit!(VestingPauseSet {
            vault: vault_key,
            vesting_id,
            paused,
        }),
        Outcome::VestingCancelled {
            vesting_id,
            beneficiary,
            settlement,
        } => emit!(VestingCancelled {
            vault: vault_key,
            vesting_id,
            beneficiary,
            to_beneficiary: settlement.to_beneficiary,
            to_treasury: settlement.to_treasury,
        }),
    }
}

#[derive(Accounts)]
pub struct ExecuteProposal<'info> {
    #[account(mut, seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [PROPOSAL_SEED, vault.key().as_ref(), &proposal.nonce.to_le_bytes()],
        bump = proposal.bump,
        has_one = vault @ VaultError::UnknownProposal,
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    pub executor: Signer<'info>,

    /// Source of `Transfer`; receives unvested funds on cancel.
    #[account(
        mut,
        seeds = [TREASURY_SEED, vault.key().as_ref()],
        bump = vault.treasury_bump,
    )]
    pub treasury: Option<Account<'info, TokenAccount>>,

    /// `Transfer` destination, or the beneficiary token account on cancel.
    #[account(mut)]
    pub destination: Option<Account<'info, TokenAccount>>,

    /// Target of `VestingControl`.
    #[account(mut, has_one = vault @ VaultError::UnknownVesting)]
    pub vesting: Option<Account<'info, VestingSchedule>>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, vault.key().as_ref()],
        bump = vault.escrow_bump,
    )]
    pub escrow: Option<Account<'info, TokenAccount>>,

    pub token_program: Option<Program<'info, Token>>,
}

#[event]
pub struct ProposalExecuted {
    pub vault: Pubkey,
    pub nonce: u64,
    pub executor: Pubkey,
    pub approvals: u8,
    pub executed_at: i64,
}

#[event]
pub struct TreasuryTransfer {
    pub vault: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PrincipalAdded {
    pub vault: Pubkey,
    pub principal: Pubkey,
    pub principal_count: u8,
}

#[event]
pub struct PrincipalRemoved {
    pub vault: Pubkey,
    pub principal: Pubkey,
    pub principal_count: u8,
    pub threshold: u8,
    pub clamped_from: Option<u8>,
}

#[event]
pub struct ThresholdChanged {
    pub vault: Pubkey,
    pub old: u8,
    pub new: u8,
}

#[event]
pub struct VestingPauseSet {
    pub vault: Pubkey,
    pub vesting_id: u64,
    pub paused: bool,
}

#[event]
pub struct VestingCancelled {
    pub vault: Pubkey,
    pub vesting_id: u64,
    pub beneficiary: Pubkey,
    pub to_beneficiary: u64,
    pub to_treasury: u64,
}
