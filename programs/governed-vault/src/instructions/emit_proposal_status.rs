use anchor_lang::prelude::*;

use crate::constants::{PROPOSAL_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::state::{Proposal, Vault};

/// Approvals are counted against the current principal set.
pub fn emit_proposal_status(ctx: Context<EmitProposalStatus>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    let proposal = &ctx.accounts.proposal;

    emit!(ProposalStatus {
        nonce: proposal.nonce,
        approvals: proposal.approval_count(vault) as u8,
        threshold: vault.threshold,
        can_execute: proposal.can_execute(vault),
        executed: proposal.executed,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EmitProposalStatus<'info> {
    #[account(seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        seeds = [PROPOSAL_SEED, vault.key().as_ref(), &proposal.nonce.to_le_bytes()],
        bump = proposal.bump,
        has_one = vault @ VaultError::UnknownProposal,
    )]
    pub proposal: Box<Account<'info, Proposal>>,
}

#[event]
pub struct ProposalStatus {
    pub nonce: u64,
    pub approvals: u8,
    pub threshold: u8,
    pub can_execute: bool,
    pub executed: bool,
}
