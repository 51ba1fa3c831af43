use anchor_lang::prelude::*;

use crate::auth::TransactionSigners;
use crate::constants::{PROPOSAL_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::state::{Proposal, Vault};

/// Approve a pending proposal.
///
/// `expected_digest` must equal the proposal digest. Extra signer accounts passed as
/// remaining accounts are recorded as co-signers when they are current principals;
/// other remaining accounts are ignored.
pub fn sign_proposal(ctx: Context<SignProposal>, expected_digest: [u8; 32]) -> Result<()> {
    let vault = &ctx.accounts.vault;
    let proposal = &mut ctx.accounts.proposal;

    let signer = ctx.accounts.signer.key();
    let mut added = Vec::new();
    if proposal.approve(&expected_digest, vault, signer)? {
        added.push(signer);
    }

    let cosigners = TransactionSigners::from_accounts(ctx.remaining_accounts);
    for approval in cosigners.approvals() {
        if approval.signer == signer || !vault.is_principal(&approval.signer) {
            continue;
        }
        if proposal.sign(vault, approval.signer)? {
            added.push(approval.signer);
        }
    }

    let approvals = proposal.approval_count(vault);
    for s in added {
        emit!(ProposalSigned {
            vault: vault.key(),
            nonce: proposal.nonce,
            signer: s,
            approvals: approvals as u8,
            threshold: vault.threshold,
        });
    }
    msg!(
        "Proposal {}: {}/{} approvals",
        proposal.nonce,
        approvals,
        vault.threshold
    );

    Ok(())
}

#[derive(Accounts)]
pub struct SignProposal<'info> {
    #[account(seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [PROPOSAL_SEED, vault.key().as_ref(), &proposal.nonce.to_le_bytes()],
        bump = proposal.bump,
        has_one = vault @ VaultError::UnknownProposal,
    )]
    pub proposal: Account<'info, Proposal>,

    pub signer: Signer<'info>,
}

#[event]
pub struct ProposalSigned {
    pub vault: Pubkey,
    pub nonce: u64,
    pub signer: Pubkey,
    pub approvals: u8,
    pub threshold: u8,
}
