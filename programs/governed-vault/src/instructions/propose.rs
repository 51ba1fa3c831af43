use anchor_lang::prelude::*;

use crate::constants::{PROPOSAL_SEED, VAULT_SEED};
use crate::governance::GovernanceAction;
use crate::state::{Proposal, Vault};

pub fn propose(ctx: Context<Propose>, action: GovernanceAction) -> Result<()> {
    let vault_key = ctx.accounts.vault.key();
    let proposer = ctx.accounts.proposer.key();
    let now = Clock::get()?.unix_timestamp;

    let vault = &mut ctx.accounts.vault;
    let proposal = &mut ctx.accounts.proposal;
    let nonce = proposal.open(
        vault_key,
        vault,
        proposer,
        action,
        now,
        ctx.bumps.proposal,
    )?;

    msg!("Proposal {} created by {}", nonce, proposer);
    emit!(ProposalCreated {
        vault: vault_key,
        nonce,
        proposer,
        action,
        digest: proposal.digest,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Propose<'info> {
    #[account(mut, seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Account<'info, Vault>,

    #[account(
        init,
        payer = proposer,
        space = 8 + Proposal::INIT_SPACE,
        seeds = [PROPOSAL_SEED, vault.key().as_ref(), &vault.next_nonce.to_le_bytes()],
        bump
    )]
    pub proposal: Account<'info, Proposal>,

    #[account(mut)]
    pub proposer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct ProposalCreated {
    pub vault: Pubkey,
    pub nonce: u64,
    pub proposer: Pubkey,
    pub action: GovernanceAction,
    pub digest: [u8; 32],
}
