use anchor_lang::prelude::*;

pub mod auth;
pub mod constants;
pub mod error;
pub mod governance;
pub mod instructions;
pub mod state;
pub mod utils;

pub use governance::{GovernanceAction, VestingOp};
pub use instructions::*;
pub use state::RemovalPolicy;

declare_id!("61EiRiRNSU4ZEhnn8JpC6L9VRHz6oKvD9YzSP6bNZNWp");

#[program]
pub mod governed_vault {
    use super::*;

    pub fn initialize_vault(
        ctx: Context<InitializeVault>,
        principals: Vec<Pubkey>,
        threshold: u8,
        removal_policy: RemovalPolicy,
    ) -> Result<()> {
        instructions::initialize_vault(ctx, principals, threshold, removal_policy)
    }

    pub fn deposit(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
        instructions::deposit_tokens(ctx, amount)
    }

    pub fn propose(ctx: Context<Propose>, action: GovernanceAction) -> Result<()> {
        instructions::propose(ctx, action)
    }

    pub fn sign_proposal(ctx: Context<SignProposal>, expected_digest: [u8; 32]) -> Result<()> {
        instructions::sign_proposal(ctx, expected_digest)
    }

    pub fn execute_proposal(ctx: Context<ExecuteProposal>) -> Result<()> {
        instructions::execute_proposal(ctx)
    }

    pub fn create_vesting(
        ctx: Context<CreateVesting>,
        id: u64,
        total: u64,
        start_ts: i64,
        duration: u64,
    ) -> Result<()> {
        instructions::create_vesting(ctx, id, total, start_ts, duration)
    }

    pub fn claim_vesting(ctx: Context<ClaimVesting>) -> Result<()> {
        instructions::claim_vesting(ctx)
    }

    pub fn emit_vesting_quote(ctx: Context<EmitVestingQuote>) -> Result<()> {
        instructions::emit_vesting_quote(ctx)
    }

    pub fn emit_proposal_status(ctx: Context<EmitProposalStatus>) -> Result<()> {
        instructions::emit_proposal_status(ctx)
    }
}
