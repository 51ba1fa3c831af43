use anchor_lang::prelude::*;

use crate::constants::{VAULT_SEED, VESTING_SEED};
use crate::error::VaultError;
use crate::state::{Vault, VestingSchedule};
use crate::utils::time;

pub fn emit_vesting_quote(ctx: Context<EmitVestingQuote>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vesting = &ctx.accounts.vesting;

    emit!(VestingQuote {
        vesting_id: vesting.id,
        beneficiary: vesting.beneficiary,
        vested: vesting.vested(now)?,
        claimed: vesting.claimed,
        claimable: vesting.claimable(now)?,
        paused: vesting.paused,
        cancelled: vesting.cancelled,
        fully_vested: time::is_after_vesting_end(now, vesting.start_ts, vesting.duration),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EmitVestingQuote<'info> {
    #[account(seeds = [VAULT_SEED, vault.mint.as_ref()], bump = vault.bump)]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        seeds = [VESTING_SEED, vault.key().as_ref(), &vesting.id.to_le_bytes()],
        bump = vesting.bump,
        has_one = vault @ VaultError::UnknownVesting,
    )]
    pub vesting: Box<Account<'info, VestingSchedule>>,
}

#[event]
pub struct VestingQuote {
    pub vesting_id: u64,
    pub beneficiary: Pubkey,
    pub vested: u64,
    pub claimed: u64,
    pub claimable: u64,
    pub paused: bool,
    pub cancelled: bool,
    pub fully_vested: bool,
}
