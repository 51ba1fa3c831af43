use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{ESCROW_SEED, TREASURY_SEED, VAULT_SEED};
use crate::state::{RemovalPolicy, Vault};

pub fn initialize_vault(
    ctx: Context<InitializeVault>,
    principals: Vec<Pubkey>,
    threshold: u8,
    removal_policy: RemovalPolicy,
) -> Result<()> {
    let treasury = ctx.accounts.treasury.key();
    let escrow = ctx.accounts.escrow.key();

    let vault = &mut ctx.accounts.vault;
    vault.configure(principals, threshold, removal_policy)?;
    vault.mint = ctx.accounts.mint.key();
    vault.treasury = treasury;
    vault.escrow = escrow;
    vault.bump = ctx.bumps.vault;
    vault.treasury_bump = ctx.bumps.treasury;
    vault.escrow_bump = ctx.bumps.escrow;

    msg!(
        "Vault initialized: {} principals, threshold {}",
        vault.principals.len(),
        vault.threshold
    );
    emit!(VaultInitialized {
        mint: vault.mint,
        principals: vault.principals.clone(),
        threshold: vault.threshold,
        removal_policy: vault.removal_policy,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(
        init,
        payer = payer,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        init,
        payer = payer,
        token::mint = mint,
        token::authority = vault,
        seeds = [TREASURY_SEED, vault.key().as_ref()],
        bump
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = payer,
        token::mint = mint,
        token::authority = vault,
        seeds = [ESCROW_SEED, vault.key().as_ref()],
        bump
    )]
    pub escrow: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct VaultInitialized {
    pub mint: Pubkey,
    pub principals: Vec<Pubkey>,
    pub threshold: u8,
    pub removal_policy: RemovalPolicy,
}
