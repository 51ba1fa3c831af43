use std::collections::BTreeSet;

use anchor_lang::prelude::*;
use std::result::Result;

use crate::auth;
use crate::constants::MAX_PRINCIPALS;
use crate::error::VaultError;

/// What `RemovePrincipal` does when the smaller set can no longer meet the threshold.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Clamp the threshold down to the new set size.
    ClampThreshold,
    /// Fail the removal; a `ChangeThreshold` proposal must lower it first.
    RejectBelowThreshold,
}

/// Vault PDA: principal set, threshold and nonce counter.
/// Seeds: [b"vault", mint]
#[account]
#[derive(InitSpace)]
pub struct Vault {
    /// Token mint held by treasury and escrow.
    pub mint: Pubkey,
    /// Treasury token account (spent by `Transfer` proposals).
    pub treasury: Pubkey,
    /// Escrow token account holding funds locked in vesting schedules.
    pub escrow: Pubkey,
    /// Current principals (distinct, non-empty).
    #[max_len(MAX_PRINCIPALS)]
    pub principals: Vec<Pubkey>,
    /// Distinct approvals required; 1 <= threshold <= principals.len().
    pub threshold: u8,
    pub removal_policy: RemovalPolicy,
    /// Next proposal nonce. Starts at 1, never reused.
    pub next_nonce: u64,
    /// Escrow balance still owed to live schedules.
    pub vesting_locked: u64,
    pub bump: u8,
    pub treasury_bump: u8,
    pub escrow_bump: u8,
}

impl Vault {
    pub fn configure(
        &mut self,
        principals: Vec<Pubkey>,
        threshold: u8,
        removal_policy: RemovalPolicy,
    ) -> Result<(), VaultError> {
        validate_principal_set(&principals)?;
        if threshold == 0 || threshold as usize > principals.len() {
            return Err(VaultError::InvalidThreshold);
        }
        self.principals = principals;
        self.threshold = threshold;
        self.removal_policy = removal_policy;
        self.next_nonce = 1;
        self.vesting_locked = 0;
        Ok(())
    }

    pub fn is_principal(&self, identity: &Pubkey) -> bool {
        self.principals.contains(identity)
    }

    /// Distinct current principals among `signers`.
    pub fn approval_count(&self, signers: &[Pubkey]) -> usize {
        auth::tally(&self.principals, signers)
    }

    pub fn threshold_met(&self, signers: &[Pubkey]) -> bool {
        self.approval_count(signers) >= self.threshold as usize
    }

    /// Require `threshold` valid approvals over `message` from current principals.
    pub fn authorize<V: auth::SignatureVerifier + ?Sized>(
        &self,
        approvals: &[auth::Approval],
        message: &[u8],
        verifier: &V,
    ) -> Result<(), VaultError> {
        if !auth::authorize(&self.principals, self.threshold, approvals, message, verifier) {
            return Err(VaultError::NotAuthorized);
        }
        Ok(())
    }

    pub fn allocate_nonce(&mut self) -> Result<u64, VaultError> {
        let nonce = self.next_nonce;
        self.next_nonce = nonce.checked_add(1).ok_or(VaultError::MathOverflow)?;
        Ok(nonce)
    }

    pub fn add_principal(&mut self, principal: Pubkey) -> Result<(), VaultError> {
        if principal == Pubkey::default() {
            return Err(VaultError::InvalidPrincipal);
        }
        if self.is_principal(&principal) {
            return Err(VaultError::AlreadyPrincipal);
        }
        if self.principals.len() >= MAX_PRINCIPALS {
            return Err(VaultError::PrincipalSetFull);
        }
        self.principals.push(principal);
        Ok(())
    }

    /// Remove `principal`. Returns the previous threshold when it had to be clamped.
    pub fn remove_principal(&mut self, principal: &Pubkey) -> Result<Option<u8>, VaultError> {
        let idx = self
            .principals
            .iter()
            .position(|p| p == principal)
            .ok_or(VaultError::NotPrincipal)?;
        if self.principals.len() == 1 {
            return Err(VaultError::LastPrincipal);
        }
        let remaining = self.principals.len() - 1;
        let clamp = self.threshold as usize > remaining;
        if clamp && self.removal_policy == RemovalPolicy::RejectBelowThreshold {
            return Err(VaultError::ThresholdReductionRequired);
        }

        self.principals.remove(idx);
        if clamp {
            let old = self.threshold;
            // remaining < threshold <= u8::MAX
            self.threshold = remaining as u8;
            return Ok(Some(old));
        }
        Ok(None)
    }

    /// Set a new threshold. Returns the previous one.
    pub fn change_threshold(&mut self, threshold: u8) -> Result<u8, VaultError> {
        if threshold == 0 || threshold as usize > self.principals.len() {
            return Err(VaultError::InvalidThreshold);
        }
        let old = self.threshold;
        self.threshold = threshold;
        Ok(old)
    }

    pub fn lock_vesting(&mut self, amount: u64) -> Result<(), VaultError> {
        self.vesting_locked = self
            .vesting_locked
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn release_vesting(&mut self, amount: u64) -> Result<(), VaultError> {
        self.vesting_locked = self
            .vesting_locked
            .checked_sub(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// True if `account` is one of the vault-owned token accounts.
    pub fn owns_token_account(&self, account: &Pubkey) -> bool {
        *account == self.treasury || *account == self.escrow
    }
}

pub fn validate_principal_set(principals: &[Pubkey]) -> Result<(), VaultError> {
    if principals.is_empty() {
        return Err(VaultError::EmptyPrincipalSet);
    }
    if principals.len() > MAX_PRINCIPALS {
        return Err(VaultError::PrincipalSetFull);
    }
    let mut seen = BTreeSet::new();
    for p in principals {
        if *p == Pubkey::default() {
            return Err(VaultError::InvalidPrincipal);
        }
        if !seen.insert(p) {
            return Err(VaultError::DuplicatePrincipal);
        }
    }
    Ok(())
}
