use anchor_lang::prelude::*;
use std::result::Result;

use crate::constants::MAX_APPROVALS;
use crate::error::VaultError;
use crate::governance::{
    apply_action, proposal_digest, GovernanceAction, Outcome, SettlementAccounts,
};
use crate::state::{Vault, VestingSchedule};

/// Pending or executed governance action.
/// Seeds: [b"proposal", vault, nonce.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Proposal {
    pub vault: Pubkey,
    /// Allocated from `Vault::next_nonce`; never reused.
    pub nonce: u64,
    pub proposer: Pubkey,
    /// Immutable after creation.
    pub action: GovernanceAction,
    /// blake3(vault, nonce, action); what signers approve.
    pub digest: [u8; 32],
    /// Sorted, distinct signer identities. Frozen once executed.
    #[max_len(MAX_APPROVALS)]
    pub approvals: Vec<Pubkey>,
    /// One-way.
    pub executed: bool,
    pub created_at: i64,
    pub executed_at: i64,
    pub bump: u8,
}

impl Proposal {
    /// Record a new pending proposal and allocate its nonce from the vault.
    pub fn open(
        &mut self,
        vault_key: Pubkey,
        vault: &mut Vault,
        proposer: Pubkey,
        action: GovernanceAction,
        now_ts: i64,
        bump: u8,
    ) -> Result<u64, VaultError> {
        if !vault.is_principal(&proposer) {
            return Err(VaultError::NotAuthorized);
        }
        action.validate(vault)?;
        let nonce = vault.allocate_nonce()?;

        self.vault = vault_key;
        self.nonce = nonce;
        self.proposer = proposer;
        self.action = action;
        self.digest = proposal_digest(&vault_key, nonce, &action);
        self.approvals = Vec::new();
        self.executed = false;
        self.created_at = now_ts;
        self.executed_at = 0;
        self.bump = bump;
        Ok(nonce)
    }

    pub fn check_digest(&self, expected: &[u8; 32]) -> Result<(), VaultError> {
        if self.digest != *expected {
            return Err(VaultError::DigestMismatch);
        }
        Ok(())
    }

    /// Add `signer` to the approval set. Re-signing is a no-op (returns false).
    pub fn sign(&mut self, vault: &Vault, signer: Pubkey) -> Result<bool, VaultError> {
        if self.executed {
            return Err(VaultError::AlreadyExecuted);
        }
        if !vault.is_principal(&signer) {
            return Err(VaultError::NotAuthorized);
        }
        let idx = match self.approvals.binary_search(&signer) {
            Ok(_) => return Ok(false),
            Err(idx) => idx,
        };
        if self.approvals.len() < MAX_APPROVALS {
            self.approvals.insert(idx, signer);
            return Ok(true);
        }

        // Full: drop approvals from identities that are no longer principals.
        self.approvals.retain(|a| vault.is_principal(a));
        if self.approvals.len() >= MAX_APPROVALS {
            return Err(VaultError::ApprovalListFull);
        }
        let idx = self
            .approvals
            .binary_search(&signer)
            .unwrap_or_else(|i| i);
        self.approvals.insert(idx, signer);
        Ok(true)
    }

    /// Check the digest the signer approved, then record the approval.
    pub fn approve(
        &mut self,
        expected_digest: &[u8; 32],
        vault: &Vault,
        signer: Pubkey,
    ) -> Result<bool, VaultError> {
        self.check_digest(expected_digest)?;
        self.sign(vault, signer)
    }

    /// Approvals from identities that are principals right now.
    pub fn approval_count(&self, vault: &Vault) -> usize {
        vault.approval_count(&self.approvals)
    }

    pub fn can_execute(&self, vault: &Vault) -> bool {
        !self.executed && vault.threshold_met(&self.approvals)
    }

    pub fn ensure_executable(&self, vault: &Vault) -> Result<(), VaultError> {
        if self.executed {
            return Err(VaultError::AlreadyExecuted);
        }
        if !vault.threshold_met(&self.approvals) {
            return Err(VaultError::ThresholdNotMet);
        }
        Ok(())
    }

    pub fn mark_executed(&mut self, now_ts: i64) {
        self.executed = true;
        self.executed_at = now_ts;
    }

    /// Run the action and flip `executed`.
    ///
    /// Threshold and settlement accounts are checked before the vault or schedule is
    /// touched; any error leaves the proposal pending. Returns the outcome and the
    /// approval count that authorized it.
    pub fn execute(
        &mut self,
        vault: &mut Vault,
        vesting: Option<&mut VestingSchedule>,
        accounts: &SettlementAccounts,
        now_ts: i64,
    ) -> Result<(Outcome, usize), VaultError> {
        self.ensure_executable(vault)?;
        accounts.check(&self.action, vault)?;
        let approvals = self.approval_count(vault);
        let outcome = apply_action(&self.action, vault, vesting, now_ts)?;
        self.mark_executed(now_ts);
        Ok((outcome, approvals))
    }
}
