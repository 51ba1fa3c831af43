//! Governance actions: the closed set of effects a proposal can carry, the digest
//! signers approve, and the state transition applied on execution.

use anchor_lang::prelude::*;
use std::result::Result;
use bytemuck::{Pod, Zeroable};

use crate::constants::MAX_PRINCIPALS;
use crate::error::VaultError;
use crate::state::{CancelSettlement, Vault, VestingSchedule};

const PROPOSAL_DOMAIN: &[u8] = b"governed-vault/proposal/v1";
const VESTING_DOMAIN: &[u8] = b"governed-vault/vesting/v1";

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VestingOp {
    Pause,
    Unpause,
    /// Terminal. `forfeit_vested` decides where vested-but-unclaimed funds go.
    Cancel { forfeit_vested: bool },
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GovernanceAction {
    /// Move `amount` from the treasury to the `destination` token account.
    Transfer { destination: Pubkey, amount: u64 },
    AddPrincipal { principal: Pubkey },
    RemovePrincipal { principal: Pubkey },
    ChangeThreshold { threshold: u8 },
    VestingControl { vesting_id: u64, op: VestingOp },
}

impl GovernanceAction {
    /// Parameter checks that do not depend on state that may change before execution.
    pub fn validate(&self, vault: &Vault) -> Result<(), VaultError> {
        match *self {
            GovernanceAction::Transfer {
                destination,
                amount,
            } => {
                if amount == 0 {
                    return Err(VaultError::InvalidAmount);
                }
                if destination == Pubkey::default() {
                    return Err(VaultError::InvalidDestination);
                }
                if vault.owns_token_account(&destination) {
                    return Err(VaultError::SelfTransfer);
                }
            }
            GovernanceAction::AddPrincipal { principal }
            | GovernanceAction::RemovePrincipal { principal } => {
                if principal == Pubkey::default() {
                    return Err(VaultError::InvalidPrincipal);
                }
            }
            GovernanceAction::ChangeThreshold { threshold } => {
                // Upper bound against the live set is checked at execution.
                if threshold == 0 || threshold as usize > MAX_PRINCIPALS {
                    return Err(VaultError::InvalidThreshold);
                }
            }
            GovernanceAction::VestingControl { .. } => {}
        }
        Ok(())
    }

    fn hash_into(&self, hasher: &mut blake3::Hasher) {
        match self {
            GovernanceAction::Transfer {
                destination,
                amount,
            } => {
                hasher.update(&[0]);
                hasher.update(destination.as_ref());
                hasher.update(&amount.to_le_bytes());
            }
            GovernanceAction::AddPrincipal { principal } => {
                hasher.update(&[1]);
                hasher.update(principal.as_ref());
            }
            GovernanceAction::RemovePrincipal { principal } => {
                hasher.update(&[2]);
                hasher.update(principal.as_ref());
            }
            GovernanceAction::ChangeThreshold { threshold } => {
                hasher.update(&[3, *threshold]);
            }
            GovernanceAction::VestingControl { vesting_id, op } => {
                hasher.update(&[4]);
                hasher.update(&vesting_id.to_le_bytes());
                match op {
                    VestingOp::Pause => hasher.update(&[0]),
                    VestingOp::Unpause => hasher.update(&[1]),
                    VestingOp::Cancel { forfeit_vested } => {
                        hasher.update(&[2, *forfeit_vested as u8])
                    }
                };
            }
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ProposalHeader {
    vault: [u8; 32],
    nonce: [u8; 8],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct VestingTerms {
    vault: [u8; 32],
    beneficiary: [u8; 32],
    id: [u8; 8],
    total: [u8; 8],
    start_ts: [u8; 8],
    duration: [u8; 8],
}

/// blake3 over (vault, nonce, action). This is the message principals approve.
pub fn proposal_digest(vault: &Pubkey, nonce: u64, action: &GovernanceAction) -> [u8; 32] {
    let header = ProposalHeader {
        vault: vault.to_bytes(),
        nonce: nonce.to_le_bytes(),
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(PROPOSAL_DOMAIN);
    hasher.update(bytemuck::bytes_of(&header));
    action.hash_into(&mut hasher);
    *hasher.finalize().as_bytes()
}

/// blake3 over the terms of a new vesting schedule, approved by co-signing principals.
pub fn vesting_digest(
    vault: &Pubkey,
    id: u64,
    beneficiary: &Pubkey,
    total: u64,
    start_ts: i64,
    duration: u64,
) -> [u8; 32] {
    let terms = VestingTerms {
        vault: vault.to_bytes(),
        beneficiary: beneficiary.to_bytes(),
        id: id.to_le_bytes(),
        total: total.to_le_bytes(),
        start_ts: start_ts.to_le_bytes(),
        duration: duration.to_le_bytes(),
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(VESTING_DOMAIN);
    hasher.update(bytemuck::bytes_of(&terms));
    *hasher.finalize().as_bytes()
}

/// What executing an action did; token movements are left to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Transfer {
        destination: Pubkey,
        amount: u64,
    },
    PrincipalAdded {
        principal: Pubkey,
    },
    PrincipalRemoved {
        principal: Pubkey,
        clamped_from: Option<u8>,
    },
    ThresholdChanged {
        old: u8,
        new: u8,
    },
    VestingPauseSet {
        vesting_id: u64,
        paused: bool,
        changed: bool,
    },
    VestingCancelled {
        vesting_id: u64,
        beneficiary: Pubkey,
        settlement: CancelSettlement,
    },
}

/// Apply `action` to the vault (and the targeted schedule, if any).
///
/// On error neither `vault` nor `vesting` is modified.
pub fn apply_action(
    action: &GovernanceAction,
    vault: &mut Vault,
    vesting: Option<&mut VestingSchedule>,
    now_ts: i64,
) -> Result<Outcome, VaultError> {
    match *action {
        GovernanceAction::Transfer {
            destination,
            amount,
        } => {
            action.validate(vault)?;
            Ok(Outcome::Transfer {
                destination,
                amount,
            })
        }
        GovernanceAction::AddPrincipal { principal } => {
            vault.add_principal(principal)?;
            Ok(Outcome::PrincipalAdded { principal })
        }
        GovernanceAction::RemovePrincipal { principal } => {
            let clamped_from = vault.remove_principal(&principal)?;
            Ok(Outcome::PrincipalRemoved {
                principal,
                clamped_from,
            })
        }
        GovernanceAction::ChangeThreshold { threshold } => {
            let old = vault.change_threshold(threshold)?;
            Ok(Outcome::ThresholdChanged {
                old,
                new: threshold,
            })
        }
        GovernanceAction::VestingControl { vesting_id, op } => {
            let schedule = vesting
                .filter(|s| s.is_initialized() && s.id == vesting_id)
                .ok_or(VaultError::UnknownVesting)?;
            match op {
                VestingOp::Pause | VestingOp::Unpause => {
                    let paused = op == VestingOp::Pause;
                    let changed = schedule.set_paused(paused)?;
                    Ok(Outcome::VestingPauseSet {
                        vesting_id,
                        paused,
                        changed,
                    })
                }
                VestingOp::Cancel { forfeit_vested } => {
                    let mut next = schedule.clone();
                    let settlement = next.cancel(now_ts, forfeit_vested)?;
                    vault.release_vesting(settlement.total()?)?;
                    *schedule = next;
                    Ok(Outcome::VestingCancelled {
                        vesting_id,
                        beneficiary: schedule.beneficiary,
                        settlement,
                    })
                }
            }
        }
    }
}

/// Token account handed to `execute` as the transfer destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestinationAccount {
    pub key: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
}

/// Balances and accounts supplied to `execute`, checked before any state changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettlementAccounts {
    pub treasury_balance: Option<u64>,
    pub destination: Option<DestinationAccount>,
}

impl SettlementAccounts {
    /// `Transfer` preconditions: treasury and destination present, destination is the
    /// one the proposal names and holds the vault mint, treasury covers `amount`.
    pub fn check_transfer(
        &self,
        vault: &Vault,
        destination: &Pubkey,
        amount: u64,
    ) -> Result<(), VaultError> {
        let balance = self.treasury_balance.ok_or(VaultError::MissingAccount)?;
        let dest = self.destination.ok_or(VaultError::MissingAccount)?;
        if dest.key != *destination {
            return Err(VaultError::InvalidDestination);
        }
        if dest.mint != vault.mint {
            return Err(VaultError::InvalidTokenMint);
        }
        if balance < amount {
            return Err(VaultError::InsufficientFunds);
        }
        Ok(())
    }

    /// Pre-flight for `action`; only `Transfer` depends on the supplied accounts.
    pub fn check(&self, action: &GovernanceAction, vault: &Vault) -> Result<(), VaultError> {
        match *action {
            GovernanceAction::Transfer {
                destination,
                amount,
            } => self.check_transfer(vault, &destination, amount),
            _ => Ok(()),
        }
    }
}
