use anchor_lang::prelude::*;
use std::result::Result;

use crate::error::VaultError;
use crate::utils::time;

/// Locked allocation unlocking linearly over `[start_ts, start_ts + duration]`.
/// Seeds: [b"vesting", vault, id.to_le_bytes()]
#[account]
pub struct VestingSchedule {
    /// Owning vault.
    pub vault: Pubkey,
    /// Caller-chosen id, unique per vault.
    pub id: u64,
    /// Only identity allowed to claim.
    pub beneficiary: Pubkey,
    /// Amount moved into escrow at creation.
    pub total: u64,
    /// Unlock start (Unix seconds).
    pub start_ts: i64,
    /// Unlock duration in seconds (> 0).
    pub duration: u64,
    /// Sum of all claims (and of the cancel-time settlement, if any).
    pub claimed: u64,
    /// Blocks claims; reversible. Accrual continues while paused.
    pub paused: bool,
    /// One-way; no claims after cancellation.
    pub cancelled: bool,
    /// Amount returned to the treasury on cancellation.
    pub released_to_treasury: u64,
    pub bump: u8,
}

impl VestingSchedule {
    pub const SIZE: usize =
        32 + // vault
        8 +  // id
        32 + // beneficiary
        8 +  // total
        8 +  // start_ts
        8 +  // duration
        8 +  // claimed
        1 +  // paused
        1 +  // cancelled
        8 +  // released_to_treasury
        1;   // bump

    /// A zeroed account (fresh from `init_if_needed`) has no beneficiary.
    pub fn is_initialized(&self) -> bool {
        self.beneficiary != Pubkey::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn open(
        &mut self,
        vault: Pubkey,
        id: u64,
        beneficiary: Pubkey,
        total: u64,
        start_ts: i64,
        duration: u64,
        bump: u8,
    ) -> Result<(), VaultError> {
        if self.is_initialized() {
            return Err(VaultError::DuplicateId);
        }
        if total == 0 {
            return Err(VaultError::InvalidAmount);
        }
        if duration == 0 {
            return Err(VaultError::InvalidDuration);
        }
        // Reject schedules whose end is not representable.
        time::vesting_end(start_ts, duration)?;

        self.vault = vault;
        self.id = id;
        self.beneficiary = beneficiary;
        self.total = total;
        self.start_ts = start_ts;
        self.duration = duration;
        self.claimed = 0;
        self.paused = false;
        self.cancelled = false;
        self.released_to_treasury = 0;
        self.bump = bump;
        Ok(())
    }

    /// The funding source must cover `total` before it moves into escrow.
    pub fn ensure_funded(&self, available: u64) -> Result<(), VaultError> {
        if available < self.total {
            return Err(VaultError::InsufficientFunds);
        }
        Ok(())
    }

    pub fn vested(&self, now_ts: i64) -> Result<u64, VaultError> {
        time::linear_vested(self.total, self.start_ts, self.duration, now_ts)
    }

    /// Vested but not yet claimed; zero once cancelled.
    pub fn claimable(&self, now_ts: i64) -> Result<u64, VaultError> {
        if self.cancelled {
            return Ok(0);
        }
        self.vested(now_ts)?
            .checked_sub(self.claimed)
            .ok_or(VaultError::MathOverflow)
    }

    /// Advance `claimed` to `vested(now)` and return the amount to pay out.
    pub fn claim(&mut self, caller: &Pubkey, now_ts: i64) -> Result<u64, VaultError> {
        if *caller != self.beneficiary {
            return Err(VaultError::NotBeneficiary);
        }
        if self.paused {
            return Err(VaultError::VestingPaused);
        }
        if self.cancelled {
            return Err(VaultError::VestingCancelled);
        }
        let amount = self.claimable(now_ts)?;
        if amount == 0 {
            return Err(VaultError::NothingToClaim);
        }
        self.claimed = self
            .claimed
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(amount)
    }

    /// Returns whether the flag changed.
    pub fn set_paused(&mut self, paused: bool) -> Result<bool, VaultError> {
        if self.cancelled {
            return Err(VaultError::VestingCancelled);
        }
        let changed = self.paused != paused;
        self.paused = paused;
        Ok(changed)
    }

    /// Terminate the schedule and split the unclaimed remainder.
    ///
    /// Unvested funds always return to the treasury. Vested-but-unclaimed funds go to
    /// the beneficiary unless `forfeit_vested` is set, in which case they return too.
    pub fn cancel(
        &mut self,
        now_ts: i64,
        forfeit_vested: bool,
    ) -> Result<CancelSettlement, VaultError> {
        if self.cancelled {
            return Err(VaultError::VestingCancelled);
        }
        let vested = self.vested(now_ts)?;
        let unclaimed_vested = vested
            .checked_sub(self.claimed)
            .ok_or(VaultError::MathOverflow)?;
        let unvested = self
            .total
            .checked_sub(vested)
            .ok_or(VaultError::MathOverflow)?;

        let settlement = if forfeit_vested {
            CancelSettlement {
                to_beneficiary: 0,
                to_treasury: unvested
                    .checked_add(unclaimed_vested)
                    .ok_or(VaultError::MathOverflow)?,
            }
        } else {
            CancelSettlement {
                to_beneficiary: unclaimed_vested,
                to_treasury: unvested,
            }
        };

        self.claimed = self
            .claimed
            .checked_add(settlement.to_beneficiary)
            .ok_or(VaultError::MathOverflow)?;
        self.released_to_treasury = settlement.to_treasury;
        self.cancelled = true;
        Ok(settlement)
    }
}

/// Escrow outflows produced by cancelling a schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CancelSettlement {
    pub to_beneficiary: u64,
    pub to_treasury: u64,
}

impl CancelSettlement {
    pub fn total(&self) -> Result<u64, VaultError> {
        self.to_beneficiary
            .checked_add(self.to_treasury)
            .ok_or(VaultError::MathOverflow)
    }
}
