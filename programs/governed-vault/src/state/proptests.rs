//! Property-based tests for the vesting ledger and proposal approvals
//!
//! - Unlock curve: zero before start, total after end, monotonic in time
//! - Claims: claimed never exceeds vested(now) or total, whatever the call sequence
//! - Approvals: re-signing never increases the count

use super::{Proposal, RemovalPolicy, Vault, VestingSchedule};
use crate::governance::GovernanceAction;
use anchor_lang::prelude::Pubkey;
use proptest::prelude::*;

fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

fn schedule(total: u64, start_ts: i64, duration: u64) -> VestingSchedule {
    VestingSchedule {
        vault: key(200),
        id: 1,
        beneficiary: key(1),
        total,
        start_ts,
        duration,
        claimed: 0,
        paused: false,
        cancelled: false,
        released_to_treasury: 0,
        bump: 0,
    }
}

proptest! {
    /// Property: vested(now) is 0 at or before start, total at or after the end,
    /// never above total, and non-decreasing in now
    #[test]
    fn vested_curve_bounds_and_monotonicity(
        total in any::<u64>(),
        start_ts in -1_000_000i64..1_000_000,
        duration in 1u64..5_000_000,
        a in -2_000_000i64..8_000_000,
        b in -2_000_000i64..8_000_000,
    ) {
        let s = schedule(total, start_ts, duration);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let v_lo = s.vested(lo).unwrap();
        let v_hi = s.vested(hi).unwrap();

        prop_assert!(v_lo <= v_hi, "vested must be monotonic");
        prop_assert!(v_hi <= total);
        prop_assert_eq!(s.vested(start_ts).unwrap(), 0);
        prop_assert_eq!(s.vested(start_ts + duration as i64).unwrap(), total);
    }

    /// Property: any sequence of claims keeps claimed <= vested(now) <= total and
    /// pays out exactly vested(last) in aggregate
    #[test]
    fn claims_never_exceed_vested(
        total in 1u64..1_000_000_000_000,
        duration in 1u64..1_000_000,
        mut times in prop::collection::vec(0i64..2_000_000, 1..20),
    ) {
        times.sort_unstable();
        let mut s = schedule(total, 0, duration);
        let mut paid: u64 = 0;
        for now in &times {
            if let Ok(amount) = s.claim(&key(1), *now) {
                paid += amount;
            }
            let vested = s.vested(*now).unwrap();
            prop_assert!(s.claimed <= vested);
            prop_assert!(vested <= total);
        }
        let last = *times.last().unwrap();
        prop_assert_eq!(paid, s.vested(last).unwrap());
        prop_assert_eq!(paid, s.claimed);
    }

    /// Property: cancellation splits exactly the unclaimed remainder
    #[test]
    fn cancel_conserves_funds(
        total in 1u64..1_000_000_000,
        duration in 1u64..100_000,
        claim_at in 0i64..200_000,
        cancel_after in 0i64..200_000,
        forfeit in any::<bool>(),
    ) {
        let mut s = schedule(total, 0, duration);
        let _ = s.claim(&key(1), claim_at);
        let claimed_before = s.claimed;
        let out = s.cancel(claim_at + cancel_after, forfeit).unwrap();

        prop_assert_eq!(out.to_beneficiary + out.to_treasury + claimed_before, total);
        prop_assert!(s.claimed <= s.vested(claim_at + cancel_after).unwrap());
        if forfeit {
            prop_assert_eq!(out.to_beneficiary, 0);
        }
    }

    /// Property: re-signing by the same identity never increases the approval count
    #[test]
    fn resigning_is_idempotent(
        signers in prop::collection::vec(1u8..=5, 1..30),
    ) {
        let mut vault = Vault {
            mint: key(200),
            treasury: key(201),
            escrow: key(202),
            principals: Vec::new(),
            threshold: 0,
            removal_policy: RemovalPolicy::ClampThreshold,
            next_nonce: 0,
            vesting_locked: 0,
            bump: 0,
            treasury_bump: 0,
            escrow_bump: 0,
        };
        vault
            .configure((1..=5).map(key).collect(), 3, RemovalPolicy::ClampThreshold)
            .unwrap();
        let mut p = Proposal {
            vault: Pubkey::default(),
            nonce: 0,
            proposer: Pubkey::default(),
            action: GovernanceAction::ChangeThreshold { threshold: 1 },
            digest: [0u8; 32],
            approvals: Vec::new(),
            executed: false,
            created_at: 0,
            executed_at: 0,
            bump: 0,
        };
        p.open(key(250), &mut vault, key(1), GovernanceAction::ChangeThreshold { threshold: 2 }, 0, 0)
            .unwrap();

        let mut distinct = std::collections::BTreeSet::new();
        for n in &signers {
            let added = p.sign(&vault, key(*n)).unwrap();
            prop_assert_eq!(added, distinct.insert(*n));
            prop_assert_eq!(p.approval_count(&vault), distinct.len());
        }
        prop_assert_eq!(p.can_execute(&vault), distinct.len() >= 3);
    }
}
