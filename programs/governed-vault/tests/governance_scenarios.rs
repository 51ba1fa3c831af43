//! End-to-end governance flows over the program's state transitions, without a validator.

use anchor_lang::prelude::Pubkey;
use governed_vault::error::VaultError;
use governed_vault::governance::{DestinationAccount, Outcome, SettlementAccounts};
use governed_vault::state::{Proposal, Vault, VestingSchedule};
use governed_vault::{GovernanceAction, RemovalPolicy, VestingOp};

fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

fn new_vault(principals: &[u8], threshold: u8) -> Vault {
    let mut vault = Vault {
        mint: key(200),
        treasury: key(201),
        escrow: key(202),
        principals: Vec::new(),
        threshold: 0,
        removal_policy: RemovalPolicy::ClampThreshold,
        next_nonce: 0,
        vesting_locked: 0,
        bump: 255,
        treasury_bump: 254,
        escrow_bump: 253,
    };
    vault
        .configure(
            principals.iter().copied().map(key).collect(),
            threshold,
            RemovalPolicy::ClampThreshold,
        )
        .unwrap();
    vault
}

fn blank_proposal() -> Proposal {
    Proposal {
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
    }
}

fn blank_schedule() -> VestingSchedule {
    VestingSchedule {
        vault: Pubkey::default(),
        id: 0,
        beneficiary: Pubkey::default(),
        total: 0,
        start_ts: 0,
        duration: 0,
        claimed: 0,
        paused: false,
        cancelled: false,
        released_to_treasury: 0,
        bump: 0,
    }
}

/// Execute with no token accounts supplied; enough for non-transfer actions.
fn execute(
    proposal: &mut Proposal,
    vault: &mut Vault,
    vesting: Option<&mut VestingSchedule>,
    now: i64,
) -> Result<Outcome, VaultError> {
    proposal
        .execute(vault, vesting, &SettlementAccounts::default(), now)
        .map(|(outcome, _)| outcome)
}

fn open_vesting(vault: &mut Vault, beneficiary: Pubkey, total: u64) -> VestingSchedule {
    let mut s = blank_schedule();
    s.open(key(77), 1, beneficiary, total, 0, 100, 250).unwrap();
    vault.lock_vesting(total).unwrap();
    s
}

#[test]
fn add_principal_with_two_of_three() {
    let mut vault = new_vault(&[1, 2, 3], 2);
    let mut p = blank_proposal();
    let action = GovernanceAction::AddPrincipal { principal: key(4) };
    p.open(key(77), &mut vault, key(1), action, 10, 0).unwrap();

    p.sign(&vault, key(1)).unwrap();
    assert!(!p.can_execute(&vault));
    p.sign(&vault, key(2)).unwrap();
    assert!(p.can_execute(&vault));

    let outcome = execute(&mut p, &mut vault, None, 20).unwrap();
    assert_eq!(outcome, Outcome::PrincipalAdded { principal: key(4) });
    assert_eq!(vault.principals, vec![key(1), key(2), key(3), key(4)]);
    assert!(p.executed);

    assert!(matches!(
        execute(&mut p, &mut vault, None, 30),
        Err(VaultError::AlreadyExecuted)
    ));
    assert_eq!(vault.principals.len(), 4);
}

#[test]
fn single_approval_is_below_threshold() {
    let mut vault = new_vault(&[1, 2, 3], 2);
    let mut p = blank_proposal();
    let action = GovernanceAction::RemovePrincipal { principal: key(1) };
    p.open(key(77), &mut vault, key(3), action, 10, 0).unwrap();
    p.sign(&vault, key(3)).unwrap();

    assert!(matches!(
        execute(&mut p, &mut vault, None, 20),
        Err(VaultError::ThresholdNotMet)
    ));
    assert!(!p.executed);
    assert!(vault.is_principal(&key(1)));
}

#[test]
fn removal_clamps_threshold_and_invalidates_stale_approvals() {
    let mut vault = new_vault(&[1, 2, 3], 3);

    let mut pending = blank_proposal();
    let bump_threshold = GovernanceAction::ChangeThreshold { threshold: 2 };
    pending
        .open(key(77), &mut vault, key(1), bump_threshold, 0, 0)
        .unwrap();
    pending.sign(&vault, key(3)).unwrap();

    let mut removal = blank_proposal();
    let remove = GovernanceAction::RemovePrincipal { principal: key(3) };
    removal.open(key(77), &mut vault, key(1), remove, 0, 0).unwrap();
    for n in [1, 2, 3] {
        removal.sign(&vault, key(n)).unwrap();
    }
    let outcome = execute(&mut removal, &mut vault, None, 5).unwrap();
    assert_eq!(
        outcome,
        Outcome::PrincipalRemoved {
            principal: key(3),
            clamped_from: Some(3),
        }
    );
    assert_eq!(vault.threshold, 2);
    assert_ne!(pending.nonce, removal.nonce);

    // key(3) no longer counts toward the earlier proposal
    pending.sign(&vault, key(1)).unwrap();
    assert_eq!(pending.approval_count(&vault), 1);
    assert!(matches!(
        execute(&mut pending, &mut vault, None, 6),
        Err(VaultError::ThresholdNotMet)
    ));
}

#[test]
fn strict_policy_requires_threshold_change_first() {
    let mut vault = new_vault(&[1, 2], 2);
    vault.removal_policy = RemovalPolicy::RejectBelowThreshold;

    let mut p = blank_proposal();
    let remove = GovernanceAction::RemovePrincipal { principal: key(2) };
    p.open(key(77), &mut vault, key(1), remove, 0, 0).unwrap();
    p.sign(&vault, key(1)).unwrap();
    p.sign(&vault, key(2)).unwrap();
    assert!(matches!(
        execute(&mut p, &mut vault, None, 1),
        Err(VaultError::ThresholdReductionRequired)
    ));
    assert!(!p.executed);
    assert_eq!(vault.principals.len(), 2);
}

#[test]
fn vesting_claims_follow_the_unlock_curve() {
    let mut vault = new_vault(&[1, 2], 1);
    let b = key(9);
    let mut s = open_vesting(&mut vault, b, 1_000);

    assert_eq!(s.vested(50).unwrap(), 500);
    let paid = s.claim(&b, 50).unwrap();
    vault.release_vesting(paid).unwrap();
    assert_eq!(paid, 500);
    assert_eq!(s.claimed, 500);

    let paid = s.claim(&b, 100).unwrap();
    vault.release_vesting(paid).unwrap();
    assert_eq!(paid, 500);
    assert_eq!(s.claimed, 1_000);
    assert_eq!(vault.vesting_locked, 0);
    assert!(matches!(s.claim(&b, 100), Err(VaultError::NothingToClaim)));
}

#[test]
fn governance_pause_and_unpause_gate_claims() {
    let mut vault = new_vault(&[1, 2], 1);
    let b = key(9);
    let mut s = open_vesting(&mut vault, b, 1_000);
    assert_eq!(s.claim(&b, 50).unwrap(), 500);

    let control = |op| GovernanceAction::VestingControl { vesting_id: 1, op };

    let mut pause = blank_proposal();
    pause
        .open(key(77), &mut vault, key(1), control(VestingOp::Pause), 50, 0)
        .unwrap();
    pause.sign(&vault, key(1)).unwrap();
    execute(&mut pause, &mut vault, Some(&mut s), 50).unwrap();
    assert!(matches!(s.claim(&b, 60), Err(VaultError::VestingPaused)));

    let mut unpause = blank_proposal();
    unpause
        .open(key(77), &mut vault, key(2), control(VestingOp::Unpause), 70, 0)
        .unwrap();
    unpause.sign(&vault, key(2)).unwrap();
    let outcome = execute(&mut unpause, &mut vault, Some(&mut s), 70).unwrap();
    assert_eq!(
        outcome,
        Outcome::VestingPauseSet {
            vesting_id: 1,
            paused: false,
            changed: true,
        }
    );

    assert_eq!(s.claim(&b, 100).unwrap(), 500);
    assert_eq!(s.claimed, 1_000);
}

#[test]
fn cancel_through_governance_settles_escrow() {
    let mut vault = new_vault(&[1, 2], 2);
    let b = key(9);
    let mut s = open_vesting(&mut vault, b, 1_000);
    vault.release_vesting(s.claim(&b, 25).unwrap()).unwrap();

    let mut p = blank_proposal();
    let cancel = GovernanceAction::VestingControl {
        vesting_id: 1,
        op: VestingOp::Cancel {
            forfeit_vested: false,
        },
    };
    p.open(key(77), &mut vault, key(1), cancel, 30, 0).unwrap();
    p.sign(&vault, key(1)).unwrap();
    p.sign(&vault, key(2)).unwrap();

    let outcome = execute(&mut p, &mut vault, Some(&mut s), 60).unwrap();
    match outcome {
        Outcome::VestingCancelled {
            beneficiary,
            settlement,
            ..
        } => {
            assert_eq!(beneficiary, b);
            assert_eq!(settlement.to_beneficiary, 350);
            assert_eq!(settlement.to_treasury, 400);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(s.cancelled);
    assert_eq!(vault.vesting_locked, 0);
    assert!(matches!(s.claim(&b, 100), Err(VaultError::VestingCancelled)));
}

#[test]
fn vesting_control_needs_the_matching_schedule() {
    let mut vault = new_vault(&[1], 1);
    let mut s = open_vesting(&mut vault, key(9), 1_000);

    let mut p = blank_proposal();
    let pause = GovernanceAction::VestingControl {
        vesting_id: 2,
        op: VestingOp::Pause,
    };
    p.open(key(77), &mut vault, key(1), pause, 0, 0).unwrap();
    p.sign(&vault, key(1)).unwrap();

    assert!(matches!(
        execute(&mut p, &mut vault, Some(&mut s), 1),
        Err(VaultError::UnknownVesting)
    ));
    assert!(matches!(
        execute(&mut p, &mut vault, None, 1),
        Err(VaultError::UnknownVesting)
    ));
    assert!(!p.executed);
    assert!(!s.paused);
}

#[test]
fn treasury_transfer_checks_accounts_before_executing() {
    let mut vault = new_vault(&[1, 2], 2);
    let mut p = blank_proposal();
    let transfer = GovernanceAction::Transfer {
        destination: key(9),
        amount: 1_000,
    };
    p.open(key(77), &mut vault, key(1), transfer, 0, 0).unwrap();
    p.sign(&vault, key(1)).unwrap();
    p.sign(&vault, key(2)).unwrap();

    assert!(matches!(
        execute(&mut p, &mut vault, None, 1),
        Err(VaultError::MissingAccount)
    ));

    let accounts = SettlementAccounts {
        treasury_balance: Some(999),
        destination: Some(DestinationAccount {
            key: key(9),
            mint: vault.mint,
            owner: key(3),
        }),
    };
    assert!(matches!(
        p.execute(&mut vault, None, &accounts, 1),
        Err(VaultError::InsufficientFunds)
    ));
    assert!(!p.executed);

    let funded = SettlementAccounts {
        treasury_balance: Some(1_000),
        ..accounts
    };
    let (outcome, approvals) = p.execute(&mut vault, None, &funded, 2).unwrap();
    assert_eq!(approvals, 2);
    assert_eq!(
        outcome,
        Outcome::Transfer {
            destination: key(9),
            amount: 1_000,
        }
    );
    assert!(p.executed);
}
