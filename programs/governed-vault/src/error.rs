use anchor_lang::prelude::*;

/// Custom error codes for the governed vault program.
#[error_code]
pub enum VaultError {
    #[msg("Not authorized: signer is not a current principal")]
    NotAuthorized,

    #[msg("Unknown proposal")]
    UnknownProposal,

    #[msg("Unknown vesting schedule")]
    UnknownVesting,

    #[msg("Proposal has already been executed")]
    AlreadyExecuted,

    #[msg("Approval threshold not met")]
    ThresholdNotMet,

    #[msg("Proposal digest does not match the approved digest")]
    DigestMismatch,

    #[msg("Proposal approval list is full")]
    ApprovalListFull,

    #[msg("Invalid threshold (must be within 1..=principal count)")]
    InvalidThreshold,

    #[msg("Principal set must not be empty")]
    EmptyPrincipalSet,

    #[msg("Principal set is full")]
    PrincipalSetFull,

    #[msg("Invalid principal public key")]
    InvalidPrincipal,

    #[msg("Duplicate principal")]
    DuplicatePrincipal,

    #[msg("Identity is already a principal")]
    AlreadyPrincipal,

    #[msg("Identity is not a principal")]
    NotPrincipal,

    #[msg("Cannot remove the last principal")]
    LastPrincipal,

    #[msg("Removal would lower the threshold; change the threshold first")]
    ThresholdReductionRequired,

    #[msg("Invalid amount (must be > 0)")]
    InvalidAmount,

    #[msg("Transfer destination is a vault-owned account")]
    SelfTransfer,

    #[msg("Insufficient funds")]
    InsufficientFunds,

    #[msg("Vesting id already exists")]
    DuplicateId,

    #[msg("Invalid vesting duration (must be > 0)")]
    InvalidDuration,

    #[msg("Caller is not the vesting beneficiary")]
    NotBeneficiary,

    #[msg("Vesting schedule is paused")]
    VestingPaused,

    #[msg("Vesting schedule is cancelled")]
    VestingCancelled,

    #[msg("Nothing to claim")]
    NothingToClaim,

    #[msg("Required account for this action was not supplied")]
    MissingAccount,

    #[msg("Destination account does not match the proposal")]
    InvalidDestination,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}
