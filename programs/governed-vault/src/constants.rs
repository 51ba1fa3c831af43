//! Program-wide constants.

/// Max principals a vault may hold.
pub const MAX_PRINCIPALS: usize = 10;

/// Max approvals stored per proposal (current principals plus stale entries
/// from principals removed while the proposal was pending).
pub const MAX_APPROVALS: usize = MAX_PRINCIPALS * 2;

pub const VAULT_SEED: &[u8] = b"vault";
pub const TREASURY_SEED: &[u8] = b"treasury";
pub const ESCROW_SEED: &[u8] = b"escrow";
pub const PROPOSAL_SEED: &[u8] = b"proposal";
pub const VESTING_SEED: &[u8] = b"vesting";
