pub mod initialize_vault;
pub mod deposit_tokens;
pub mod propose;
pub mod sign_proposal;
pub mod execute_proposal;
pub mod create_vesting;
pub mod claim_vesting;
pub mod emit_vesting_quote;
pub mod emit_proposal_status;

pub use initialize_vault::*;
pub use deposit_tokens::*;
pub use propose::*;
pub use sign_proposal::*;
pub use execute_proposal::*;
pub use create_vesting::*;
pub use claim_vesting::*;
pub use emit_vesting_quote::*;
pub use emit_proposal_status::*;
