use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::VAULT_SEED;

/// SPL transfer out of a vault-owned token account, signed by the vault PDA.
pub fn vault_transfer<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    mint: Pubkey,
    vault_bump: u8,
    amount: u64,
) -> Result<()> {
    let bump = [vault_bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, mint.as_ref(), &bump];
    token::transfer(
        CpiContext::new_with_signer(
            token_program,
            Transfer {
                from,
                to,
                authority: vault,
            },
            &[seeds],
        ),
        amount,
    )
}
