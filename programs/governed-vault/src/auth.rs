//! Authorization gate: k distinct valid approvals out of the current principal set.
//!
//! The gate is a pure predicate over the supplied approvals and a principal-set
//! snapshot. The signature scheme is pluggable through [`SignatureVerifier`]; on
//! chain, [`TransactionSigners`] accepts exactly the identities that signed the
//! enclosing transaction.

use std::collections::BTreeSet;

use anchor_lang::prelude::*;

pub trait SignatureVerifier {
    /// True iff `proof` is a valid signature by `identity` over `message`.
    fn verify(&self, identity: &Pubkey, message: &[u8], proof: &[u8]) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Approval {
    pub signer: Pubkey,
    pub proof: Vec<u8>,
}

impl Approval {
    pub fn new(signer: Pubkey, proof: Vec<u8>) -> Self {
        Self { signer, proof }
    }

    /// Approval whose proof is the transaction signature already checked by the runtime.
    pub fn signed(signer: Pubkey) -> Self {
        Self {
            signer,
            proof: Vec::new(),
        }
    }
}

/// Count approvals that come from a principal, verify over `message`, and are the
/// first valid approval from that identity.
pub fn count_valid_approvals<V: SignatureVerifier + ?Sized>(
    principals: &[Pubkey],
    approvals: &[Approval],
    message: &[u8],
    verifier: &V,
) -> usize {
    let members: BTreeSet<&Pubkey> = principals.iter().collect();
    let mut counted: BTreeSet<Pubkey> = BTreeSet::new();
    for approval in approvals {
        if !members.contains(&approval.signer) || counted.contains(&approval.signer) {
            continue;
        }
        if verifier.verify(&approval.signer, message, &approval.proof) {
            counted.insert(approval.signer);
        }
    }
    counted.len()
}

pub fn authorize<V: SignatureVerifier + ?Sized>(
    principals: &[Pubkey],
    threshold: u8,
    approvals: &[Approval],
    message: &[u8],
    verifier: &V,
) -> bool {
    count_valid_approvals(principals, approvals, message, verifier) >= threshold as usize
}

/// Distinct identities in `signers` that are members of `principals`.
///
/// Used to re-evaluate approvals recorded earlier against the principal set as it
/// stands now; identities removed since they signed no longer count.
pub fn tally<'a, I>(principals: &[Pubkey], signers: I) -> usize
where
    I: IntoIterator<Item = &'a Pubkey>,
{
    let members: BTreeSet<&Pubkey> = principals.iter().collect();
    signers
        .into_iter()
        .filter(|s| members.contains(s))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Verifier backed by the signer flags of the accounts passed to an instruction.
#[derive(Clone, Debug, Default)]
pub struct TransactionSigners {
    signers: BTreeSet<Pubkey>,
}

impl TransactionSigners {
    pub fn from_accounts(accounts: &[AccountInfo]) -> Self {
        Self {
            signers: accounts
                .iter()
                .filter(|a| a.is_signer)
                .map(|a| *a.key)
                .collect(),
        }
    }

    pub fn with(mut self, signer: Pubkey) -> Self {
        self.signers.insert(signer);
        self
    }

    pub fn contains(&self, identity: &Pubkey) -> bool {
        self.signers.contains(identity)
    }

    pub fn approvals(&self) -> Vec<Approval> {
        self.signers.iter().copied().map(Approval::signed).collect()
    }
}

impl SignatureVerifier for TransactionSigners {
    fn verify(&self, identity: &Pubkey, _message: &[u8], _proof: &[u8]) -> bool {
        // The runtime verified every transaction signature before dispatch, and the
        // message it signed carries the instruction data.
        self.contains(identity)
    }
}
