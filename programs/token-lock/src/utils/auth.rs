use anchor_lang::prelude::*;

/// Proof that a privileged operation was requested by the ledger administrator.
///
/// Only [`crate::state::LedgerState::admin_capability`] can issue one, so any
/// core operation taking `&AdminCapability` has already passed the admin check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdminCapability {
    admin: Pubkey,
}

impl AdminCapability {
    pub(crate) fn issue(admin: Pubkey) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> Pubkey {
        self.admin
    }
}
