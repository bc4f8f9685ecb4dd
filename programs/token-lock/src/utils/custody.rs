use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::error::{VestingError, VestingResult};
use crate::state::Settlement;

/// CPI transfer out of a token account whose authority is the `ledger_state` PDA.
pub fn release_from_custody<'info>(
    token_program: AccountInfo<'info>,
    source: AccountInfo<'info>,
    destination: AccountInfo<'info>,
    ledger_state: AccountInfo<'info>,
    ledger_bump: u8,
    amount: u64,
) -> Result<()> {
    let signer_seeds: &[&[&[u8]]] = &[&[b"ledger_state", &[ledger_bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            token_program,
            Transfer {
                from: source,
                to: destination,
                authority: ledger_state,
            },
            signer_seeds,
        ),
        amount,
    )
}

/// True if `info` is a writable SPL token account of `mint` owned by `wallet`.
pub fn is_destination_for(info: &AccountInfo, wallet: &Pubkey, mint: &Pubkey) -> bool {
    if info.owner != &token::ID || !info.is_writable {
        return false;
    }
    let Ok(data) = info.try_borrow_data() else {
        return false;
    };
    match TokenAccount::try_deserialize(&mut &data[..]) {
        Ok(account) => account.owner == *wallet && account.mint == *mint,
        Err(_) => false,
    }
}

/// Pair each settlement with a destination from `candidates`, in order.
///
/// Fails with `PartialSettlementFailure` if any settlement has no destination,
/// before a single transfer is issued.
pub fn match_destinations<'a, 'info>(
    settlements: &[Settlement],
    candidates: &'a [AccountInfo<'info>],
    mint: &Pubkey,
) -> VestingResult<Vec<&'a AccountInfo<'info>>> {
    settlements
        .iter()
        .map(|s| {
            candidates
                .iter()
                .find(|info| is_destination_for(info, &s.wallet, mint))
                .ok_or(VestingError::PartialSettlementFailure)
        })
        .collect()
}
