use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LOG_PREFIX;
use crate::error::VestingError;
use crate::state::{LedgerState, Registry};
use crate::utils::custody;

/// Settle every recipient's withdrawable amount.
///
/// `remaining_accounts` must carry one writable token account of the vesting
/// mint for each recipient with something matured. A missing destination fails
/// with `PartialSettlementFailure` before any transfer; a failing transfer
/// aborts the transaction. Either way nothing is settled.
pub fn withdraw_all_matured<'info>(
    ctx: Context<'_, '_, 'info, 'info, WithdrawAllMatured<'info>>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let custody_balance = ctx.accounts.vault.amount;
    let ledger_state_ai = ctx.accounts.ledger_state.to_account_info();
    let token_program_ai = ctx.accounts.token_program.to_account_info();
    let vault_ai = ctx.accounts.vault.to_account_info();

    let st = &mut ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;
    st.begin_settlement()?;

    let settlements = ctx
        .accounts
        .registry
        .withdraw_all_matured(st, &cap, custody_balance, now)?;
    let destinations =
        custody::match_destinations(&settlements, ctx.remaining_accounts, &st.mint)?;
    let bump = st.bump;

    // Persist the settled ledger and the held flag before any outbound transfer.
    ctx.accounts.ledger_state.exit(&crate::ID)?;
    ctx.accounts.registry.exit(&crate::ID)?;

    let mut settled_total: u64 = 0;
    for (s, destination) in settlements.iter().zip(destinations) {
        custody::release_from_custody(
            token_program_ai.clone(),
            vault_ai.clone(),
            destination.clone(),
            ledger_state_ai.clone(),
            bump,
            s.amount,
        )
        .map_err(|_| VestingError::PartialSettlementFailure)?;

        settled_total = settled_total
            .checked_add(s.amount)
            .ok_or(VestingError::ArithmeticOverflow)?;

        emit!(MaturedSettled {
            recipient: s.wallet,
            amount: s.amount,
            withdrawn_total: ctx.accounts.registry.withdrawn_total(&s.wallet),
        });
    }
    let st = &mut ctx.accounts.ledger_state;
    st.end_settlement();

    msg!(
        "{} withdraw_all_matured recipients={} settled={} outstanding={}",
        LOG_PREFIX,
        settlements.len(),
        settled_total,
        st.total_outstanding
    );

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawAllMatured<'info> {
    #[account(mut, seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        mut,
        seeds = [b"registry", ledger_state.key().as_ref()],
        bump
    )]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        mut,
        address = ledger_state.vault @ VestingError::InvalidTokenAccount,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct MaturedSettled {
    pub recipient: Pubkey,
    pub amount: u64,
    pub withdrawn_total: u64,
}
