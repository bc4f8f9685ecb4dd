use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LOG_PREFIX;
use crate::error::VestingError;
use crate::state::LedgerState;
use crate::utils::custody;

/// Pull back vesting tokens deposited before activation. No obligation is preserved.
pub fn reclaim_pre_activation_deposit(ctx: Context<ReclaimCustody>, amount: u64) -> Result<()> {
    let custody_balance = ctx.accounts.vault.amount;
    let st = &ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;
    st.check_pre_activation_reclaim(&cap, custody_balance, amount)?;

    release(&ctx, amount)?;
    emit!(CustodyReclaimed {
        admin: st.admin,
        amount,
        pre_activation: true,
        total_outstanding: st.total_outstanding,
    });
    Ok(())
}

/// Reclaim custody held above `total_outstanding` once vesting is in force.
pub fn reclaim_excess_custody(ctx: Context<ReclaimCustody>, amount: u64) -> Result<()> {
    let custody_balance = ctx.accounts.vault.amount;
    let st = &ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;
    st.check_excess_reclaim(&cap, custody_balance, amount)?;

    release(&ctx, amount)?;
    msg!(
        "{} reclaim_excess amount={} outstanding={}",
        LOG_PREFIX,
        amount,
        st.total_outstanding
    );
    emit!(CustodyReclaimed {
        admin: st.admin,
        amount,
        pre_activation: false,
        total_outstanding: st.total_outstanding,
    });
    Ok(())
}

fn release(ctx: &Context<ReclaimCustody>, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    custody::release_from_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.admin_destination.to_account_info(),
        ctx.accounts.ledger_state.to_account_info(),
        ctx.accounts.ledger_state.bump,
        amount,
    )
}

#[derive(Accounts)]
pub struct ReclaimCustody<'info> {
    #[account(seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        mut,
        address = ledger_state.vault @ VestingError::InvalidTokenAccount,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = admin_destination.mint == ledger_state.mint @ VestingError::InvalidTokenMint,
        constraint = admin_destination.owner == admin.key() @ VestingError::InvalidTokenAccount,
    )]
    pub admin_destination: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct CustodyReclaimed {
    pub admin: Pubkey,
    pub amount: u64,
    pub pre_activation: bool,
    pub total_outstanding: u64,
}
