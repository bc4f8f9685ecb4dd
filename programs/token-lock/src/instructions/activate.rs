use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::LOG_PREFIX;
use crate::error::VestingError;
use crate::state::{LedgerState, Registry};

pub fn activate(ctx: Context<Activate>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let custody = ctx.accounts.vault.amount;
    let digest = ctx.accounts.registry.schedule_digest();

    let st = &mut ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;
    st.activate(&cap, custody, now, digest)?;

    msg!(
        "{} lockup activated_at={} outstanding={} custody={}",
        LOG_PREFIX,
        now,
        st.total_outstanding,
        custody
    );
    emit!(LedgerActivated {
        activated_at: now,
        total_outstanding: st.total_outstanding,
        custody_balance: custody,
        schedule_digest: digest,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Activate<'info> {
    #[account(mut, seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        seeds = [b"registry", ledger_state.key().as_ref()],
        bump
    )]
    pub registry: Box<Account<'info, Registry>>,

    #[account(address = ledger_state.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,
}

#[event]
pub struct LedgerActivated {
    pub activated_at: i64,
    pub total_outstanding: u64,
    pub custody_balance: u64,
    pub schedule_digest: [u8; 32],
}
