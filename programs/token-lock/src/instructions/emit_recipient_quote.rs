use anchor_lang::prelude::*;

use crate::state::{LedgerState, Registry};

pub fn emit_recipient_quote(ctx: Context<EmitRecipientQuote>, recipient: Pubkey) -> Result<()> {
    let st = &ctx.accounts.ledger_state;
    let registry = &ctx.accounts.registry;
    let now = Clock::get()?.unix_timestamp;

    emit!(RecipientQuote {
        recipient,
        activated: st.is_activated(),
        unlocked_balance: registry.unlocked_balance(st, &recipient, now)?,
        withdrawable: registry.withdrawable(st, &recipient, now)?,
        remaining_balance: registry.remaining_balance(&recipient),
        withdrawn_total: registry.withdrawn_total(&recipient),
        schedule_length: registry.schedule_length(&recipient) as u32,
        total_outstanding: st.total_outstanding,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EmitRecipientQuote<'info> {
    #[account(seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        seeds = [b"registry", ledger_state.key().as_ref()],
        bump
    )]
    pub registry: Box<Account<'info, Registry>>,
}

#[event]
pub struct RecipientQuote {
    pub recipient: Pubkey,
    pub activated: bool,
    pub unlocked_balance: u64,
    pub withdrawable: u64,
    pub remaining_balance: u64,
    pub withdrawn_total: u64,
    pub schedule_length: u32,
    pub total_outstanding: u64,
}
