use anchor_lang::prelude::*;

use crate::state::{LedgerState, Registry};

pub fn register_schedule(
    ctx: Context<RegisterSchedule>,
    recipient: Pubkey,
    delays: Vec<u64>,
    amounts: Vec<u64>,
) -> Result<()> {
    let st = &mut ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;

    let added = ctx
        .accounts
        .registry
        .register_schedule(st, &cap, recipient, &delays, &amounts)?;

    emit!(SchedulesRegistered {
        recipients: vec![recipient],
        entries_added: amounts.len() as u32,
        amount_added: added,
        total_outstanding: st.total_outstanding,
    });

    Ok(())
}

pub fn register_schedules_bulk(
    ctx: Context<RegisterSchedule>,
    recipients: Vec<Pubkey>,
    delays: Vec<Vec<u64>>,
    amounts: Vec<Vec<u64>>,
) -> Result<()> {
    let st = &mut ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;

    let added = ctx
        .accounts
        .registry
        .register_schedules_bulk(st, &cap, &recipients, &delays, &amounts)?;

    emit!(SchedulesRegistered {
        entries_added: amounts.iter().map(|a| a.len() as u32).sum(),
        recipients,
        amount_added: added,
        total_outstanding: st.total_outstanding,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct RegisterSchedule<'info> {
    #[account(mut, seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        mut,
        seeds = [b"registry", ledger_state.key().as_ref()],
        bump
    )]
    pub registry: Box<Account<'info, Registry>>,

    pub admin: Signer<'info>,
}

#[event]
pub struct SchedulesRegistered {
    pub recipients: Vec<Pubkey>,
    pub entries_added: u32,
    pub amount_added: u64,
    pub total_outstanding: u64,
}
