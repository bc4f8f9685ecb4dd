use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::state::{LedgerState, Registry};

pub fn initialize_ledger(ctx: Context<InitializeLedger>) -> Result<()> {
    let ledger_state_key = ctx.accounts.ledger_state.key();
    let admin = ctx.accounts.admin.key();
    let mint = ctx.accounts.mint.key();
    let vault = ctx.accounts.vault.key();

    ctx.accounts.ledger_state.set_inner(LedgerState::new(
        admin,
        mint,
        vault,
        ctx.bumps.ledger_state,
        ctx.bumps.vault,
    ));
    ctx.accounts.registry.set_inner(Registry::new(ledger_state_key));

    emit!(LedgerInitialized { admin, mint, vault });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + LedgerState::SIZE,
        seeds = [b"ledger_state"],
        bump
    )]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(
        init,
        payer = admin,
        space = Registry::space(),
        seeds = [b"registry", ledger_state.key().as_ref()],
        bump
    )]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        init,
        payer = admin,
        token::mint = mint,
        token::authority = ledger_state,
        seeds = [b"vault", ledger_state.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct LedgerInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
}
