use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::error::VestingError;
use crate::state::LedgerState;
use crate::utils::custody;

/// Forward tokens of any mint other than the vesting mint to the admin.
pub fn reclaim_foreign_asset(ctx: Context<ReclaimForeignAsset>, amount: u64) -> Result<()> {
    let st = &ctx.accounts.ledger_state;
    let cap = st.admin_capability(&ctx.accounts.admin.key())?;
    let asset_mint = ctx.accounts.foreign_source.mint;
    st.check_foreign_reclaim(&cap, &asset_mint)?;

    require_keys_eq!(
        ctx.accounts.foreign_source.owner,
        st.key(),
        VestingError::InvalidTokenAccount
    );

    custody::release_from_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.foreign_source.to_account_info(),
        ctx.accounts.admin_destination.to_account_info(),
        st.to_account_info(),
        st.bump,
        amount,
    )?;

    emit!(ForeignAssetReclaimed {
        admin: st.admin,
        asset_mint,
        amount,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ReclaimForeignAsset<'info> {
    #[account(seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    /// Token account held by the ledger PDA.
    #[account(mut)]
    pub foreign_source: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = admin_destination.mint == foreign_source.mint @ VestingError::InvalidTokenMint,
        constraint = admin_destination.owner == admin.key() @ VestingError::InvalidTokenAccount,
    )]
    pub admin_destination: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ForeignAssetReclaimed {
    pub admin: Pubkey,
    pub asset_mint: Pubkey,
    pub amount: u64,
}
