use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LOG_PREFIX;
use crate::error::{VestingError, VestingResult};
use crate::state::{LedgerState, Registry, Settlement};
use crate::utils::custody;

/// Withdraw matured tokens for `recipient`. Signed by the recipient or the admin.
pub fn withdraw(ctx: Context<Withdraw>, recipient: Pubkey, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let custody_balance = ctx.accounts.vault.amount;
    let ledger_state_ai = ctx.accounts.ledger_state.to_account_info();
    let requested_by = ctx.accounts.authority.key();

    let st = &mut ctx.accounts.ledger_state;
    st.begin_settlement()?;

    let destination_owner = ctx.accounts.recipient_token_account.owner;
    let settlement = settle_withdrawal(
        &mut ctx.accounts.registry,
        st,
        WithdrawalRequest {
            recipient,
            amount,
            requested_by,
            destination_owner,
        },
        custody_balance,
        now,
    )?;

    if settlement.amount > 0 {
        // Persist the settled ledger and the held flag before the outbound transfer.
        ctx.accounts.ledger_state.exit(&crate::ID)?;
        ctx.accounts.registry.exit(&crate::ID)?;

        custody::release_from_custody(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            ctx.accounts.recipient_token_account.to_account_info(),
            ledger_state_ai,
            ctx.accounts.ledger_state.bump,
            settlement.amount,
        )?;
    }
    let st = &mut ctx.accounts.ledger_state;
    st.end_settlement();

    let withdrawn_total = ctx.accounts.registry.withdrawn_total(&recipient);
    msg!(
        "{} withdraw recipient={} amount={} withdrawn_total={}",
        LOG_PREFIX,
        recipient,
        settlement.amount,
        withdrawn_total
    );
    emit!(TokensWithdrawn {
        recipient,
        requested_by,
        amount: settlement.amount,
        withdrawn_total,
        remaining_balance: ctx.accounts.registry.remaining_balance(&recipient),
        total_outstanding: st.total_outstanding,
    });

    Ok(())
}

pub struct WithdrawalRequest {
    pub recipient: Pubkey,
    pub amount: u64,
    pub requested_by: Pubkey,
    /// Owner of the token account the tokens would land in.
    pub destination_owner: Pubkey,
}

/// Ledger checks first, then the destination. Nothing changes on error.
pub fn settle_withdrawal(
    registry: &mut Registry,
    st: &mut LedgerState,
    req: WithdrawalRequest,
    custody_balance: u64,
    now: i64,
) -> VestingResult<Settlement> {
    let mut staged_registry = registry.clone();
    let mut staged_state = st.clone();
    let settlement = staged_registry.withdraw(
        &mut staged_state,
        req.recipient,
        req.amount,
        req.requested_by,
        custody_balance,
        now,
    )?;
    if req.destination_owner != req.recipient {
        return Err(VestingError::InvalidTokenAccount);
    }
    *registry = staged_registry;
    *st = staged_state;
    Ok(settlement)
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    #[account(
        mut,
        constraint = recipient_token_account.mint == ledger_state.mint @ VestingError::InvalidTokenMint,
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,

    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensWithdrawn {
    pub recipient: Pubkey,
    pub requested_by: Pubkey,
    pub amount: u64,
    pub withdrawn_total: u64,
    pub remaining_balance: u64,
    pub total_outstanding: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> (LedgerState, Registry, Pubkey, Pubkey) {
        let admin = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mut st = LedgerState::new(admin, Pubkey::new_unique(), Pubkey::new_unique(), 255, 254);
        let mut registry = Registry::new(Pubkey::new_unique());
        let cap = st.admin_capability(&admin).unwrap();
        registry.register_schedule(&mut st, &cap, wallet, &[0], &[10]).unwrap();
        (st, registry, admin, wallet)
    }

    fn request(wallet: Pubkey, destination_owner: Pubkey) -> WithdrawalRequest {
        WithdrawalRequest {
            recipient: wallet,
            amount: 10,
            requested_by: wallet,
            destination_owner,
        }
    }

    #[test]
    fn ledger_checks_precede_destination_check() {
        let (mut st, mut registry, _, wallet) = ledger();
        let stranger = Pubkey::new_unique();
        let r = settle_withdrawal(&mut registry, &mut st, request(wallet, stranger), 10, 0);
        assert!(matches!(r, Err(VestingError::NotActivated)));
    }

    #[test]
    fn mismatched_destination_leaves_ledger_untouched() {
        let (mut st, mut registry, admin, wallet) = ledger();
        let cap = st.admin_capability(&admin).unwrap();
        let digest = registry.schedule_digest();
        st.activate(&cap, 10, 1_000, digest).unwrap();

        let r = settle_withdrawal(&mut registry, &mut st, request(wallet, Pubkey::new_unique()), 10, 1_000);
        assert!(matches!(r, Err(VestingError::InvalidTokenAccount)));
        assert_eq!(registry.withdrawn_total(&wallet), 0);
        assert_eq!(st.total_outstanding, 10);

        let s = settle_withdrawal(&mut registry, &mut st, request(wallet, wallet), 10, 1_000).unwrap();
        assert_eq!(s.amount, 10);
        assert_eq!(registry.withdrawn_total(&wallet), 10);
        assert_eq!(st.total_outstanding, 0);
    }
}
