use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::error::VestingError;
use crate::state::LedgerState;

/// Lamports sent to the ledger PDA. Accepted only while the ledger is open.
pub fn deposit_native(ctx: Context<DepositNative>, amount: u64) -> Result<()> {
    let ledger_state_ai = ctx.accounts.ledger_state.to_account_info();
    let total = ctx.accounts.ledger_state.record_native_deposit(amount)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.depositor.to_account_info(),
                to: ledger_state_ai,
            },
        ),
        amount,
    )?;

    emit!(NativeDeposited {
        depositor: ctx.accounts.depositor.key(),
        amount,
        deposited_native_value: total,
    });
    Ok(())
}

/// Return native value held by the ledger PDA above its rent-exempt minimum.
pub fn reclaim_stray_native_value(ctx: Context<ReclaimStrayNativeValue>, amount: u64) -> Result<()> {
    let ledger_state_ai = ctx.accounts.ledger_state.to_account_info();
    let admin_ai = ctx.accounts.admin.to_account_info();
    let rent_floor = Rent::get()?.minimum_balance(8 + LedgerState::SIZE);
    let available = ledger_state_ai.lamports().saturating_sub(rent_floor);

    let st = &mut ctx.accounts.ledger_state;
    let cap = st.admin_capability(&admin_ai.key())?;
    st.release_native(&cap, available, amount)?;

    let mut from = ledger_state_ai.try_borrow_mut_lamports()?;
    **from = from
        .checked_sub(amount)
        .ok_or(VestingError::ArithmeticOverflow)?;
    let mut to = admin_ai.try_borrow_mut_lamports()?;
    **to = to
        .checked_add(amount)
        .ok_or(VestingError::ArithmeticOverflow)?;

    emit!(NativeReclaimed {
        admin: st.admin,
        amount,
        deposited_native_value: st.deposited_native_value,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct DepositNative<'info> {
    #[account(mut, seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(mut)]
    pub depositor: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ReclaimStrayNativeValue<'info> {
    #[account(mut, seeds = [b"ledger_state"], bump = ledger_state.bump)]
    pub ledger_state: Account<'info, LedgerState>,

    #[account(mut)]
    pub admin: Signer<'info>,
}

#[event]
pub struct NativeDeposited {
    pub depositor: Pubkey,
    pub amount: u64,
    pub deposited_native_value: u64,
}

#[event]
pub struct NativeReclaimed {
    pub admin: Pubkey,
    pub amount: u64,
    pub deposited_native_value: u64,
}
