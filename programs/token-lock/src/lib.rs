#![allow(unexpected_cfgs)]

//! # Token Lock: time-locked vesting ledger
//!
//! Holds custody of one SPL mint for a set of recipients. Each recipient owns
//! an append-only list of `(delay, amount)` entries registered by the admin.
//! A single `activate` freezes the registry once custody fully backs it, and
//! entries mature `delay` seconds after that instant.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

declare_id!("HjZoXVWFcCaTp2hKAph5jM7HtP7WBhDfGHqVwNndpCBF");

#[program]
pub mod token_lock {
    use super::*;

    /// Create ledger state, registry and custody vault for `mint`; the signer becomes admin.
    pub fn initialize_ledger(ctx: Context<InitializeLedger>) -> Result<()> {
        instructions::initialize_ledger(ctx)
    }

    /// Append a vesting schedule for one recipient (admin, before activation).
    pub fn register_schedule(
        ctx: Context<RegisterSchedule>,
        recipient: Pubkey,
        delays: Vec<u64>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        instructions::register_schedule(ctx, recipient, delays, amounts)
    }

    /// Append schedules for several recipients; all commit or none do.
    pub fn register_schedules_bulk(
        ctx: Context<RegisterSchedule>,
        recipients: Vec<Pubkey>,
        delays: Vec<Vec<u64>>,
        amounts: Vec<Vec<u64>>,
    ) -> Result<()> {
        instructions::register_schedules_bulk(ctx, recipients, delays, amounts)
    }

    pub fn deposit_custody(ctx: Context<DepositCustody>, amount: u64) -> Result<()> {
        instructions::deposit_custody(ctx, amount)
    }

    /// One-way lockup. Requires custody >= total outstanding.
    pub fn activate(ctx: Context<Activate>) -> Result<()> {
        instructions::activate(ctx)
    }

    pub fn withdraw(ctx: Context<Withdraw>, recipient: Pubkey, amount: u64) -> Result<()> {
        instructions::withdraw(ctx, recipient, amount)
    }

    pub fn withdraw_all_matured<'info>(
        ctx: Context<'_, '_, 'info, 'info, WithdrawAllMatured<'info>>,
    ) -> Result<()> {
        instructions::withdraw_all_matured(ctx)
    }

    pub fn reclaim_pre_activation_deposit(ctx: Context<ReclaimCustody>, amount: u64) -> Result<()> {
        instructions::reclaim_pre_activation_deposit(ctx, amount)
    }

    pub fn reclaim_excess_custody(ctx: Context<ReclaimCustody>, amount: u64) -> Result<()> {
        instructions::reclaim_excess_custody(ctx, amount)
    }

    pub fn reclaim_foreign_asset(ctx: Context<ReclaimForeignAsset>, amount: u64) -> Result<()> {
        instructions::reclaim_foreign_asset(ctx, amount)
    }

    pub fn deposit_native(ctx: Context<DepositNative>, amount: u64) -> Result<()> {
        instructions::deposit_native(ctx, amount)
    }

    pub fn reclaim_stray_native_value(ctx: Context<ReclaimStrayNativeValue>, amount: u64) -> Result<()> {
        instructions::reclaim_stray_native_value(ctx, amount)
    }

    /// Emit a read-only quote of `recipient`'s balances at the current time.
    pub fn emit_recipient_quote(ctx: Context<EmitRecipientQuote>, recipient: Pubkey) -> Result<()> {
        instructions::emit_recipient_quote(ctx, recipient)
    }
}
