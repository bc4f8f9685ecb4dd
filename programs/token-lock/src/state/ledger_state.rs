use anchor_lang::prelude::*;

use crate::error::{VestingError, VestingResult};
use crate::utils::AdminCapability;

/// Lifecycle of the ledger. `Open -> Active` happens exactly once.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerPhase {
    /// Registry accepts schedules; the vesting clock has not started.
    Open,
    /// Schedules are frozen; entries mature relative to `activated_at`.
    Active { activated_at: i64 },
}

/// Singleton ledger state PDA.
#[account]
pub struct LedgerState {
    /// Administrator authority.
    pub admin: Pubkey,
    /// Vested token mint.
    pub mint: Pubkey,
    /// Custody token account (PDA owned by this account).
    pub vault: Pubkey,
    /// Open for scheduling, or vesting in force.
    pub phase: LedgerPhase,
    /// Sum of every recipient's remaining balance.
    pub total_outstanding: u64,
    /// Lamports received through `deposit_native` while open.
    pub deposited_native_value: u64,
    /// BLAKE3 commitment over the registry, written at activation.
    pub schedule_digest: [u8; 32],
    /// Held for the duration of outbound transfer CPIs. Handlers write the
    /// account back with the flag set before the first transfer.
    pub settling: bool,
    pub bump: u8,
    pub vault_bump: u8,
}

impl LedgerState {
    pub const SIZE: usize =
        32 + // admin
        32 + // mint
        32 + // vault
        1 + 8 + // phase (tag + activated_at)
        8 +  // total_outstanding
        8 +  // deposited_native_value
        32 + // schedule_digest
        1 +  // settling
        1 +  // bump
        1;   // vault_bump

    pub fn new(admin: Pubkey, mint: Pubkey, vault: Pubkey, bump: u8, vault_bump: u8) -> Self {
        Self {
            admin,
            mint,
            vault,
            phase: LedgerPhase::Open,
            total_outstanding: 0,
            deposited_native_value: 0,
            schedule_digest: [0u8; 32],
            settling: false,
            bump,
            vault_bump,
        }
    }

    pub fn is_activated(&self) -> bool {
        matches!(self.phase, LedgerPhase::Active { .. })
    }

    pub fn activated_at(&self) -> Option<i64> {
        match self.phase {
            LedgerPhase::Open => None,
            LedgerPhase::Active { activated_at } => Some(activated_at),
        }
    }

    pub fn ensure_open(&self) -> VestingResult<()> {
        match self.phase {
            LedgerPhase::Open => Ok(()),
            LedgerPhase::Active { .. } => Err(VestingError::AlreadyActivated),
        }
    }

    /// Returns the activation timestamp.
    pub fn ensure_active(&self) -> VestingResult<i64> {
        self.activated_at().ok_or(VestingError::NotActivated)
    }

    /// Issue an [`AdminCapability`] if `signer` is this ledger's administrator.
    pub fn admin_capability(&self, signer: &Pubkey) -> VestingResult<AdminCapability> {
        if *signer != self.admin {
            return Err(VestingError::Unauthorized);
        }
        Ok(AdminCapability::issue(self.admin))
    }

    /// Rejects capabilities issued for another administrator.
    pub fn check_capability(&self, cap: &AdminCapability) -> VestingResult<()> {
        if cap.admin() != self.admin {
            return Err(VestingError::Unauthorized);
        }
        Ok(())
    }

    /// A withdrawal may be requested by the recipient or by the administrator.
    pub fn authorize_withdrawal(&self, recipient: &Pubkey, requested_by: &Pubkey) -> VestingResult<()> {
        if requested_by == recipient || *requested_by == self.admin {
            Ok(())
        } else {
            Err(VestingError::Unauthorized)
        }
    }

    /// One-way lockup: freezes the registry once custody fully backs it.
    pub fn activate(
        &mut self,
        cap: &AdminCapability,
        custody_balance: u64,
        now: i64,
        schedule_digest: [u8; 32],
    ) -> VestingResult<()> {
        self.check_capability(cap)?;
        self.ensure_open()?;
        if custody_balance < self.total_outstanding {
            return Err(VestingError::InsufficientCustodyBalance);
        }
        self.phase = LedgerPhase::Active { activated_at: now };
        self.schedule_digest = schedule_digest;
        Ok(())
    }

    /// Custody held above outstanding obligations.
    pub fn excess_custody(&self, custody_balance: u64) -> u64 {
        custody_balance.saturating_sub(self.total_outstanding)
    }

    pub fn check_pre_activation_reclaim(
        &self,
        cap: &AdminCapability,
        custody_balance: u64,
        amount: u64,
    ) -> VestingResult<()> {
        self.check_capability(cap)?;
        self.ensure_open()?;
        if custody_balance < amount {
            return Err(VestingError::InsufficientCustodyBalance);
        }
        Ok(())
    }

    pub fn check_excess_reclaim(
        &self,
        cap: &AdminCapability,
        custody_balance: u64,
        amount: u64,
    ) -> VestingResult<()> {
        self.check_capability(cap)?;
        self.ensure_active()?;
        if amount > self.excess_custody(custody_balance) {
            return Err(VestingError::ExceedsExcessBalance);
        }
        Ok(())
    }

    /// The vesting asset may only leave custody through the solvency-checked paths.
    pub fn check_foreign_reclaim(&self, cap: &AdminCapability, asset_mint: &Pubkey) -> VestingResult<()> {
        self.check_capability(cap)?;
        if *asset_mint == self.mint {
            return Err(VestingError::ForbiddenAsset);
        }
        Ok(())
    }

    /// Returns the new native deposit total.
    pub fn record_native_deposit(&mut self, amount: u64) -> VestingResult<u64> {
        self.ensure_open()?;
        self.deposited_native_value = self
            .deposited_native_value
            .checked_add(amount)
            .ok_or(VestingError::ArithmeticOverflow)?;
        Ok(self.deposited_native_value)
    }

    /// `available` is the lamport surplus above the rent-exempt minimum.
    pub fn release_native(&mut self, cap: &AdminCapability, available: u64, amount: u64) -> VestingResult<()> {
        self.check_capability(cap)?;
        if amount > available {
            return Err(VestingError::InsufficientNativeBalance);
        }
        self.deposited_native_value = self.deposited_native_value.saturating_sub(amount);
        Ok(())
    }

    pub fn begin_settlement(&mut self) -> VestingResult<()> {
        if self.settling {
            return Err(VestingError::SettlementInProgress);
        }
        self.settling = true;
        Ok(())
    }

    pub fn end_settlement(&mut self) {
        self.settling = false;
    }
}
