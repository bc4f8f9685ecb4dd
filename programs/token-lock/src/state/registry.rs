use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::constants::{MAX_ENTRIES_PER_RECIPIENT, MAX_RECIPIENTS};
use crate::error::{VestingError, VestingResult};
use crate::state::LedgerState;
use crate::utils::{time, AdminCapability};

/// A single (amount, delay) vesting commitment. Immutable once appended.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct VestingEntry {
    pub amount: u64,
    /// Seconds after activation at which `amount` unlocks.
    pub delay_seconds: u64,
}

impl VestingEntry {
    pub const SIZE: usize = core::mem::size_of::<VestingEntry>();
}

/// Per-recipient vesting account. Never removed once created.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientAccount {
    pub wallet: Pubkey,
    /// Insertion order preserved; append-only while the ledger is open.
    pub entries: Vec<VestingEntry>,
    /// Sum of entry amounts minus `withdrawn_total`.
    pub remaining_balance: u64,
    /// Monotonically non-decreasing.
    pub withdrawn_total: u64,
}

impl RecipientAccount {
    pub const SPACE: usize =
        32 + // wallet
        4 + MAX_ENTRIES_PER_RECIPIENT * VestingEntry::SIZE + // entries
        8 +  // remaining_balance
        8;   // withdrawn_total

    fn new(wallet: Pubkey) -> Self {
        Self {
            wallet,
            ..Self::default()
        }
    }

    /// Sum of every entry amount ever scheduled.
    pub fn allocated(&self) -> VestingResult<u64> {
        self.entries.iter().try_fold(0u64, |acc, e| {
            acc.checked_add(e.amount).ok_or(VestingError::ArithmeticOverflow)
        })
    }

    /// Sum of entries matured at `now`.
    pub fn unlocked_balance(&self, activated_at: i64, now: i64) -> VestingResult<u64> {
        self.entries
            .iter()
            .filter(|e| time::is_matured(activated_at, e.delay_seconds, now))
            .try_fold(0u64, |acc, e| {
                acc.checked_add(e.amount).ok_or(VestingError::ArithmeticOverflow)
            })
    }

    /// Matured but not yet withdrawn.
    pub fn withdrawable(&self, activated_at: i64, now: i64) -> VestingResult<u64> {
        let unlocked = self.unlocked_balance(activated_at, now)?;
        Ok(unlocked.saturating_sub(self.withdrawn_total))
    }
}

/// Outcome of a settled withdrawal; the caller performs the transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub wallet: Pubkey,
    pub amount: u64,
}

/// PDA holding every recipient account (<= MAX_RECIPIENTS).
#[account]
pub struct Registry {
    pub ledger: Pubkey,
    pub recipients: Vec<RecipientAccount>,
}

impl Registry {
    /// Space for discriminator + ledger key + fully populated recipients vec.
    pub const fn space() -> usize {
        8 + 32 + 4 + MAX_RECIPIENTS * RecipientAccount::SPACE
    }

    pub fn new(ledger: Pubkey) -> Self {
        Self {
            ledger,
            recipients: Vec::new(),
        }
    }

    fn position(&self, wallet: &Pubkey) -> Option<usize> {
        self.recipients.iter().position(|r| r.wallet == *wallet)
    }

    pub fn recipient(&self, wallet: &Pubkey) -> Option<&RecipientAccount> {
        self.recipients.iter().find(|r| r.wallet == *wallet)
    }

    pub fn remaining_balance(&self, wallet: &Pubkey) -> u64 {
        self.recipient(wallet).map_or(0, |r| r.remaining_balance)
    }

    pub fn withdrawn_total(&self, wallet: &Pubkey) -> u64 {
        self.recipient(wallet).map_or(0, |r| r.withdrawn_total)
    }

    pub fn schedule_length(&self, wallet: &Pubkey) -> usize {
        self.recipient(wallet).map_or(0, |r| r.entries.len())
    }

    pub fn schedule_entry(&self, wallet: &Pubkey, index: usize) -> Option<VestingEntry> {
        self.recipient(wallet).and_then(|r| r.entries.get(index).copied())
    }

    /// Sum of remaining balances; equals `LedgerState::total_outstanding`.
    pub fn total_remaining(&self) -> VestingResult<u64> {
        self.recipients.iter().try_fold(0u64, |acc, r| {
            acc.checked_add(r.remaining_balance)
                .ok_or(VestingError::ArithmeticOverflow)
        })
    }

    /// Matured amount for `wallet`; zero for every recipient before activation.
    pub fn unlocked_balance(&self, st: &LedgerState, wallet: &Pubkey, now: i64) -> VestingResult<u64> {
        let (Some(activated_at), Some(account)) = (st.activated_at(), self.recipient(wallet)) else {
            return Ok(0);
        };
        account.unlocked_balance(activated_at, now)
    }

    pub fn withdrawable(&self, st: &LedgerState, wallet: &Pubkey, now: i64) -> VestingResult<u64> {
        let (Some(activated_at), Some(account)) = (st.activated_at(), self.recipient(wallet)) else {
            return Ok(0);
        };
        account.withdrawable(activated_at, now)
    }

    /// Append `(delay, amount)` pairs to `recipient`'s schedule. Returns the amount added.
    ///
    /// Validation happens before any mutation; on error nothing changes.
    pub fn register_schedule(
        &mut self,
        st: &mut LedgerState,
        cap: &AdminCapability,
        recipient: Pubkey,
        delays: &[u64],
        amounts: &[u64],
    ) -> VestingResult<u64> {
        st.check_capability(cap)?;
        st.ensure_open()?;
        if delays.len() != amounts.len() {
            return Err(VestingError::ScheduleMismatch);
        }
        if recipient == Pubkey::default() {
            return Err(VestingError::InvalidRecipient);
        }
        if amounts.is_empty() {
            return Ok(0);
        }

        let added = amounts.iter().try_fold(0u64, |acc, a| {
            acc.checked_add(*a).ok_or(VestingError::ArithmeticOverflow)
        })?;
        let total_outstanding = st
            .total_outstanding
            .checked_add(added)
            .ok_or(VestingError::ArithmeticOverflow)?;

        let existing = self.position(&recipient);
        let (held_entries, held_remaining) = match existing {
            Some(i) => (self.recipients[i].entries.len(), self.recipients[i].remaining_balance),
            None => {
                if self.recipients.len() >= MAX_RECIPIENTS {
                    return Err(VestingError::RecipientListFull);
                }
                (0, 0)
            }
        };
        if held_entries + amounts.len() > MAX_ENTRIES_PER_RECIPIENT {
            return Err(VestingError::TooManyEntries);
        }
        let remaining_balance = held_remaining
            .checked_add(added)
            .ok_or(VestingError::ArithmeticOverflow)?;

        let idx = match existing {
            Some(i) => i,
            None => {
                self.recipients.push(RecipientAccount::new(recipient));
                self.recipients.len() - 1
            }
        };
        let account = &mut self.recipients[idx];
        account.entries.extend(
            delays
                .iter()
                .zip(amounts.iter())
                .map(|(delay, amount)| VestingEntry {
                    amount: *amount,
                    delay_seconds: *delay,
                }),
        );
        account.remaining_balance = remaining_balance;
        st.total_outstanding = total_outstanding;
        Ok(added)
    }

    /// Register several schedules at once. All recipients commit or none do.
    pub fn register_schedules_bulk(
        &mut self,
        st: &mut LedgerState,
        cap: &AdminCapability,
        recipients: &[Pubkey],
        delays: &[Vec<u64>],
        amounts: &[Vec<u64>],
    ) -> VestingResult<u64> {
        st.check_capability(cap)?;
        st.ensure_open()?;
        if recipients.len() != delays.len() || recipients.len() != amounts.len() {
            return Err(VestingError::BulkLengthMismatch);
        }

        let mut staged_registry = self.clone();
        let mut staged_state = st.clone();
        let mut added = 0u64;
        for ((recipient, d), a) in recipients.iter().zip(delays).zip(amounts) {
            let n = staged_registry.register_schedule(&mut staged_state, cap, *recipient, d, a)?;
            added = added.checked_add(n).ok_or(VestingError::ArithmeticOverflow)?;
        }

        *self = staged_registry;
        *st = staged_state;
        Ok(added)
    }

    /// BLAKE3 over (wallet, entry count, raw entries) for every recipient in order.
    pub fn schedule_digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        for r in self.recipients.iter() {
            hasher.update(r.wallet.as_ref());
            hasher.update(&(r.entries.len() as u32).to_le_bytes());
            hasher.update(bytemuck::cast_slice(&r.entries));
        }
        *hasher.finalize().as_bytes()
    }

    /// Guarded single withdrawal. Ledger effects are applied here, before the
    /// caller issues the outbound transfer.
    pub fn withdraw(
        &mut self,
        st: &mut LedgerState,
        recipient: Pubkey,
        amount: u64,
        requested_by: Pubkey,
        custody_balance: u64,
        now: i64,
    ) -> VestingResult<Settlement> {
        let activated_at = st.ensure_active()?;
        st.authorize_withdrawal(&recipient, &requested_by)?;
        if custody_balance < amount {
            return Err(VestingError::InsufficientCustodyBalance);
        }
        let idx = self.position(&recipient);
        let remaining = idx.map_or(0, |i| self.recipients[i].remaining_balance);
        if remaining < amount {
            return Err(VestingError::InsufficientAllocation);
        }
        if amount == 0 {
            return Ok(Settlement { wallet: recipient, amount: 0 });
        }
        let idx = idx.ok_or(VestingError::InsufficientAllocation)?;
        if amount > self.recipients[idx].withdrawable(activated_at, now)? {
            return Err(VestingError::ExceedsUnlockedBalance);
        }
        self.settle(st, idx, amount)
    }

    /// Settle every recipient's full withdrawable amount. Recipients with nothing
    /// matured are skipped. All settlements commit or none do.
    ///
    /// A plan whose total exceeds `custody_balance` fails up front with
    /// `InsufficientCustodyBalance`, the same kind a single `withdraw` reports.
    /// `PartialSettlementFailure` is reserved for settlements that cannot be
    /// delivered once planned.
    pub fn withdraw_all_matured(
        &mut self,
        st: &mut LedgerState,
        cap: &AdminCapability,
        custody_balance: u64,
        now: i64,
    ) -> VestingResult<Vec<Settlement>> {
        st.check_capability(cap)?;
        let activated_at = st.ensure_active()?;

        let mut plan = Vec::new();
        let mut total = 0u64;
        for (i, r) in self.recipients.iter().enumerate() {
            let amount = r.withdrawable(activated_at, now)?;
            if amount > 0 {
                total = total.checked_add(amount).ok_or(VestingError::ArithmeticOverflow)?;
                plan.push((i, amount));
            }
        }
        if custody_balance < total {
            return Err(VestingError::InsufficientCustodyBalance);
        }

        let mut staged_registry = self.clone();
        let mut staged_state = st.clone();
        let mut settlements = Vec::with_capacity(plan.len());
        for (i, amount) in plan {
            settlements.push(staged_registry.settle(&mut staged_state, i, amount)?);
        }

        *self = staged_registry;
        *st = staged_state;
        Ok(settlements)
    }

    fn settle(&mut self, st: &mut LedgerState, idx: usize, amount: u64) -> VestingResult<Settlement> {
        let account = &mut self.recipients[idx];
        let withdrawn_total = account
            .withdrawn_total
            .checked_add(amount)
            .ok_or(VestingError::ArithmeticOverflow)?;
        let remaining_balance = account
            .remaining_balance
            .checked_sub(amount)
            .ok_or(VestingError::InsufficientAllocation)?;
        let total_outstanding = st
            .total_outstanding
            .checked_sub(amount)
            .ok_or(VestingError::ArithmeticOverflow)?;

        account.withdrawn_total = withdrawn_total;
        account.remaining_balance = remaining_balance;
        st.total_outstanding = total_outstanding;
        Ok(Settlement {
            wallet: account.wallet,
            amount,
        })
    }
}
