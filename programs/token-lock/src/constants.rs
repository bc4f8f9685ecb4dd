//! Program-wide constants.

/// Max distinct recipients stored in the registry PDA.
pub const MAX_RECIPIENTS: usize = 24;

/// Max vesting entries a single recipient may accumulate.
pub const MAX_ENTRIES_PER_RECIPIENT: usize = 16;

/// Prefix for `msg!` program logs.
pub const LOG_PREFIX: &str = "[token-lock]";
