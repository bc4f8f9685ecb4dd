use anchor_lang::prelude::*;

/// Result type of the pure ledger core.
pub type VestingResult<T> = core::result::Result<T, VestingError>;

/// Custom error codes for the token lock program.
#[error_code]
pub enum VestingError {
    #[msg("Recipient must not be the default public key")]
    InvalidRecipient,

    #[msg("Delays and amounts must be the same length")]
    ScheduleMismatch,

    #[msg("Recipients, delays and amounts must be the same length")]
    BulkLengthMismatch,

    #[msg("Ledger is already activated")]
    AlreadyActivated,

    #[msg("Ledger is not activated yet")]
    NotActivated,

    #[msg("Unauthorized: administrator or recipient signature required")]
    Unauthorized,

    #[msg("Insufficient custody balance, try a lesser amount")]
    InsufficientCustodyBalance,

    #[msg("Insufficient recipient allocation, try a lesser amount")]
    InsufficientAllocation,

    #[msg("Some tokens are still locked, try a lesser amount")]
    ExceedsUnlockedBalance,

    #[msg("Amount exceeds custody held above outstanding obligations")]
    ExceedsExcessBalance,

    #[msg("The vesting asset cannot be reclaimed as a foreign asset")]
    ForbiddenAsset,

    #[msg("Math overflow")]
    ArithmeticOverflow,

    #[msg("Batch settlement failed; no recipient was settled")]
    PartialSettlementFailure,

    #[msg("Recipient registry is full")]
    RecipientListFull,

    #[msg("Too many vesting entries for recipient")]
    TooManyEntries,

    #[msg("A settlement is already in progress")]
    SettlementInProgress,

    #[msg("Insufficient native balance above the rent-exempt minimum")]
    InsufficientNativeBalance,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,
}
