use anchor_lang::prelude::*;

/// Custom error codes for the voucher program.
#[error_code]
pub enum VoucherError {
    // Validation
    #[msg("Schedule set must contain at least one schedule")]
    EmptyScheduleSet,

    #[msg("Schedule amount must be > 0")]
    ZeroAmount,

    #[msg("Unknown schedule kind")]
    InvalidScheduleKind,

    #[msg("Unknown linear granularity")]
    InvalidGranularity,

    #[msg("Linear schedule end must be after its start")]
    InvalidTimeRange,

    #[msg("Staged schedule requires a start timestamp")]
    MissingStartTime,

    #[msg("Declared balance does not equal the sum of schedule amounts")]
    BalanceMismatch,

    #[msg("Redemption does not match the position's schedules")]
    ScheduleCountMismatch,

    #[msg("Metadata value is too large")]
    MetadataValueTooLarge,

    #[msg("Metadata record is full")]
    MetadataRecordFull,

    #[msg("Schema is too long")]
    SchemaTooLong,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    // Resource limits
    #[msg("Too many schedules in a single position")]
    TooManySchedules,

    #[msg("Capability table is full")]
    CapabilityTableFull,

    // Authorization
    #[msg("Account is missing a required capability")]
    MissingCapability,

    #[msg("Caller does not hold the position receipt")]
    NotReceiptHolder,

    #[msg("Requester must be live account")]
    RequesterNotLive,

    #[msg("Requester must be true owner of NFT")]
    RequesterNotOwner,

    #[msg("The last admin cannot be revoked")]
    LastAdmin,

    // Funds
    #[msg("Insufficient balance to fund the position")]
    InsufficientFunds,

    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance,

    // No-op
    #[msg("Nothing to redeem")]
    NothingToRedeem,

    // Lookup
    #[msg("Position not found")]
    PositionNotFound,

    #[msg("Math overflow")]
    MathOverflow,
}
