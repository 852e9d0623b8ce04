use anchor_lang::prelude::*;

/// Custom error codes for the release engine.
///
/// Every variant is a hard abort: the host discards all writes of the
/// invocation. Expected business conditions never surface as errors.
#[error_code]
pub enum VestingError {
    #[msg("Unauthorized: owner signature required")]
    Unauthorized,

    #[msg("Engine is already paused")]
    AlreadyPaused,

    #[msg("Engine is not paused")]
    NotPaused,

    #[msg("Invalid total amount (must be > 0)")]
    InvalidTotalAmount,

    #[msg("Invalid release interval (must be > 0)")]
    InvalidReleaseInterval,

    #[msg("Invalid release percentage (must be within 1..=100)")]
    InvalidReleasePercentage,

    #[msg("Per-release amount rounds down to zero")]
    ReleaseAmountTooSmall,

    #[msg("Schedule id does not match the store mode")]
    InvalidScheduleId,

    #[msg("The single slot holds a schedule that has not completed")]
    ScheduleActive,

    #[msg("Insufficient token allowance for the engine")]
    InsufficientAllowance,

    #[msg("Insufficient token balance")]
    InsufficientBalance,

    #[msg("Deposit did not credit the full amount to the vault")]
    DepositShortfall,

    #[msg("Release transfer was not credited to the beneficiary")]
    TransferNotCredited,

    #[msg("Token account is not known to this invocation")]
    UnknownTokenAccount,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Required account is missing")]
    MissingAccount,

    #[msg("Malformed deferred-call payload")]
    MalformedPayload,

    #[msg("No pending deferred call")]
    NoPendingCall,

    #[msg("Deferred call not found")]
    CallNotFound,

    #[msg("Deferred call is not due yet")]
    CallNotDue,

    #[msg("Deferred-call queue shard is full")]
    CallQueueFull,

    #[msg("Queue shard does not match its bucket, is read-only or was passed twice")]
    InvalidQueueShard,

    #[msg("Deferred-call payload too large")]
    PayloadTooLarge,

    #[msg("No slot available in the requested window")]
    NoSlotAvailable,

    #[msg("Slot is in the past")]
    SlotInPast,

    #[msg("Insufficient fee balance for deferred call")]
    InsufficientFeeBalance,

    #[msg("Math overflow")]
    MathOverflow,
}
