//! Program-wide constants.

/// PDA seed of the engine configuration account (also the vault authority).
pub const CONFIG_SEED: &[u8] = b"engine_config";

/// PDA seed prefix of a deferred-call queue shard, followed by its bucket (LE bytes).
pub const CALL_QUEUE_SEED: &[u8] = b"call_queue";

/// PDA seed prefix of a vesting slot, followed by the schedule id (LE bytes).
pub const VESTING_SEED: &[u8] = b"vesting";

/// PDA seed prefix of the per-mint token vault.
pub const VAULT_SEED: &[u8] = b"vault";

/// Schedule id used by the single-slot store mode.
pub const SINGLE_SLOT_ID: u64 = 0;
pub const SINGLE_SLOT_ID_BYTES: &[u8] = &SINGLE_SLOT_ID.to_le_bytes();

/// Width (in periods) of the window searched for the cheapest slot.
pub const SLOT_SEARCH_WINDOW: u64 = 10;

/// Gas budget of one `release_vested_tokens` deferred call.
pub const RELEASE_MAX_GAS: u64 = 20_000_000;

/// Gas budget of one housekeeping deferred call.
pub const HOUSEKEEPING_MAX_GAS: u64 = 2_000_000;

/// Execution lanes per period; a slot is (period, thread).
pub const THREADS_PER_PERIOD: u8 = 32;

/// Gas that may be booked into a single slot.
pub const SLOT_GAS_CAPACITY: u64 = 1_000_000_000;

/// Flat fee (lamports) of any deferred call.
pub const BASE_CALL_FEE: u64 = 5_000;

/// Gas units bought by one lamport in an empty slot.
pub const GAS_PER_LAMPORT: u64 = 1_000;

/// Fee (lamports) per byte of call payload.
pub const PAYLOAD_BYTE_FEE: u64 = 10;

/// Periods covered by one queue shard; shard `b` holds calls booked into
/// periods `[b * QUEUE_BUCKET_PERIODS, (b + 1) * QUEUE_BUCKET_PERIODS)`.
pub const QUEUE_BUCKET_PERIODS: u64 = 16;

/// Max deferred calls held by one queue shard.
pub const MAX_PENDING_CALLS: usize = 32;

/// Max payload bytes of a deferred call.
pub const MAX_CALL_PAYLOAD: usize = 48;

/// Periods a pending call may be overdue before `nudge` treats it as stalled.
pub const STALL_GRACE_PERIODS: u64 = 100;

pub const PERCENT_DENOMINATOR: u64 = 100;
