//! Program-wide constants.

/// Max schedules bundled into a single position.
pub const MAX_SCHEDULES: usize = 10;

/// Seconds per day (UTC).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Step sizes for linear schedules.
pub const DAILY_PERIOD: i64 = SECONDS_PER_DAY;
pub const WEEKLY_PERIOD: i64 = 7 * SECONDS_PER_DAY;
pub const MONTHLY_PERIOD: i64 = 30 * SECONDS_PER_DAY;
pub const QUARTERLY_PERIOD: i64 = 91 * SECONDS_PER_DAY;

/// Max (account, capability) grants held by the access table.
pub const MAX_GRANTS: usize = 16;

/// Max key/value entries stored per position in the metadata registry.
pub const MAX_METADATA_ENTRIES: usize = 4;

/// Max length of a single metadata value in bytes.
/// Fits the serialized schedules of a full position.
pub const MAX_METADATA_VALUE_LEN: usize = 384;

/// Max length of a schema string in bytes.
pub const MAX_SCHEMA_LEN: usize = 128;

/// Human-readable capability names; ids are their blake3 digests.
pub const ADMIN_CAPABILITY: &str = "ADMIN";
pub const MINTER_CAPABILITY: &str = "MINTER";
pub const WRITER_CAPABILITY: &str = "WRITER";

/// Metadata key under which a position's schedules are recorded at creation.
pub const SCHEDULES_METADATA_KEY: &str = "voucher.schedules";

pub const CONFIG_SEED: &[u8] = b"config";
pub const VAULT_SEED: &[u8] = b"vault";
pub const ACCESS_SEED: &[u8] = b"access";
pub const POSITION_SEED: &[u8] = b"position";
pub const RECEIPT_SEED: &[u8] = b"receipt";
pub const RECEIPT_HOLDING_SEED: &[u8] = b"receipt_holding";
pub const METADATA_SEED: &[u8] = b"metadata";
pub const SCHEMA_SEED: &[u8] = b"schema";
