//! Content-addressed identifiers: a capability or metadata key is the blake3
//! digest of its human-readable name, so independently deployed programs agree
//! on ids without sharing an enumeration.

use anchor_lang::prelude::Pubkey;

use crate::constants::{
    ADMIN_CAPABILITY, MINTER_CAPABILITY, SCHEDULES_METADATA_KEY, WRITER_CAPABILITY,
};

pub type ContentId = [u8; 32];

pub fn content_id(name: &str) -> ContentId {
    *blake3::hash(name.as_bytes()).as_bytes()
}

pub fn admin() -> ContentId {
    content_id(ADMIN_CAPABILITY)
}

pub fn minter() -> ContentId {
    content_id(MINTER_CAPABILITY)
}

pub fn writer() -> ContentId {
    content_id(WRITER_CAPABILITY)
}

pub fn schedules_metadata_key() -> ContentId {
    content_id(SCHEDULES_METADATA_KEY)
}

/// Stable, parseable reason logged when a capability check fails.
pub fn missing_capability_reason(account: &Pubkey, capability: &ContentId) -> String {
    format!(
        "account {} is missing capability 0x{}",
        account,
        blake3::Hash::from(*capability).to_hex()
    )
}
