use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, METADATA_SEED};
use crate::state::{MetadataRecord, VoucherConfig};

/// Value stored under `key` for the position's receipt; empty when unset.
pub fn process_read_metadata(
    ctx: Context<ReadMetadata>,
    _position_id: u64,
    key: [u8; 32],
) -> Result<Vec<u8>> {
    Ok(ctx.accounts.metadata.read(&key))
}

#[derive(Accounts)]
#[instruction(position_id: u64)]
pub struct ReadMetadata<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [METADATA_SEED, config.key().as_ref(), &position_id.to_le_bytes()],
        bump = metadata.bump
    )]
    pub metadata: Box<Account<'info, MetadataRecord>>,
}
