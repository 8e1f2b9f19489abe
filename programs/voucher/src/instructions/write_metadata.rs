use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::adapters::{receipt_holder, RecordRegistry};
use crate::constants::{ACCESS_SEED, CONFIG_SEED, METADATA_SEED, RECEIPT_SEED};
use crate::engine::MetadataRegistry;
use crate::state::{AccessControl, MetadataRecord, VoucherConfig};

pub fn process_write_metadata(
    ctx: Context<WriteMetadata>,
    position_id: u64,
    requester: Pubkey,
    key: [u8; 32],
    value: Vec<u8>,
) -> Result<()> {
    let collection = ctx.accounts.config.key();
    let accounts = &mut *ctx.accounts;

    let mut registry = RecordRegistry {
        writer: accounts.writer.key(),
        access: &accounts.access,
        record: &mut accounts.metadata,
    };
    registry.write(&requester, &collection, position_id, key, value.clone())?;

    emit!(MetadataWritten {
        requester,
        collection,
        token_id: position_id,
        key,
        value,
    });
    Ok(())
}

/// Like `process_write_metadata`, but the requester must currently hold the
/// position's receipt.
pub fn process_safe_write_metadata(
    ctx: Context<SafeWriteMetadata>,
    position_id: u64,
    requester: Pubkey,
    key: [u8; 32],
    value: Vec<u8>,
) -> Result<()> {
    let collection = ctx.accounts.config.key();
    let accounts = &mut *ctx.accounts;

    let holder = receipt_holder(
        accounts.receipt_holding.owner,
        accounts.receipt_holding.mint,
        accounts.receipt_holding.amount,
        &accounts.receipt_mint.key(),
    );
    let mut registry = RecordRegistry {
        writer: accounts.writer.key(),
        access: &accounts.access,
        record: &mut accounts.metadata,
    };
    registry.safe_write(
        &requester,
        &holder,
        &collection,
        position_id,
        key,
        value.clone(),
    )?;

    emit!(MetadataWritten {
        requester,
        collection,
        token_id: position_id,
        key,
        value,
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(position_id: u64)]
pub struct WriteMetadata<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump = access.bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    #[account(
        mut,
        seeds = [METADATA_SEED, config.key().as_ref(), &position_id.to_le_bytes()],
        bump = metadata.bump
    )]
    pub metadata: Box<Account<'info, MetadataRecord>>,

    pub writer: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(position_id: u64)]
pub struct SafeWriteMetadata<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump = access.bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    #[account(
        mut,
        seeds = [METADATA_SEED, config.key().as_ref(), &position_id.to_le_bytes()],
        bump = metadata.bump
    )]
    pub metadata: Box<Account<'info, MetadataRecord>>,

    #[account(
        seeds = [RECEIPT_SEED, config.key().as_ref(), &position_id.to_le_bytes()],
        bump
    )]
    pub receipt_mint: Box<Account<'info, Mint>>,

    pub receipt_holding: Box<Account<'info, TokenAccount>>,

    pub writer: Signer<'info>,
}

#[event]
pub struct MetadataWritten {
    pub requester: Pubkey,
    pub collection: Pubkey,
    pub token_id: u64,
    pub key: [u8; 32],
    pub value: Vec<u8>,
}
