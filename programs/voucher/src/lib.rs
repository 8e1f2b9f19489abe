use anchor_lang::prelude::*;

pub mod adapters;
pub mod constants;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("61EiRiRNSU4ZEhnn8JpC6L9VRHz6oKvD9YzSP6bNZNWp");

#[program]
pub mod voucher {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::process_initialize(ctx)
    }

    pub fn grant_capability(
        ctx: Context<ManageCapability>,
        capability_id: [u8; 32],
        account: Pubkey,
    ) -> Result<()> {
        instructions::grant_capability::process_grant_capability(
            ctx,
            capability_id,
            account,
        )
    }

    pub fn revoke_capability(
        ctx: Context<ManageCapability>,
        capability_id: [u8; 32],
        account: Pubkey,
    ) -> Result<()> {
        instructions::revoke_capability::process_revoke_capability(
            ctx,
            capability_id,
            account,
        )
    }

    pub fn create_position(ctx: Context<CreatePosition>, input: VestingInput) -> Result<u64> {
        instructions::create_position::process_create_position(ctx, input)
    }

    pub fn redeem(ctx: Context<Redeem>, position_id: u64) -> Result<u64> {
        instructions::redeem::process_redeem(ctx, position_id)
    }

    pub fn quote_redeemable(ctx: Context<QuoteRedeemable>, position_id: u64) -> Result<u64> {
        instructions::quote_redeemable::process_quote_redeemable(ctx, position_id)
    }

    pub fn write_metadata(
        ctx: Context<WriteMetadata>,
        position_id: u64,
        requester: Pubkey,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        instructions::write_metadata::process_write_metadata(
            ctx,
            position_id,
            requester,
            key,
            value,
        )
    }

    pub fn safe_write_metadata(
        ctx: Context<SafeWriteMetadata>,
        position_id: u64,
        requester: Pubkey,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        instructions::write_metadata::process_safe_write_metadata(
            ctx,
            position_id,
            requester,
            key,
            value,
        )
    }

    pub fn read_metadata(
        ctx: Context<ReadMetadata>,
        position_id: u64,
        key: [u8; 32],
    ) -> Result<Vec<u8>> {
        instructions::read_metadata::process_read_metadata(ctx, position_id, key)
    }

    pub fn set_schema(ctx: Context<SetSchema>, key: [u8; 32], schema: String) -> Result<()> {
        instructions::set_schema::process_set_schema(ctx, key, schema)
    }

    pub fn get_schema(ctx: Context<GetSchema>, key: [u8; 32]) -> Result<String> {
        instructions::get_schema::process_get_schema(ctx, key)
    }
}
