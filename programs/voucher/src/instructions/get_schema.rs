use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, SCHEMA_SEED};
use crate::state::{SchemaEntry, VoucherConfig};

pub fn process_get_schema(ctx: Context<GetSchema>, _key: [u8; 32]) -> Result<String> {
    Ok(ctx.accounts.schema.schema.clone())
}

#[derive(Accounts)]
#[instruction(key: [u8; 32])]
pub struct GetSchema<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [SCHEMA_SEED, config.key().as_ref(), key.as_ref()],
        bump = schema.bump
    )]
    pub schema: Box<Account<'info, SchemaEntry>>,
}
