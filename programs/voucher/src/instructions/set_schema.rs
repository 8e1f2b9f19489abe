use anchor_lang::prelude::*;

use crate::constants::{ACCESS_SEED, CONFIG_SEED, SCHEMA_SEED};
use crate::state::{AccessControl, SchemaEntry, VoucherConfig};
use crate::utils::capability;

pub fn process_set_schema(
    ctx: Context<SetSchema>,
    key: [u8; 32],
    schema: String,
) -> Result<()> {
    let writer = ctx.accounts.writer.key();
    ctx.accounts
        .access
        .require(&writer, &capability::writer())?;

    let entry = &mut ctx.accounts.schema;
    entry.set(key, schema.clone())?;
    entry.bump = ctx.bumps.schema;

    emit!(SchemaSet {
        key,
        schema,
        writer,
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(key: [u8; 32])]
pub struct SetSchema<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump = access.bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    #[account(
        init_if_needed,
        payer = writer,
        space = SchemaEntry::SIZE,
        seeds = [SCHEMA_SEED, config.key().as_ref(), key.as_ref()],
        bump
    )]
    pub schema: Box<Account<'info, SchemaEntry>>,

    #[account(mut)]
    pub writer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct SchemaSet {
    pub key: [u8; 32],
    pub schema: String,
    pub writer: Pubkey,
}
