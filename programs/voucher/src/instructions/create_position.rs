use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::adapters::{ProgramLedger, ReceiptToken, RecordRegistry, TokenEscrow};
use crate::constants::{
    ACCESS_SEED, CONFIG_SEED, METADATA_SEED, POSITION_SEED, RECEIPT_HOLDING_SEED, RECEIPT_SEED,
    VAULT_SEED,
};
use crate::engine;
use crate::error::VoucherError;
use crate::state::{AccessControl, MetadataRecord, Position, VestingInput, VoucherConfig};

pub fn process_create_position(
    ctx: Context<CreatePosition>,
    input: VestingInput,
) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;

    // Read before `accounts` is borrowed mutably below.
    let owner = ctx.accounts.owner.key();
    let config_key = ctx.accounts.config.key();
    let config_ai = ctx.accounts.config.to_account_info();
    let config_bump = ctx.accounts.config.bump;
    let position_id = ctx.accounts.config.next_position_id;
    let position_bump = ctx.bumps.position;
    let metadata_bump = ctx.bumps.metadata;

    let accounts = &mut *ctx.accounts;

    let record = &mut accounts.metadata;
    record.collection = config_key;
    record.token_id = position_id;
    record.entries = Vec::new();
    record.bump = metadata_bump;

    let mut escrow = TokenEscrow {
        token_program: accounts.token_program.to_account_info(),
        vault: accounts.vault.to_account_info(),
        vault_balance: accounts.vault.amount,
        holder: accounts.owner_token_account.to_account_info(),
        holder_owner: accounts.owner_token_account.owner,
        holder_balance: accounts.owner_token_account.amount,
        holder_authority: accounts.owner.to_account_info(),
        config: config_ai.clone(),
        config_bump,
    };
    let mut receipts = ReceiptToken {
        token_program: accounts.token_program.to_account_info(),
        access: &accounts.access,
        config: config_ai,
        config_bump,
        position_id,
        mint: accounts.receipt_mint.to_account_info(),
        holding: &accounts.receipt_holding,
    };
    let mut registry = RecordRegistry {
        writer: config_key,
        access: &accounts.access,
        record: &mut accounts.metadata,
    };
    let mut ledger = ProgramLedger {
        config: &mut accounts.config,
        position: &mut accounts.position,
        receipt_mint: accounts.receipt_mint.key(),
        bump: position_bump,
    };

    let out = engine::create(
        &mut ledger,
        &mut escrow,
        &mut receipts,
        &mut registry,
        &owner,
        &input,
        now,
    )?;

    msg!(
        "position {} created: {} schedules, {} escrowed",
        out.position_id,
        input.schedules.len(),
        out.escrowed_total
    );
    emit!(PositionCreated {
        position_id: out.position_id,
        owner: out.owner,
        escrowed_total: out.escrowed_total,
        receipt_mint: accounts.receipt_mint.key(),
    });

    Ok(out.position_id)
}

#[derive(Accounts)]
pub struct CreatePosition<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump = access.bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    #[account(
        init,
        payer = owner,
        space = Position::SIZE,
        seeds = [POSITION_SEED, config.key().as_ref(), &config.next_position_id.to_le_bytes()],
        bump
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(
        init,
        payer = owner,
        mint::decimals = 0,
        mint::authority = config,
        seeds = [RECEIPT_SEED, config.key().as_ref(), &config.next_position_id.to_le_bytes()],
        bump
    )]
    pub receipt_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = owner,
        token::mint = receipt_mint,
        token::authority = owner,
        seeds = [RECEIPT_HOLDING_SEED, receipt_mint.key().as_ref()],
        bump
    )]
    pub receipt_holding: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = owner,
        space = MetadataRecord::SIZE,
        seeds = [METADATA_SEED, config.key().as_ref(), &config.next_position_id.to_le_bytes()],
        bump
    )]
    pub metadata: Box<Account<'info, MetadataRecord>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, config.key().as_ref()],
        bump = config.vault_bump,
        constraint = vault.mint == config.mint @ VoucherError::InvalidTokenMint,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_account.mint == config.mint @ VoucherError::InvalidTokenMint,
        constraint = owner_token_account.owner == owner.key() @ VoucherError::InvalidTokenAccount,
    )]
    pub owner_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct PositionCreated {
    pub position_id: u64,
    pub owner: Pubkey,
    pub escrowed_total: u64,
    pub receipt_mint: Pubkey,
}
