use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::adapters::{ProgramLedger, ReceiptToken, TokenEscrow};
use crate::constants::{ACCESS_SEED, CONFIG_SEED, POSITION_SEED, VAULT_SEED};
use crate::engine;
use crate::error::VoucherError;
use crate::state::{AccessControl, Position, VoucherConfig};

pub fn process_redeem(ctx: Context<Redeem>, position_id: u64) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;

    // Read before `accounts` is borrowed mutably below.
    let caller = ctx.accounts.caller.key();
    let config_ai = ctx.accounts.config.to_account_info();
    let config_bump = ctx.accounts.config.bump;
    let position_bump = ctx.accounts.position.bump;

    let accounts = &mut *ctx.accounts;

    let mut escrow = TokenEscrow {
        token_program: accounts.token_program.to_account_info(),
        vault: accounts.vault.to_account_info(),
        vault_balance: accounts.vault.amount,
        holder: accounts.caller_token_account.to_account_info(),
        holder_owner: accounts.caller_token_account.owner,
        holder_balance: accounts.caller_token_account.amount,
        holder_authority: accounts.caller.to_account_info(),
        config: config_ai.clone(),
        config_bump,
    };
    let receipts = ReceiptToken {
        token_program: accounts.token_program.to_account_info(),
        access: &accounts.access,
        config: config_ai,
        config_bump,
        position_id,
        mint: accounts.receipt_mint.to_account_info(),
        holding: &accounts.receipt_holding,
    };
    let mut ledger = ProgramLedger {
        config: &mut accounts.config,
        position: &mut accounts.position,
        receipt_mint: accounts.receipt_mint.key(),
        bump: position_bump,
    };

    let out = engine::redeem(&mut ledger, &mut escrow, &receipts, &caller, position_id, now)?;

    msg!(
        "position {} redeemed {} to {}",
        out.position_id,
        out.amount,
        out.caller
    );
    if accounts.position.is_consumed() {
        msg!("position {} fully released", out.position_id);
    }
    emit!(PositionRedeemed {
        position_id: out.position_id,
        caller: out.caller,
        amount: out.amount,
        released_total: accounts.position.released_total()?,
    });

    Ok(out.amount)
}

#[derive(Accounts)]
#[instruction(position_id: u64)]
pub struct Redeem<'info> {
    #[account(mut, seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump = access.bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, config.key().as_ref(), &position_id.to_le_bytes()],
        bump = position.bump
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(address = position.receipt_mint @ VoucherError::InvalidTokenMint)]
    pub receipt_mint: Box<Account<'info, Mint>>,

    /// Any token account of the receipt mint; the engine checks it carries the unit.
    #[account(constraint = receipt_holding.mint == receipt_mint.key() @ VoucherError::InvalidTokenMint)]
    pub receipt_holding: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, config.key().as_ref()],
        bump = config.vault_bump,
        constraint = vault.mint == config.mint @ VoucherError::InvalidTokenMint,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = caller_token_account.mint == config.mint @ VoucherError::InvalidTokenMint,
    )]
    pub caller_token_account: Box<Account<'info, TokenAccount>>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct PositionRedeemed {
    pub position_id: u64,
    pub caller: Pubkey,
    pub amount: u64,
    pub released_total: u64,
}
