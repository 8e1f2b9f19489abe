use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{ACCESS_SEED, CONFIG_SEED, MAX_GRANTS, VAULT_SEED};
use crate::state::{AccessControl, VoucherConfig};
use crate::utils::capability;

pub fn process_initialize(ctx: Context<Initialize>) -> Result<()> {
    let admin = ctx.accounts.admin.key();

    let cfg = &mut ctx.accounts.config;
    cfg.mint = ctx.accounts.mint.key();
    cfg.vault = ctx.accounts.vault.key();
    cfg.next_position_id = 0;
    cfg.escrowed_outstanding = 0;
    cfg.bump = ctx.bumps.config;
    cfg.vault_bump = ctx.bumps.vault;

    // Initializer becomes the first admin; MINTER/WRITER for the config PDA
    // are granted separately.
    let access = &mut ctx.accounts.access;
    access.grants = Vec::with_capacity(MAX_GRANTS);
    access.bump = ctx.bumps.access;
    access.grant(admin, capability::admin())?;

    emit!(VoucherInitialized {
        admin,
        config: cfg.key(),
        mint: cfg.mint,
        vault: cfg.vault,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + VoucherConfig::SIZE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, VoucherConfig>,

    #[account(
        init,
        payer = admin,
        space = AccessControl::SIZE,
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    #[account(
        init,
        payer = admin,
        token::mint = mint,
        token::authority = config,
        seeds = [VAULT_SEED, config.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct VoucherInitialized {
    pub admin: Pubkey,
    pub config: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
}
