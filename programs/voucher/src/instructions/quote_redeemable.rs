use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, POSITION_SEED};
use crate::engine;
use crate::state::{Position, VoucherConfig};

/// Read-only: reports what `redeem` would release right now.
pub fn process_quote_redeemable(
    ctx: Context<QuoteRedeemable>,
    position_id: u64,
) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let plan = engine::plan_redemption(&ctx.accounts.position, now)?;

    emit!(RedemptionQuote {
        position_id,
        vested: plan.vested,
        released: plan.released,
        redeemable: plan.redeemable,
        now,
    });
    Ok(plan.redeemable)
}

#[derive(Accounts)]
#[instruction(position_id: u64)]
pub struct QuoteRedeemable<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Box<Account<'info, VoucherConfig>>,

    #[account(
        seeds = [POSITION_SEED, config.key().as_ref(), &position_id.to_le_bytes()],
        bump = position.bump
    )]
    pub position: Box<Account<'info, Position>>,
}

#[event]
pub struct RedemptionQuote {
    pub position_id: u64,
    pub vested: u64,
    pub released: u64,
    pub redeemable: u64,
    pub now: i64,
}
