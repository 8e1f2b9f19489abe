use anchor_lang::prelude::*;

use crate::constants::{ACCESS_SEED, CONFIG_SEED};
use crate::state::{AccessControl, VoucherConfig};
use crate::utils::capability;

pub fn process_grant_capability(
    ctx: Context<ManageCapability>,
    capability_id: [u8; 32],
    account: Pubkey,
) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let access = &mut ctx.accounts.access;
    access.require(&admin, &capability::admin())?;

    // Granting twice is a no-op.
    if access.grant(account, capability_id)? {
        emit!(CapabilityGranted {
            capability: capability_id,
            account,
            admin,
        });
    }
    Ok(())
}

#[derive(Accounts)]
pub struct ManageCapability<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, VoucherConfig>,

    #[account(
        mut,
        seeds = [ACCESS_SEED, config.key().as_ref()],
        bump = access.bump
    )]
    pub access: Box<Account<'info, AccessControl>>,

    pub admin: Signer<'info>,
}

#[event]
pub struct CapabilityGranted {
    pub capability: [u8; 32],
    pub account: Pubkey,
    pub admin: Pubkey,
}
