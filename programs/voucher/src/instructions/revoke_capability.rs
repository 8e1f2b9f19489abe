use anchor_lang::prelude::*;

use crate::instructions::grant_capability::ManageCapability;
use crate::utils::capability;

pub fn process_revoke_capability(
    ctx: Context<ManageCapability>,
    capability_id: [u8; 32],
    account: Pubkey,
) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let access = &mut ctx.accounts.access;
    access.require(&admin, &capability::admin())?;

    if access.revoke(&account, &capability_id)? {
        emit!(CapabilityRevoked {
            capability: capability_id,
            account,
            admin,
        });
    }
    Ok(())
}

#[event]
pub struct CapabilityRevoked {
    pub capability: [u8; 32],
    pub account: Pubkey,
    pub admin: Pubkey,
}
