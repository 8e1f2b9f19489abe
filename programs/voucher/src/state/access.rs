use anchor_lang::prelude::*;

use crate::constants::MAX_GRANTS;
use crate::error::VoucherError;
use crate::utils::capability::{self, ContentId};

/// One (account, capability) pair.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grant {
    pub account: Pubkey,
    pub capability: [u8; 32],
}

impl Grant {
    pub const SIZE: usize = 32 + 32;
}

/// Authorization table: presence of a grant means (account, capability) → true.
/// Seeds: [b"access", config.key()]
#[account]
pub struct AccessControl {
    pub grants: Vec<Grant>,
    pub bump: u8,
}

impl AccessControl {
    pub const SIZE: usize = 8 + // discriminator
        4 + MAX_GRANTS * Grant::SIZE + // grants
        1; // bump

    pub fn has(&self, account: &Pubkey, capability: &ContentId) -> bool {
        self.grants
            .iter()
            .any(|g| g.account == *account && g.capability == *capability)
    }

    /// Fails with `MissingCapability`, logging which account lacks what.
    pub fn require(&self, account: &Pubkey, capability: &ContentId) -> Result<()> {
        if !self.has(account, capability) {
            msg!("{}", capability::missing_capability_reason(account, capability));
            return err!(VoucherError::MissingCapability);
        }
        Ok(())
    }

    /// Returns false when the grant already existed.
    pub fn grant(&mut self, account: Pubkey, capability: ContentId) -> Result<bool> {
        if self.has(&account, &capability) {
            return Ok(false);
        }
        require!(
            self.grants.len() < MAX_GRANTS,
            VoucherError::CapabilityTableFull
        );
        self.grants.push(Grant {
            account,
            capability,
        });
        Ok(true)
    }

    /// Returns false when there was nothing to revoke. The last ADMIN grant is
    /// never removed.
    pub fn revoke(&mut self, account: &Pubkey, capability: &ContentId) -> Result<bool> {
        let Some(idx) = self
            .grants
            .iter()
            .position(|g| g.account == *account && g.capability == *capability)
        else {
            return Ok(false);
        };

        let admin = capability::admin();
        if *capability == admin {
            let admins = self.grants.iter().filter(|g| g.capability == admin).count();
            require!(admins > 1, VoucherError::LastAdmin);
        }

        self.grants.remove(idx);
        Ok(true)
    }
}
