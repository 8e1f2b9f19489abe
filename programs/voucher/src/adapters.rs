//! Engine collaborators backed by program accounts and SPL Token CPIs.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, MintTo, TokenAccount, Transfer};

use crate::constants::CONFIG_SEED;
use crate::engine::{Escrow, MetadataRegistry, PositionLedger, PositionToken};
use crate::error::VoucherError;
use crate::state::{
    AccessControl, MetadataRecord, Position, ScheduleRedemption, ScheduleSet, VoucherConfig,
};
use crate::utils::capability;

/// Moves the escrowed mint between one holder token account and the vault.
/// Pushes are signed by the config PDA, which owns the vault.
pub struct TokenEscrow<'info> {
    pub token_program: AccountInfo<'info>,
    pub vault: AccountInfo<'info>,
    pub vault_balance: u64,
    /// Holder's token account for the escrowed mint.
    pub holder: AccountInfo<'info>,
    pub holder_owner: Pubkey,
    pub holder_balance: u64,
    /// Signer allowed to move funds out of `holder`.
    pub holder_authority: AccountInfo<'info>,
    pub config: AccountInfo<'info>,
    pub config_bump: u8,
}

impl<'info> Escrow for TokenEscrow<'info> {
    fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(self.holder_owner, *from, VoucherError::InvalidTokenAccount);
        require!(
            self.holder_balance >= amount,
            VoucherError::InsufficientFunds
        );

        token::transfer(
            CpiContext::new(
                self.token_program.clone(),
                Transfer {
                    from: self.holder.clone(),
                    to: self.vault.clone(),
                    authority: self.holder_authority.clone(),
                },
            ),
            amount,
        )?;

        self.holder_balance -= amount;
        self.vault_balance = self
            .vault_balance
            .checked_add(amount)
            .ok_or(VoucherError::MathOverflow)?;
        Ok(())
    }

    fn push(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(self.holder_owner, *to, VoucherError::InvalidTokenAccount);
        require!(
            self.vault_balance >= amount,
            VoucherError::InsufficientVaultBalance
        );

        let bump = [self.config_bump];
        let seeds: &[&[u8]] = &[CONFIG_SEED, &bump];
        let signer_seeds: &[&[&[u8]]] = &[seeds];
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault.clone(),
                    to: self.holder.clone(),
                    authority: self.config.clone(),
                },
                signer_seeds,
            ),
            amount,
        )?;

        self.vault_balance -= amount;
        self.holder_balance = self
            .holder_balance
            .checked_add(amount)
            .ok_or(VoucherError::MathOverflow)?;
        Ok(())
    }
}

/// The single-unit receipt mint of one position, seen through one holding
/// token account. Minting requires the config PDA to hold MINTER.
pub struct ReceiptToken<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub access: &'a AccessControl,
    pub config: AccountInfo<'info>,
    pub config_bump: u8,
    pub position_id: u64,
    pub mint: AccountInfo<'info>,
    pub holding: &'a Account<'info, TokenAccount>,
}

impl<'a, 'info> PositionToken for ReceiptToken<'a, 'info> {
    fn collection(&self) -> Pubkey {
        self.config.key()
    }

    fn mint(&mut self, to: &Pubkey, position_id: u64) -> Result<()> {
        self.access
            .require(&self.config.key(), &capability::minter())?;
        require!(
            position_id == self.position_id,
            VoucherError::PositionNotFound
        );
        require_keys_eq!(self.holding.owner, *to, VoucherError::InvalidTokenAccount);
        require_keys_eq!(
            self.holding.mint,
            self.mint.key(),
            VoucherError::InvalidTokenMint
        );

        let bump = [self.config_bump];
        let seeds: &[&[u8]] = &[CONFIG_SEED, &bump];
        let signer_seeds: &[&[&[u8]]] = &[seeds];
        token::mint_to(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: self.mint.clone(),
                    to: self.holding.to_account_info(),
                    authority: self.config.clone(),
                },
                signer_seeds,
            ),
            1,
        )
    }

    /// Owner of the presented holding if it carries the receipt unit,
    /// otherwise the default key (which never matches a signer).
    fn owner_of(&self, position_id: u64) -> Result<Pubkey> {
        require!(
            position_id == self.position_id,
            VoucherError::PositionNotFound
        );
        Ok(receipt_holder(
            self.holding.owner,
            self.holding.mint,
            self.holding.amount,
            &self.mint.key(),
        ))
    }
}

/// Owner of a token account that carries the single unit of `receipt_mint`,
/// otherwise the default key.
pub fn receipt_holder(
    holding_owner: Pubkey,
    holding_mint: Pubkey,
    holding_amount: u64,
    receipt_mint: &Pubkey,
) -> Pubkey {
    if holding_mint == *receipt_mint && holding_amount == 1 {
        holding_owner
    } else {
        Pubkey::default()
    }
}

/// Ledger over the config counter and one position account.
pub struct ProgramLedger<'a> {
    pub config: &'a mut VoucherConfig,
    pub position: &'a mut Position,
    pub receipt_mint: Pubkey,
    pub bump: u8,
}

impl<'a> PositionLedger for ProgramLedger<'a> {
    fn allocate(&mut self, creator: &Pubkey, set: ScheduleSet, created_at: i64) -> Result<u64> {
        let id = self.config.next_position_id;

        self.position.id = id;
        self.position.creator = *creator;
        self.position.receipt_mint = self.receipt_mint;
        self.position.escrowed_total = set.escrowed_total;
        self.position.created_at = created_at;
        self.position.schedules = set.schedules;
        self.position.bump = self.bump;

        self.config.next_position_id = id.checked_add(1).ok_or(VoucherError::MathOverflow)?;
        self.config.escrowed_outstanding = self
            .config
            .escrowed_outstanding
            .checked_add(set.escrowed_total)
            .ok_or(VoucherError::MathOverflow)?;
        Ok(id)
    }

    fn get(&self, position_id: u64) -> Result<&Position> {
        require!(
            self.position.id == position_id && !self.position.schedules.is_empty(),
            VoucherError::PositionNotFound
        );
        Ok(&*self.position)
    }

    fn apply_redemption(
        &mut self,
        position_id: u64,
        deltas: &[ScheduleRedemption],
    ) -> Result<u64> {
        require!(
            self.position.id == position_id,
            VoucherError::PositionNotFound
        );
        let total = self.position.apply_redemption(deltas)?;
        self.config.escrowed_outstanding = self
            .config
            .escrowed_outstanding
            .checked_sub(total)
            .ok_or(VoucherError::MathOverflow)?;
        Ok(total)
    }
}

/// Registry writes into one position's metadata record, gated on `writer`
/// holding WRITER. During creation the writer is the config PDA.
pub struct RecordRegistry<'a> {
    pub writer: Pubkey,
    pub access: &'a AccessControl,
    pub record: &'a mut MetadataRecord,
}

impl<'a> RecordRegistry<'a> {
    fn check(&self, collection: &Pubkey, token_id: u64) -> Result<()> {
        self.access.require(&self.writer, &capability::writer())?;
        require_keys_eq!(
            self.record.collection,
            *collection,
            VoucherError::PositionNotFound
        );
        require!(
            self.record.token_id == token_id,
            VoucherError::PositionNotFound
        );
        Ok(())
    }

    /// Write on behalf of `requester`, who must be `holder`, the current owner
    /// of the token.
    pub fn safe_write(
        &mut self,
        requester: &Pubkey,
        holder: &Pubkey,
        collection: &Pubkey,
        token_id: u64,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        self.check(collection, token_id)?;
        self.record.safe_write(requester, holder, key, value)
    }
}

impl<'a> MetadataRegistry for RecordRegistry<'a> {
    fn write(
        &mut self,
        requester: &Pubkey,
        collection: &Pubkey,
        token_id: u64,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        self.check(collection, token_id)?;
        self.record.write(requester, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Grant, ScheduleInput, ScheduleStatus, VestingInput};
    use anchor_lang::error::Error;

    const T0: i64 = 1_767_225_600; // 2026-01-01 00:00:00 UTC

    fn config(next_position_id: u64, escrowed_outstanding: u64) -> VoucherConfig {
        VoucherConfig {
            mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            next_position_id,
            escrowed_outstanding,
            bump: 254,
            vault_bump: 253,
        }
    }

    fn blank_position() -> Position {
        Position {
            id: 0,
            creator: Pubkey::default(),
            receipt_mint: Pubkey::default(),
            escrowed_total: 0,
            created_at: 0,
            schedules: Vec::new(),
            bump: 0,
        }
    }

    fn set(amounts: &[u64]) -> ScheduleSet {
        let schedules: Vec<ScheduleInput> = amounts
            .iter()
            .map(|&amount| ScheduleInput {
                amount,
                kind: 2,
                granularity: 0,
                start_time: T0,
                end_time: 0,
            })
            .collect();
        ScheduleSet::validate(&VestingInput {
            balance: amounts.iter().sum(),
            schedules,
            record_metadata: false,
        })
        .unwrap()
    }

    fn access_with(account: Pubkey, capability: [u8; 32]) -> AccessControl {
        AccessControl {
            grants: vec![Grant {
                account,
                capability,
            }],
            bump: 255,
        }
    }

    fn record(collection: Pubkey, token_id: u64) -> MetadataRecord {
        MetadataRecord {
            collection,
            token_id,
            entries: Vec::new(),
            bump: 255,
        }
    }

    #[test]
    fn ledger_allocates_and_tracks_outstanding() {
        let mut cfg = config(3, 500);
        let mut position = blank_position();
        let receipt_mint = Pubkey::new_unique();
        let creator = Pubkey::new_unique();
        let mut ledger = ProgramLedger {
            config: &mut cfg,
            position: &mut position,
            receipt_mint,
            bump: 251,
        };

        assert_eq!(
            ledger.get(0).err(),
            Some(Error::from(VoucherError::PositionNotFound))
        );

        let id = ledger.allocate(&creator, set(&[100, 40]), T0).unwrap();
        assert_eq!(id, 3);
        assert_eq!(ledger.get(3).unwrap().escrowed_total, 140);
        assert_eq!(
            ledger.get(4).err(),
            Some(Error::from(VoucherError::PositionNotFound))
        );

        let released = ledger
            .apply_redemption(
                3,
                &[
                    ScheduleRedemption {
                        delta: 100,
                        status: ScheduleStatus::Vested,
                    },
                    ScheduleRedemption {
                        delta: 0,
                        status: ScheduleStatus::Unvested,
                    },
                ],
            )
            .unwrap();
        assert_eq!(released, 100);

        assert_eq!(cfg.next_position_id, 4);
        assert_eq!(cfg.escrowed_outstanding, 500 + 140 - 100);
        assert_eq!(position.id, 3);
        assert_eq!(position.creator, creator);
        assert_eq!(position.receipt_mint, receipt_mint);
        assert_eq!(position.created_at, T0);
        assert_eq!(position.bump, 251);
        assert_eq!(position.released_total().unwrap(), 100);
    }

    #[test]
    fn ledger_rejects_other_ids() {
        let mut cfg = config(0, 0);
        let mut position = blank_position();
        let mut ledger = ProgramLedger {
            config: &mut cfg,
            position: &mut position,
            receipt_mint: Pubkey::new_unique(),
            bump: 255,
        };
        ledger.allocate(&Pubkey::new_unique(), set(&[10]), T0).unwrap();

        let delta = [ScheduleRedemption {
            delta: 10,
            status: ScheduleStatus::Vested,
        }];
        assert_eq!(
            ledger.apply_redemption(1, &delta).unwrap_err(),
            Error::from(VoucherError::PositionNotFound)
        );
        assert_eq!(cfg.escrowed_outstanding, 10);
        assert_eq!(position.schedules[0].remaining_amount, 10);
    }

    #[test]
    fn receipt_holder_needs_the_unit() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(receipt_holder(owner, mint, 1, &mint), owner);
        assert_eq!(receipt_holder(owner, mint, 0, &mint), Pubkey::default());
        assert_eq!(
            receipt_holder(owner, Pubkey::new_unique(), 1, &mint),
            Pubkey::default()
        );
    }

    #[test]
    fn safe_write_checks_writer_then_owner() {
        let collection = Pubkey::new_unique();
        let writer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let key = capability::content_id("foobar");

        // Missing WRITER fails before ownership is looked at.
        let access = access_with(writer, capability::minter());
        let mut rec = record(collection, 5);
        let mut registry = RecordRegistry {
            writer,
            access: &access,
            record: &mut rec,
        };
        assert_eq!(
            registry
                .safe_write(&owner, &owner, &collection, 5, key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::MissingCapability)
        );

        let access = access_with(writer, capability::writer());
        let mut rec = record(collection, 5);
        let mut registry = RecordRegistry {
            writer,
            access: &access,
            record: &mut rec,
        };
        assert_eq!(
            registry
                .safe_write(&Pubkey::default(), &owner, &collection, 5, key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotOwner)
        );
        assert_eq!(
            registry
                .safe_write(&Pubkey::new_unique(), &owner, &collection, 5, key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotOwner)
        );
        assert_eq!(
            registry
                .safe_write(&owner, &owner, &collection, 6, key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::PositionNotFound)
        );

        registry
            .safe_write(&owner, &owner, &collection, 5, key, vec![4, 2])
            .unwrap();
        assert_eq!(rec.read(&key), vec![4, 2]);
    }

    #[test]
    fn plain_write_skips_ownership() {
        let collection = Pubkey::new_unique();
        let writer = Pubkey::new_unique();
        let access = access_with(writer, capability::writer());
        let mut rec = record(collection, 0);
        let key = capability::content_id("foobar");

        let mut registry = RecordRegistry {
            writer,
            access: &access,
            record: &mut rec,
        };
        registry
            .write(&Pubkey::new_unique(), &collection, 0, key, vec![9])
            .unwrap();
        assert_eq!(
            registry
                .write(&Pubkey::default(), &collection, 0, key, vec![9])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotLive)
        );
        assert_eq!(rec.read(&key), vec![9]);
    }
}
