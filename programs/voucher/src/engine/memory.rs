//! In-memory collaborators for exercising the engine off-chain. `Host`
//! snapshots every collaborator before a call and restores the snapshot when
//! the call fails, the way a reverted transaction does.

use std::collections::{BTreeMap, HashMap};

use anchor_lang::prelude::*;

use super::{
    CreateOutcome, Escrow, MetadataRegistry, PositionLedger, PositionToken, RedeemOutcome,
};
use crate::error::VoucherError;
use crate::state::{
    AccessControl, MetadataRecord, Position, ScheduleRedemption, ScheduleSet, VestingInput,
};
use crate::utils::capability::{self, ContentId};

#[derive(Clone, Default)]
pub struct MemoryLedger {
    pub positions: BTreeMap<u64, Position>,
    pub next_id: u64,
}

impl PositionLedger for MemoryLedger {
    fn allocate(&mut self, creator: &Pubkey, set: ScheduleSet, created_at: i64) -> Result<u64> {
        let id = self.next_id;
        self.positions.insert(
            id,
            Position {
                id,
                creator: *creator,
                receipt_mint: Pubkey::default(),
                escrowed_total: set.escrowed_total,
                created_at,
                schedules: set.schedules,
                bump: 0,
            },
        );
        self.next_id = id.checked_add(1).ok_or(VoucherError::MathOverflow)?;
        Ok(id)
    }

    fn get(&self, position_id: u64) -> Result<&Position> {
        Ok(self
            .positions
            .get(&position_id)
            .ok_or(VoucherError::PositionNotFound)?)
    }

    fn apply_redemption(
        &mut self,
        position_id: u64,
        deltas: &[ScheduleRedemption],
    ) -> Result<u64> {
        self.positions
            .get_mut(&position_id)
            .ok_or(VoucherError::PositionNotFound)?
            .apply_redemption(deltas)
    }
}

#[derive(Clone, Default)]
pub struct MemoryEscrow {
    pub balances: HashMap<Pubkey, u64>,
    pub custody: u64,
}

impl MemoryEscrow {
    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}

impl Escrow for MemoryEscrow {
    fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        let balance = self.balance(from);
        require!(balance >= amount, VoucherError::InsufficientFunds);
        self.balances.insert(*from, balance - amount);
        self.custody = self
            .custody
            .checked_add(amount)
            .ok_or(VoucherError::MathOverflow)?;
        Ok(())
    }

    fn push(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        require!(self.custody >= amount, VoucherError::InsufficientVaultBalance);
        self.custody -= amount;
        let balance = self.balance(to);
        self.balances.insert(
            *to,
            balance.checked_add(amount).ok_or(VoucherError::MathOverflow)?,
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryReceipts {
    pub collection: Pubkey,
    /// Identity the engine mints as.
    pub engine: Pubkey,
    pub access: AccessControl,
    pub owners: BTreeMap<u64, Pubkey>,
}

impl PositionToken for MemoryReceipts {
    fn collection(&self) -> Pubkey {
        self.collection
    }

    fn mint(&mut self, to: &Pubkey, position_id: u64) -> Result<()> {
        self.access.require(&self.engine, &capability::minter())?;
        self.owners.insert(position_id, *to);
        Ok(())
    }

    fn owner_of(&self, position_id: u64) -> Result<Pubkey> {
        Ok(*self
            .owners
            .get(&position_id)
            .ok_or(VoucherError::PositionNotFound)?)
    }
}

#[derive(Clone)]
pub struct MemoryRegistry {
    pub engine: Pubkey,
    pub access: AccessControl,
    pub records: BTreeMap<(Pubkey, u64), MetadataRecord>,
}

impl MetadataRegistry for MemoryRegistry {
    fn write(
        &mut self,
        requester: &Pubkey,
        collection: &Pubkey,
        token_id: u64,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        self.access.require(&self.engine, &capability::writer())?;
        self.records
            .entry((*collection, token_id))
            .or_insert_with(|| MetadataRecord {
                collection: *collection,
                token_id,
                entries: Vec::new(),
                bump: 0,
            })
            .write(requester, key, value)
    }
}

#[derive(Clone)]
pub struct Host {
    pub ledger: MemoryLedger,
    pub escrow: MemoryEscrow,
    pub receipts: MemoryReceipts,
    pub registry: MemoryRegistry,
}

impl Host {
    /// Engine holding the given capabilities.
    pub fn with_capabilities(capabilities: &[ContentId]) -> Self {
        let engine = Pubkey::new_unique();
        let mut access = AccessControl {
            grants: Vec::new(),
            bump: 0,
        };
        for c in capabilities {
            access.grants.push(crate::state::Grant {
                account: engine,
                capability: *c,
            });
        }
        Self {
            ledger: MemoryLedger::default(),
            escrow: MemoryEscrow::default(),
            receipts: MemoryReceipts {
                collection: Pubkey::new_unique(),
                engine,
                access: access.clone(),
                owners: BTreeMap::new(),
            },
            registry: MemoryRegistry {
                engine,
                access,
                records: BTreeMap::new(),
            },
        }
    }

    /// Engine provisioned with MINTER and WRITER.
    pub fn new() -> Self {
        Self::with_capabilities(&[capability::minter(), capability::writer()])
    }

    pub fn fund(&mut self, account: &Pubkey, amount: u64) {
        self.escrow.balances.insert(*account, amount);
    }

    pub fn create(
        &mut self,
        caller: &Pubkey,
        input: &VestingInput,
        now: i64,
    ) -> Result<CreateOutcome> {
        self.transact(|h| {
            super::create(
                &mut h.ledger,
                &mut h.escrow,
                &mut h.receipts,
                &mut h.registry,
                caller,
                input,
                now,
            )
        })
    }

    pub fn redeem(&mut self, caller: &Pubkey, position_id: u64, now: i64) -> Result<RedeemOutcome> {
        self.transact(|h| {
            super::redeem(
                &mut h.ledger,
                &mut h.escrow,
                &h.receipts,
                caller,
                position_id,
                now,
            )
        })
    }

    pub fn transfer_receipt(&mut self, position_id: u64, to: &Pubkey) {
        self.receipts.owners.insert(position_id, *to);
    }

    pub fn position(&self, position_id: u64) -> &Position {
        &self.ledger.positions[&position_id]
    }

    fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
