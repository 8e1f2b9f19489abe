//! Position creation and redemption.
//!
//! The engine only orders effects; balances, receipts and records live behind
//! the collaborator traits below. Effects run in a fixed order (escrow pull,
//! ledger allocation, receipt mint, metadata on create; ledger update, escrow
//! push on redeem) and every failure is propagated, so the transaction that
//! hosts a call reverts all of them together.

use anchor_lang::prelude::*;

use crate::error::VoucherError;
use crate::state::{Position, ScheduleRedemption, ScheduleSet, VestingInput};
use crate::utils::capability;
use crate::utils::vesting::{status_after, vested_amount};

#[cfg(test)]
mod memory;

/// Custody of the escrowed fungible balance.
pub trait Escrow {
    /// Moves `amount` from `from` into custody.
    fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<()>;
    /// Moves `amount` out of custody to `to`.
    fn push(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
}

/// Receipt tokens, one per position.
pub trait PositionToken {
    /// Identity of the receipt collection.
    fn collection(&self) -> Pubkey;
    fn mint(&mut self, to: &Pubkey, position_id: u64) -> Result<()>;
    fn owner_of(&self, position_id: u64) -> Result<Pubkey>;
}

/// Key/value records attached to receipt tokens.
pub trait MetadataRegistry {
    fn write(
        &mut self,
        requester: &Pubkey,
        collection: &Pubkey,
        token_id: u64,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()>;
}

/// Persistent position records.
pub trait PositionLedger {
    /// Stores a new position and returns its id.
    fn allocate(&mut self, creator: &Pubkey, set: ScheduleSet, created_at: i64) -> Result<u64>;
    fn get(&self, position_id: u64) -> Result<&Position>;
    /// All-or-nothing; returns the total released by this update.
    fn apply_redemption(
        &mut self,
        position_id: u64,
        deltas: &[ScheduleRedemption],
    ) -> Result<u64>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreateOutcome {
    pub position_id: u64,
    pub owner: Pubkey,
    pub escrowed_total: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedeemOutcome {
    pub position_id: u64,
    pub caller: Pubkey,
    pub amount: u64,
}

/// What a redemption at a given instant would do, without doing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedemptionPlan {
    pub deltas: Vec<ScheduleRedemption>,
    /// Sum of vested amounts at the instant.
    pub vested: u64,
    /// Sum already released before this redemption.
    pub released: u64,
    /// Sum of deltas.
    pub redeemable: u64,
}

pub fn create<L, E, T, M>(
    ledger: &mut L,
    escrow: &mut E,
    token: &mut T,
    registry: &mut M,
    caller: &Pubkey,
    input: &VestingInput,
    now: i64,
) -> Result<CreateOutcome>
where
    L: PositionLedger,
    E: Escrow,
    T: PositionToken,
    M: MetadataRegistry,
{
    let set = ScheduleSet::validate(input)?;
    let escrowed_total = set.escrowed_total;
    let metadata = if input.record_metadata {
        Some(encode_schedules(&set)?)
    } else {
        None
    };

    escrow.pull(caller, escrowed_total)?;
    let position_id = ledger.allocate(caller, set, now)?;
    token.mint(caller, position_id)?;
    if let Some(value) = metadata {
        let collection = token.collection();
        registry.write(
            caller,
            &collection,
            position_id,
            capability::schedules_metadata_key(),
            value,
        )?;
    }

    Ok(CreateOutcome {
        position_id,
        owner: *caller,
        escrowed_total,
    })
}

pub fn redeem<L, E, T>(
    ledger: &mut L,
    escrow: &mut E,
    token: &T,
    caller: &Pubkey,
    position_id: u64,
    now: i64,
) -> Result<RedeemOutcome>
where
    L: PositionLedger,
    E: Escrow,
    T: PositionToken,
{
    let plan = {
        let position = ledger.get(position_id)?;

        let holder = token.owner_of(position_id)?;
        if holder != *caller {
            msg!(
                "account {} does not hold the receipt of position {}",
                caller,
                position_id
            );
            return err!(VoucherError::NotReceiptHolder);
        }

        plan_redemption(position, now)?
    };
    require!(plan.redeemable > 0, VoucherError::NothingToRedeem);

    let amount = ledger.apply_redemption(position_id, &plan.deltas)?;
    escrow.push(caller, amount)?;

    Ok(RedeemOutcome {
        position_id,
        caller: *caller,
        amount,
    })
}

/// Evaluates every schedule of `position` at `now`.
///
/// A schedule whose vested amount is below what it already released (the
/// clock went backwards) contributes nothing and keeps its status.
pub fn plan_redemption(position: &Position, now: i64) -> Result<RedemptionPlan> {
    let mut deltas = Vec::with_capacity(position.schedules.len());
    let mut vested_sum: u64 = 0;
    let mut released_sum: u64 = 0;
    let mut redeemable: u64 = 0;

    for s in position.schedules.iter() {
        let vested = vested_amount(s, now)?;
        let released = s.released()?;
        let delta = vested.saturating_sub(released);
        let remaining = s
            .remaining_amount
            .checked_sub(delta)
            .ok_or(VoucherError::MathOverflow)?;

        deltas.push(ScheduleRedemption {
            delta,
            status: status_after(vested.max(released), remaining),
        });
        vested_sum = vested_sum
            .checked_add(vested)
            .ok_or(VoucherError::MathOverflow)?;
        released_sum = released_sum
            .checked_add(released)
            .ok_or(VoucherError::MathOverflow)?;
        redeemable = redeemable
            .checked_add(delta)
            .ok_or(VoucherError::MathOverflow)?;
    }

    Ok(RedemptionPlan {
        deltas,
        vested: vested_sum,
        released: released_sum,
        redeemable,
    })
}

/// Borsh encoding of the schedules, as recorded in the metadata registry.
pub fn encode_schedules(set: &ScheduleSet) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    AnchorSerialize::serialize(&set.schedules, &mut buf)
        .map_err(|_| VoucherError::MetadataValueTooLarge)?;
    Ok(buf)
}
