use anchor_lang::prelude::*;

use crate::constants::MAX_SCHEDULES;
use crate::error::VoucherError;
use crate::state::{Schedule, ScheduleStatus};

/// Vesting position PDA. Never closed; a fully consumed position stays for audit.
/// Seeds: [b"position", config.key(), id.to_le_bytes()]
#[account]
pub struct Position {
    /// Sequential id, starting at 0.
    pub id: u64,
    /// Account that funded the position and received the first receipt.
    pub creator: Pubkey,
    /// Single-unit receipt mint; whoever holds the unit may redeem.
    pub receipt_mint: Pubkey,
    /// Sum of schedule amounts, fixed at creation.
    pub escrowed_total: u64,
    /// Unix seconds at creation.
    pub created_at: i64,
    /// 1..=MAX_SCHEDULES schedules, in input order.
    pub schedules: Vec<Schedule>,
    /// PDA bump seed.
    pub bump: u8,
}

impl Position {
    pub const SIZE: usize = 8 + // discriminator
        8 +  // id
        32 + // creator
        32 + // receipt_mint
        8 +  // escrowed_total
        8 +  // created_at
        4 + MAX_SCHEDULES * Schedule::SIZE + // schedules
        1;   // bump

    /// Cumulative amount transferred out across all schedules.
    pub fn released_total(&self) -> Result<u64> {
        let mut sum: u64 = 0;
        for s in self.schedules.iter() {
            sum = sum
                .checked_add(s.released()?)
                .ok_or(VoucherError::MathOverflow)?;
        }
        Ok(sum)
    }

    pub fn is_consumed(&self) -> bool {
        self.schedules
            .iter()
            .all(|s| s.remaining_amount == 0 && s.status == ScheduleStatus::Vested)
    }

    /// Applies one delta per schedule. Every delta is checked before any
    /// schedule is written, so a rejected redemption leaves the position as is.
    /// Returns the total released by this call.
    pub fn apply_redemption(&mut self, deltas: &[ScheduleRedemption]) -> Result<u64> {
        require!(
            deltas.len() == self.schedules.len(),
            VoucherError::ScheduleCountMismatch
        );

        let mut remaining = Vec::with_capacity(deltas.len());
        let mut total: u64 = 0;
        for (s, d) in self.schedules.iter().zip(deltas.iter()) {
            remaining.push(
                s.remaining_amount
                    .checked_sub(d.delta)
                    .ok_or(VoucherError::MathOverflow)?,
            );
            total = total
                .checked_add(d.delta)
                .ok_or(VoucherError::MathOverflow)?;
        }

        let released = self
            .released_total()?
            .checked_add(total)
            .ok_or(VoucherError::MathOverflow)?;
        require!(
            released <= self.escrowed_total,
            VoucherError::MathOverflow
        );

        for ((s, d), r) in self
            .schedules
            .iter_mut()
            .zip(deltas.iter())
            .zip(remaining.into_iter())
        {
            s.remaining_amount = r;
            s.status = d.status;
        }
        Ok(total)
    }
}

/// Ledger update for one schedule, produced by redemption planning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleRedemption {
    pub delta: u64,
    pub status: ScheduleStatus,
}
