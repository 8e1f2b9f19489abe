//! Per-schedule vesting math. Pure: the instant is always a parameter.
//! - Linear: `floor(elapsed / period)` equal steps out of
//!   `max(1, floor(duration / period))`; the final step and any remainder
//!   vest only once `now >= end_time`.
//! - Staged: single cliff, full amount once `now >= start_time`.

use crate::error::VoucherError;
use crate::state::{Granularity, ReleaseRule, Schedule, ScheduleStatus};

/// Amount of `schedule` vested as of `now`. Monotonic non-decreasing in `now`,
/// never above `schedule.amount`.
pub fn vested_amount(schedule: &Schedule, now: i64) -> Result<u64, VoucherError> {
    match schedule.rule {
        ReleaseRule::Linear { granularity } => linear_vested(
            schedule.amount,
            granularity,
            schedule.start_time,
            schedule.end_time,
            now,
        ),
        ReleaseRule::Staged => Ok(staged_vested(schedule.amount, schedule.start_time, now)),
    }
}

fn linear_vested(
    amount: u64,
    granularity: Granularity,
    start_ts: i64,
    end_ts: i64,
    now: i64,
) -> Result<u64, VoucherError> {
    if now >= end_ts {
        return Ok(amount);
    }
    if now <= start_ts {
        return Ok(0);
    }

    // start < now < end, so both spans are positive and fit in u64.
    let period = granularity.period() as u64;
    let elapsed = (now as i128 - start_ts as i128) as u64;
    let duration = (end_ts as i128 - start_ts as i128) as u64;

    // The last step only completes at `end_ts`.
    let steps_total = (duration / period).max(1);
    let steps_elapsed = (elapsed / period).min(steps_total - 1);

    let v = (amount as u128)
        .checked_mul(steps_elapsed as u128)
        .ok_or(VoucherError::MathOverflow)?
        / (steps_total as u128);
    let v = u64::try_from(v).map_err(|_| VoucherError::MathOverflow)?;
    Ok(v.min(amount))
}

fn staged_vested(amount: u64, start_ts: i64, now: i64) -> u64 {
    if now >= start_ts {
        amount
    } else {
        0
    }
}

/// Status after a redemption that leaves `remaining` unreleased with `vested`
/// already accrued.
pub fn status_after(vested: u64, remaining: u64) -> ScheduleStatus {
    if remaining == 0 {
        ScheduleStatus::Vested
    } else if vested == 0 {
        ScheduleStatus::Unvested
    } else {
        ScheduleStatus::Vesting
    }
}
