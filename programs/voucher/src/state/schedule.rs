use anchor_lang::prelude::*;

use crate::constants::{
    DAILY_PERIOD, MAX_SCHEDULES, MONTHLY_PERIOD, QUARTERLY_PERIOD, WEEKLY_PERIOD,
};
use crate::error::VoucherError;

/// Step size of a linear schedule.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Granularity {
    /// Length of one vesting step in seconds.
    pub const fn period(self) -> i64 {
        match self {
            Granularity::Daily => DAILY_PERIOD,
            Granularity::Weekly => WEEKLY_PERIOD,
            Granularity::Monthly => MONTHLY_PERIOD,
            Granularity::Quarterly => QUARTERLY_PERIOD,
        }
    }
}

impl TryFrom<u8> for Granularity {
    type Error = VoucherError;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            1 => Ok(Granularity::Daily),
            2 => Ok(Granularity::Weekly),
            3 => Ok(Granularity::Monthly),
            4 => Ok(Granularity::Quarterly),
            _ => Err(VoucherError::InvalidGranularity),
        }
    }
}

/// How a schedule releases its amount over time.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseRule {
    /// Equal discrete steps between `start_time` and `end_time`.
    Linear { granularity: Granularity },
    /// Released at discrete unlock points; currently a single cliff at `start_time`.
    Staged,
}

/// Wire codes are fixed: Unvested = 0, Vested = 1, Vesting = 2.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScheduleStatus {
    #[default]
    Unvested,
    Vested,
    Vesting,
}

/// One sub-allocation of a position.
///
/// Shape is frozen at creation; only `remaining_amount` and `status` change,
/// and only through redemption.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub amount: u64,
    pub rule: ReleaseRule,
    pub start_time: i64,
    pub end_time: i64,
    pub remaining_amount: u64,
    pub status: ScheduleStatus,
}

impl Schedule {
    /// Borsh size with the largest rule variant.
    pub const SIZE: usize =
        8 + // amount
        2 + // rule tag + granularity
        8 + // start_time
        8 + // end_time
        8 + // remaining_amount
        1;  // status

    /// Amount already transferred out for this schedule.
    pub fn released(&self) -> Result<u64> {
        Ok(self
            .amount
            .checked_sub(self.remaining_amount)
            .ok_or(VoucherError::MathOverflow)?)
    }
}

/// Schedule as supplied by the caller, using numeric wire codes.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleInput {
    pub amount: u64,
    /// 1 = linear, 2 = staged.
    pub kind: u8,
    /// 1 = daily, 2 = weekly, 3 = monthly, 4 = quarterly. Ignored for staged.
    pub granularity: u8,
    pub start_time: i64,
    pub end_time: i64,
}

/// Instruction input for `create_position`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VestingInput {
    /// Declared escrow; must equal the sum of schedule amounts.
    pub balance: u64,
    pub schedules: Vec<ScheduleInput>,
    /// Record the schedules in the metadata registry at creation.
    pub record_metadata: bool,
}

const LINEAR_KIND: u8 = 1;
const STAGED_KIND: u8 = 2;

/// A validated, non-empty collection of schedules and its escrow total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleSet {
    pub schedules: Vec<Schedule>,
    pub escrowed_total: u64,
}

impl ScheduleSet {
    pub fn validate(input: &VestingInput) -> Result<Self> {
        require!(!input.schedules.is_empty(), VoucherError::EmptyScheduleSet);
        require!(
            input.schedules.len() <= MAX_SCHEDULES,
            VoucherError::TooManySchedules
        );

        let mut schedules = Vec::with_capacity(input.schedules.len());
        let mut total: u64 = 0;
        for s in input.schedules.iter() {
            let schedule = parse_schedule(s)?;
            total = total
                .checked_add(schedule.amount)
                .ok_or(VoucherError::MathOverflow)?;
            schedules.push(schedule);
        }

        require!(total == input.balance, VoucherError::BalanceMismatch);

        Ok(Self {
            schedules,
            escrowed_total: total,
        })
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

fn parse_schedule(input: &ScheduleInput) -> Result<Schedule> {
    require!(input.amount > 0, VoucherError::ZeroAmount);

    let rule = match input.kind {
        LINEAR_KIND => {
            let granularity = Granularity::try_from(input.granularity)?;
            require!(
                input.end_time > input.start_time,
                VoucherError::InvalidTimeRange
            );
            ReleaseRule::Linear { granularity }
        }
        STAGED_KIND => {
            require!(input.start_time > 0, VoucherError::MissingStartTime);
            ReleaseRule::Staged
        }
        _ => return err!(VoucherError::InvalidScheduleKind),
    };

    Ok(Schedule {
        amount: input.amount,
        rule,
        start_time: input.start_time,
        end_time: input.end_time,
        remaining_amount: input.amount,
        status: ScheduleStatus::Unvested,
    })
}
