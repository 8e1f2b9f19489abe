pub mod capability;
pub mod vesting;
