use anchor_lang::prelude::*;

/// Singleton program configuration PDA. Also the program's signing identity:
/// vault authority, receipt mint authority, and the holder of MINTER/WRITER.
/// Seeds: [b"config"]
#[account]
pub struct VoucherConfig {
    /// Fungible mint escrowed by every position.
    pub mint: Pubkey,
    /// Vault token account holding escrowed balances.
    pub vault: Pubkey,
    /// Id assigned to the next created position.
    pub next_position_id: u64,
    /// Total currently escrowed across all positions.
    pub escrowed_outstanding: u64,
    pub bump: u8,
    pub vault_bump: u8,
}

impl VoucherConfig {
    pub const SIZE: usize =
        32 + // mint
        32 + // vault
        8 +  // next_position_id
        8 +  // escrowed_outstanding
        1 +  // bump
        1;   // vault_bump
}
