//! Program-derived address computations. Pure functions; same inputs always
//! yield the same address and bump.

use {
    crate::constants::{ASSOCIATED_TOKEN_PROGRAM_ID, MARGINFI_PROGRAM_ID},
    solana_sdk::pubkey::Pubkey,
};

/// Seed literal for a bank's liquidity vault.
pub const LIQUIDITY_VAULT_SEED: &[u8] = b"liquidity_vault";

/// Derive the associated token account for `owner` and `mint`.
pub fn find_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Derive the liquidity vault holding a bank's deposited funds.
pub fn find_liquidity_vault(bank: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[LIQUIDITY_VAULT_SEED, bank.as_ref()], &MARGINFI_PROGRAM_ID)
}
