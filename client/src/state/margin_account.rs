use {
    super::{i80f48_to_f64, Bank},
    crate::error::ClientError,
    arrayref::array_ref,
    solana_sdk::pubkey::Pubkey,
};

// Byte offsets into the marginfi v2 `MarginfiAccount` zero-copy layout
// (anchor discriminator included).
const GROUP: usize = 8;
const AUTHORITY: usize = 40;
const BALANCES: usize = 72;
const MAX_BALANCES: usize = 16;
const BALANCE_LEN: usize = 104;

// Offsets within one balance slot.
const ACTIVE: usize = 0;
const BANK: usize = 1;
const ASSET_SHARES: usize = 40;
const LIABILITY_SHARES: usize = 56;

/// Exact data length of a margin account; used as a structural filter when
/// scanning program accounts.
pub const MARGIN_ACCOUNT_LEN: usize = 2312;

/// One active balance slot of a margin account. Shares are converted to
/// base units through the bank's share value.
#[derive(Clone, Debug, PartialEq)]
pub struct Balance {
    pub bank: Pubkey,
    pub asset_shares: f64,
    pub liability_shares: f64,
}

/// The caller's position-holder account within the protocol.
#[derive(Clone, Debug, PartialEq)]
pub struct MarginAccount {
    pub group: Pubkey,
    pub authority: Pubkey,
    /// Active balance slots only; inactive slots are dropped at decode time.
    pub balances: Vec<Balance>,
}

impl MarginAccount {
    pub fn unpack(data: &[u8]) -> Result<Self, ClientError> {
        if data.len() < BALANCES + MAX_BALANCES * BALANCE_LEN {
            return Err(ClientError::Decode("margin account data"));
        }
        let mut balances = Vec::new();
        for slot in 0..MAX_BALANCES {
            let base = BALANCES + slot * BALANCE_LEN;
            if data[base + ACTIVE] == 0 {
                continue;
            }
            balances.push(Balance {
                bank: Pubkey::from(*array_ref![data, base + BANK, 32]),
                asset_shares: i80f48_to_f64(array_ref![data, base + ASSET_SHARES, 16]),
                liability_shares: i80f48_to_f64(array_ref![data, base + LIABILITY_SHARES, 16]),
            });
        }
        Ok(Self {
            group: Pubkey::from(*array_ref![data, GROUP, 32]),
            authority: Pubkey::from(*array_ref![data, AUTHORITY, 32]),
            balances,
        })
    }

    /// Authority pubkey straight from raw account bytes, for scan filters.
    pub fn authority_of(data: &[u8]) -> Option<Pubkey> {
        (data.len() >= AUTHORITY + 32).then(|| Pubkey::from(*array_ref![data, AUTHORITY, 32]))
    }

    /// Deposited balance with `bank`, in whole tokens.
    pub fn deposited(&self, bank_address: &Pubkey, bank: &Bank) -> f64 {
        self.balances
            .iter()
            .find(|balance| balance.bank == *bank_address)
            .map(|balance| {
                balance.asset_shares * bank.asset_share_value
                    / 10f64.powi(bank.mint_decimals as i32)
            })
            .unwrap_or(0.0)
    }
}
