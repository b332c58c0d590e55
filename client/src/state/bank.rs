use {
    super::i80f48_to_f64,
    crate::error::ClientError,
    arrayref::array_ref,
    solana_sdk::pubkey::Pubkey,
};

// Byte offsets into the marginfi v2 `Bank` zero-copy layout, counted from
// the start of the account data (anchor discriminator included).
const MINT: usize = 8;
const MINT_DECIMALS: usize = 40;
const GROUP: usize = 41;
const ASSET_SHARE_VALUE: usize = 80;
const LIABILITY_SHARE_VALUE: usize = 96;
const LIQUIDITY_VAULT: usize = 112;
const TOTAL_LIABILITY_SHARES: usize = 256;
const TOTAL_ASSET_SHARES: usize = 272;
const OPTIMAL_UTILIZATION_RATE: usize = 368;
const PLATEAU_INTEREST_RATE: usize = 384;
const MAX_INTEREST_RATE: usize = 400;
const INSURANCE_IR_FEE: usize = 432;
const PROTOCOL_IR_FEE: usize = 464;

/// Minimum data length covering every field this client reads.
pub const BANK_MIN_LEN: usize = PROTOCOL_IR_FEE + 16;

/// Interest-rate curve parameters of a bank. Rates are yearly fractions,
/// fees are fractions of the borrow rate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterestRateConfig {
    pub optimal_utilization_rate: f64,
    pub plateau_interest_rate: f64,
    pub max_interest_rate: f64,
    pub insurance_ir_fee: f64,
    pub protocol_ir_fee: f64,
}

/// Fields of a marginfi v2 `Bank` account needed for deposits, withdrawals
/// and yield reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct Bank {
    pub mint: Pubkey,
    pub mint_decimals: u8,
    pub group: Pubkey,
    /// Value of one asset share in base units.
    pub asset_share_value: f64,
    pub liability_share_value: f64,
    pub liquidity_vault: Pubkey,
    pub total_asset_shares: f64,
    pub total_liability_shares: f64,
    pub interest_rate: InterestRateConfig,
}

impl Bank {
    pub fn unpack(data: &[u8]) -> Result<Self, ClientError> {
        if data.len() < BANK_MIN_LEN {
            return Err(ClientError::Decode("bank account data"));
        }
        Ok(Self {
            mint: Pubkey::from(*array_ref![data, MINT, 32]),
            mint_decimals: data[MINT_DECIMALS],
            group: Pubkey::from(*array_ref![data, GROUP, 32]),
            asset_share_value: i80f48_to_f64(array_ref![data, ASSET_SHARE_VALUE, 16]),
            liability_share_value: i80f48_to_f64(array_ref![data, LIABILITY_SHARE_VALUE, 16]),
            liquidity_vault: Pubkey::from(*array_ref![data, LIQUIDITY_VAULT, 32]),
            total_asset_shares: i80f48_to_f64(array_ref![data, TOTAL_ASSET_SHARES, 16]),
            total_liability_shares: i80f48_to_f64(array_ref![data, TOTAL_LIABILITY_SHARES, 16]),
            interest_rate: InterestRateConfig {
                optimal_utilization_rate: i80f48_to_f64(array_ref![
                    data,
                    OPTIMAL_UTILIZATION_RATE,
                    16
                ]),
                plateau_interest_rate: i80f48_to_f64(array_ref![data, PLATEAU_INTEREST_RATE, 16]),
                max_interest_rate: i80f48_to_f64(array_ref![data, MAX_INTEREST_RATE, 16]),
                insurance_ir_fee: i80f48_to_f64(array_ref![data, INSURANCE_IR_FEE, 16]),
                protocol_ir_fee: i80f48_to_f64(array_ref![data, PROTOCOL_IR_FEE, 16]),
            },
        })
    }

    /// Total deposited liquidity in base units.
    pub fn total_assets(&self) -> f64 {
        self.total_asset_shares * self.asset_share_value
    }

    /// Total borrowed liquidity in base units.
    pub fn total_liabilities(&self) -> f64 {
        self.total_liability_shares * self.liability_share_value
    }

    /// Borrowed fraction of deposits, clamped to [0, 1].
    pub fn utilization(&self) -> f64 {
        let assets = self.total_assets();
        if assets <= 0.0 {
            return 0.0;
        }
        (self.total_liabilities() / assets).clamp(0.0, 1.0)
    }

    /// Yearly borrow rate at the current utilization: linear up to the
    /// optimal point, then linear from the plateau rate to the max rate.
    pub fn borrow_apr(&self) -> f64 {
        let utilization = self.utilization();
        let ir = &self.interest_rate;
        if utilization <= ir.optimal_utilization_rate {
            if ir.optimal_utilization_rate <= 0.0 {
                return ir.plateau_interest_rate;
            }
            utilization / ir.optimal_utilization_rate * ir.plateau_interest_rate
        } else {
            let span = 1.0 - ir.optimal_utilization_rate;
            if span <= 0.0 {
                return ir.max_interest_rate;
            }
            let excess = (utilization - ir.optimal_utilization_rate) / span;
            ir.plateau_interest_rate + excess * (ir.max_interest_rate - ir.plateau_interest_rate)
        }
    }

    /// Lender-side yearly rate after protocol and insurance fees, compounded
    /// daily, as a percentage.
    pub fn supply_apy(&self) -> f64 {
        let ir = &self.interest_rate;
        let fee_share = (1.0 - ir.insurance_ir_fee - ir.protocol_ir_fee).max(0.0);
        let supply_apr = self.borrow_apr() * self.utilization() * fee_share;
        ((1.0 + supply_apr / 365.0).powi(365) - 1.0) * 100.0
    }
}
