//! Read-only aggregation of wallet balance, oracle prices and decoded
//! lending positions. Every dependency failure on this path degrades to a
//! zero or fallback value instead of aborting the report; that resilience
//! policy is deliberate.

use {
    crate::{
        constants::{DUST_THRESHOLD_USD, FALLBACK_SOL_PRICE_USD, SOL_POOL_NAME},
        error::ClientError,
        oracle::PriceOracle,
        rpc::RpcBackend,
        session::LendingClient,
    },
    solana_sdk::pubkey::Pubkey,
    tracing::warn,
};

/// One wallet token entry above the dust threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBalance {
    pub symbol: String,
    pub balance: f64,
    pub price_usd: f64,
    pub value_usd: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalletStatus {
    pub wallet_address: Pubkey,
    pub tokens: Vec<TokenBalance>,
    pub total_value_usd: f64,
}

/// A decoded lending position snapshot; recomputed on each query.
#[derive(Clone, Debug, PartialEq)]
pub struct LendingPosition {
    pub asset: String,
    /// Balance in whole tokens.
    pub balance: f64,
    pub value_usd: f64,
    /// Growth against the session's reference deposit; zero when no
    /// baseline is set.
    pub growth_usd: f64,
    pub growth_percent: f64,
    pub apy_percent: f64,
    pub bank: Pubkey,
    pub pool_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionReport {
    pub positions: Vec<LendingPosition>,
    pub total_lent_usd: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LendingPool {
    pub asset: String,
    pub supply_apy_percent: f64,
    pub pool_name: String,
    pub bank: Pubkey,
}

impl<R: RpcBackend, O: PriceOracle> LendingClient<R, O> {
    /// SOL price with the pinned fallback when the oracle is unreachable.
    fn sol_price_or_fallback(&self) -> f64 {
        match self.oracle.usd_price("SOL") {
            Ok(price) => price,
            Err(err) => {
                warn!(%err, fallback = FALLBACK_SOL_PRICE_USD, "price oracle unavailable");
                FALLBACK_SOL_PRICE_USD
            }
        }
    }

    /// Wallet snapshot: native balance priced in USD, filtered at the dust
    /// threshold. Never fails; unreachable backends degrade to zero.
    pub fn wallet_status(&self) -> WalletStatus {
        let balance = match self.sol_balance() {
            Ok(balance) => balance,
            Err(err) => {
                warn!(%err, "balance lookup failed, reporting zero");
                0.0
            }
        };
        let price = self.sol_price_or_fallback();
        let value = balance * price;

        let mut tokens = Vec::new();
        if value > DUST_THRESHOLD_USD {
            tokens.push(TokenBalance {
                symbol: "SOL".to_string(),
                balance,
                price_usd: price,
                value_usd: value,
            });
        }
        WalletStatus {
            wallet_address: self.wallet_address(),
            total_value_usd: tokens.iter().map(|token| token.value_usd).sum(),
            tokens,
        }
    }

    /// Current lending positions decoded from the margin account. An empty
    /// report (with a warning) when entities cannot be resolved.
    pub fn positions(&mut self) -> PositionReport {
        match self.try_positions() {
            Ok(report) => report,
            Err(err) => {
                warn!(%err, "position lookup failed, reporting none");
                PositionReport::default()
            }
        }
    }

    fn try_positions(&mut self) -> Result<PositionReport, ClientError> {
        let (bank_address, bank) = self.fetch_bank()?;
        let (_, margin_account) = self.fetch_margin_account()?;
        let balance = margin_account.deposited(&bank_address, &bank);
        if balance <= 0.0 {
            return Ok(PositionReport::default());
        }

        let price = self.sol_price_or_fallback();
        let value_usd = balance * price;
        let (growth_usd, growth_percent) = match self.reference_deposit_usd {
            Some(baseline) if baseline > 0.0 => {
                (value_usd - baseline, (value_usd - baseline) / baseline * 100.0)
            }
            _ => (0.0, 0.0),
        };
        Ok(PositionReport {
            positions: vec![LendingPosition {
                asset: "SOL".to_string(),
                balance,
                value_usd,
                growth_usd,
                growth_percent,
                apy_percent: bank.supply_apy(),
                bank: bank_address,
                pool_name: SOL_POOL_NAME.to_string(),
            }],
            total_lent_usd: value_usd,
        })
    }

    /// Available lending pools with live APY; empty (with a warning) when
    /// the bank cannot be resolved or decoded.
    pub fn lending_pools(&mut self) -> Vec<LendingPool> {
        match self.fetch_bank() {
            Ok((bank_address, bank)) => vec![LendingPool {
                asset: "SOL".to_string(),
                supply_apy_percent: bank.supply_apy(),
                pool_name: SOL_POOL_NAME.to_string(),
                bank: bank_address,
            }],
            Err(err) => {
                warn!(%err, "pool lookup failed");
                Vec::new()
            }
        }
    }

    /// Current SOL supply APY in percent; zero when unavailable.
    pub fn sol_apy(&mut self) -> f64 {
        self.fetch_bank()
            .map(|(_, bank)| bank.supply_apy())
            .unwrap_or(0.0)
    }
}
