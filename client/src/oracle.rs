//! USD price lookups behind a trait so reports can be tested offline.

use {
    crate::{
        constants::{COINGECKO_API_BASE, ORACLE_TIMEOUT_SECS},
        error::ClientError,
    },
    serde::Deserialize,
    std::{collections::HashMap, time::Duration},
};

pub trait PriceOracle {
    /// USD per whole unit of `symbol`.
    fn usd_price(&self, symbol: &str) -> Result<f64, ClientError>;
}

/// CoinGecko `simple/price` client with a bounded request timeout.
pub struct CoinGeckoOracle {
    http: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PriceEntry {
    usd: Option<f64>,
}

impl CoinGeckoOracle {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(COINGECKO_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(ORACLE_TIMEOUT_SECS))
            .build()
            .map_err(|err| ClientError::Configuration(format!("http client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn coin_id(symbol: &str) -> String {
        match symbol {
            "SOL" => "solana".to_string(),
            "USDC" => "usd-coin".to_string(),
            "USDT" => "tether".to_string(),
            other => other.to_lowercase(),
        }
    }
}

impl PriceOracle for CoinGeckoOracle {
    fn usd_price(&self, symbol: &str) -> Result<f64, ClientError> {
        let id = Self::coin_id(symbol);
        let url = format!("{}/simple/price", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("ids", id.as_str()), ("vs_currencies", "usd")])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|err| ClientError::Backend(format!("price oracle: {err}")))?;
        let body: HashMap<String, PriceEntry> = response
            .json()
            .map_err(|err| ClientError::Backend(format!("price oracle: {err}")))?;
        body.get(&id)
            .and_then(|entry| entry.usd)
            .ok_or_else(|| ClientError::NotFound(format!("USD price for {symbol}")))
    }
}
