use {crate::error::ClientError, solana_sdk::signature::Keypair};

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Process configuration, read before any network call. The signing key is
/// owned by the session and never serialized back out.
pub struct Config {
    pub rpc_url: String,
    pub keypair: Keypair,
}

impl Config {
    /// Reads `WALLET_KEY` (base58-encoded 64-byte secret key, required) and
    /// `RPC_URL` (optional) from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        let wallet_key = std::env::var("WALLET_KEY").map_err(|_| {
            ClientError::Configuration("WALLET_KEY not found in environment".to_string())
        })?;
        Ok(Self {
            rpc_url: std::env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            keypair: parse_wallet_key(&wallet_key)?,
        })
    }
}

fn parse_wallet_key(encoded: &str) -> Result<Keypair, ClientError> {
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .map_err(|err| ClientError::Configuration(format!("WALLET_KEY is not base58: {err}")))?;
    Keypair::from_bytes(&bytes)
        .map_err(|err| ClientError::Configuration(format!("WALLET_KEY is not a keypair: {err}")))
}
