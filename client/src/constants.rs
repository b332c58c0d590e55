use solana_sdk::pubkey::Pubkey;

/// marginfi v2 program (mainnet).
pub const MARGINFI_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("MFv2hWf31Z9kbCa1snEPYctwafyhdvnV7FZnsebVacA");

/// Associated token account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Candidate marginfi group addresses, tried in order before falling back
/// to a program-account scan. Deployment-specific; may go stale.
pub const KNOWN_GROUPS: [Pubkey; 3] = [
    solana_sdk::pubkey!("4qp6Fx6tnZkY5Wropq9wUYgtFxXKwE6viZxFHg3rdAG8"),
    solana_sdk::pubkey!("3Z9vJPxUjHj47vRq8TBKEbN1fGWNYKWaHpxFNdZR4Jm2"),
    solana_sdk::pubkey!("4VcJMDnbYKRCeJ6zF8BKr2k6c5iHBBmjLWdJXnyxVHGY"),
];

/// The mainnet SOL bank.
pub const SOL_BANK: Pubkey = solana_sdk::pubkey!("CCKtUs6Cgwo4aaQUmBPmyoApH2gUDErxNZCAntD6LYGh");

/// Group accounts are ~12KB; the scan fallback accepts this size band
/// (exclusive bounds).
pub const GROUP_DATA_MIN: usize = 10_000;
pub const GROUP_DATA_MAX: usize = 15_000;

/// Compute-unit limit for account initialization.
pub const COMPUTE_UNIT_LIMIT_INIT: u32 = 300_000;
/// Compute-unit limit for deposit and withdraw flows.
pub const COMPUTE_UNIT_LIMIT_TRANSFER: u32 = 400_000;
/// Priority fee, micro-lamports per compute unit.
pub const PRIORITY_FEE_MICROLAMPORTS: u64 = 10_000;

/// Price used when the oracle is unreachable.
pub const FALLBACK_SOL_PRICE_USD: f64 = 168.0;
/// Token entries below this USD value are left out of wallet reports.
pub const DUST_THRESHOLD_USD: f64 = 0.1;

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const ORACLE_TIMEOUT_SECS: u64 = 10;

pub const SOL_POOL_NAME: &str = "mrgnlend SOL Pool";
