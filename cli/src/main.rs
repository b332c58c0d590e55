use {
    anyhow::Context,
    clap::{value_t, App, AppSettings, Arg, SubCommand},
    marginfi_lending::{
        config::Config, oracle::CoinGeckoOracle, rpc::SolanaRpc, LendingClient,
    },
    tracing_subscriber::EnvFilter,
};

fn amount_arg() -> Arg<'static, 'static> {
    Arg::with_name("AMOUNT")
        .help("Amount in SOL")
        .required(true)
        .index(1)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let matches = App::new("marginfi-lending")
        .about("Lend SOL through marginfi v2")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(SubCommand::with_name("status").about("Show wallet balances in USD"))
        .subcommand(SubCommand::with_name("pools").about("List lending pools and their APY"))
        .subcommand(
            SubCommand::with_name("positions").about("Show current lending positions"),
        )
        .subcommand(
            SubCommand::with_name("create-account")
                .about("Create a margin account for the wallet"),
        )
        .subcommand(
            SubCommand::with_name("deposit")
                .about("Deposit SOL into the lending pool")
                .arg(amount_arg()),
        )
        .subcommand(
            SubCommand::with_name("withdraw")
                .about("Withdraw SOL from the lending pool")
                .arg(amount_arg()),
        )
        .get_matches();

    let config = Config::from_env().context("loading configuration")?;
    let rpc = SolanaRpc::new(&config.rpc_url);
    let oracle = CoinGeckoOracle::new().context("building price oracle")?;
    let mut client = LendingClient::new(rpc, oracle, config.keypair);

    match matches.subcommand() {
        ("status", _) => {
            let status = client.wallet_status();
            println!("Wallet {}", status.wallet_address);
            for token in &status.tokens {
                println!(
                    "  {:<6} {:>14.6} @ ${:<10.2} ${:.2}",
                    token.symbol, token.balance, token.price_usd, token.value_usd
                );
            }
            println!("  Total: ${:.2}", status.total_value_usd);
        }
        ("pools", _) => {
            for pool in client.lending_pools() {
                println!(
                    "{:<6} {:>7.2}% APY  {}  ({})",
                    pool.asset, pool.supply_apy_percent, pool.pool_name, pool.bank
                );
            }
        }
        ("positions", _) => {
            let report = client.positions();
            if report.positions.is_empty() {
                println!("No active lending positions");
            }
            for position in &report.positions {
                println!(
                    "{:<6} {:>14.9} (${:.2})  {:+.2}% growth  {:.2}% APY  {}",
                    position.asset,
                    position.balance,
                    position.value_usd,
                    position.growth_percent,
                    position.apy_percent,
                    position.pool_name,
                );
            }
            if !report.positions.is_empty() {
                println!("Total lent: ${:.2}", report.total_lent_usd);
            }
        }
        ("create-account", _) => {
            let (address, signature) = client
                .create_margin_account()
                .context("creating margin account")?;
            println!("Created margin account {address}");
            println!("Signature: {signature}");
        }
        ("deposit", Some(sub_matches)) => {
            let amount = value_t!(sub_matches, "AMOUNT", f64)?;
            let signature = client.deposit(amount).context("depositing")?;
            println!("Deposited {amount} SOL");
            println!("Signature: {signature}");
        }
        ("withdraw", Some(sub_matches)) => {
            let amount = value_t!(sub_matches, "AMOUNT", f64)?;
            let signature = client.withdraw(amount).context("withdrawing")?;
            println!("Withdrew {amount} SOL");
            println!("Signature: {signature}");
        }
        _ => unreachable!(),
    }
    Ok(())
}
