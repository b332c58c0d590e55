//! Session object: owns the signing key, the backend handles and the
//! entity cache, and exposes the write operations. One session drives at
//! most one in-flight transaction; concurrent use means separate sessions.

use {
    crate::{
        constants::{
            COMPUTE_UNIT_LIMIT_INIT, COMPUTE_UNIT_LIMIT_TRANSFER, GROUP_DATA_MAX, GROUP_DATA_MIN,
            KNOWN_GROUPS, MARGINFI_PROGRAM_ID, SOL_BANK,
        },
        error::ClientError,
        instruction::builder,
        oracle::PriceOracle,
        rpc::RpcBackend,
        state::{Bank, MarginAccount, MARGIN_ACCOUNT_LEN},
        transaction,
    },
    solana_sdk::{
        account::Account,
        native_token::{lamports_to_sol, sol_to_lamports},
        program_pack::Pack,
        pubkey::Pubkey,
        signature::{Keypair, Signature},
        signer::Signer,
    },
    tracing::{debug, info},
};

/// Entity addresses resolved once per session, never invalidated within a
/// run.
#[derive(Debug, Default)]
struct EntityCache {
    group: Option<Pubkey>,
    sol_bank: Option<Pubkey>,
    margin_account: Option<Pubkey>,
}

pub struct LendingClient<R, O> {
    pub(crate) rpc: R,
    pub(crate) oracle: O,
    keypair: Keypair,
    cache: EntityCache,
    pub(crate) reference_deposit_usd: Option<f64>,
}

impl<R: RpcBackend, O: PriceOracle> LendingClient<R, O> {
    pub fn new(rpc: R, oracle: O, keypair: Keypair) -> Self {
        Self {
            rpc,
            oracle,
            keypair,
            cache: EntityCache::default(),
            reference_deposit_usd: None,
        }
    }

    pub fn wallet_address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// USD value of the original deposit, used as the growth baseline in
    /// position reports. On-chain state carries no deposit history.
    pub fn set_reference_deposit(&mut self, usd: f64) {
        self.reference_deposit_usd = Some(usd);
    }

    /// Backend handle, mainly for tests inspecting submitted transactions.
    pub fn backend(&self) -> &R {
        &self.rpc
    }

    /// Wallet balance in whole SOL.
    pub fn sol_balance(&self) -> Result<f64, ClientError> {
        Ok(lamports_to_sol(self.rpc.get_balance(&self.wallet_address())?))
    }

    /// Resolves the marginfi group: known candidates first (owner-verified),
    /// then a scan of program accounts filtered by the group size band.
    pub fn resolve_group(&mut self) -> Result<Pubkey, ClientError> {
        if let Some(group) = self.cache.group {
            return Ok(group);
        }
        for candidate in KNOWN_GROUPS {
            match self.rpc.get_account_info(&candidate) {
                Ok(Some(account)) if account.owner == MARGINFI_PROGRAM_ID => {
                    debug!(group = %candidate, "resolved marginfi group from candidate list");
                    self.cache.group = Some(candidate);
                    return Ok(candidate);
                }
                Ok(_) => debug!(group = %candidate, "candidate group rejected"),
                Err(err) => debug!(group = %candidate, %err, "candidate group lookup failed"),
            }
        }
        for (address, account) in self.rpc.get_program_accounts(&MARGINFI_PROGRAM_ID)? {
            let size = account.data.len();
            if size > GROUP_DATA_MIN && size < GROUP_DATA_MAX {
                debug!(group = %address, size, "resolved marginfi group by scan");
                self.cache.group = Some(address);
                return Ok(address);
            }
        }
        Err(ClientError::NotFound("marginfi group".to_string()))
    }

    /// Resolves the SOL bank. Single known candidate, owner-verified; no
    /// scan fallback in single-asset scope.
    pub fn resolve_sol_bank(&mut self) -> Result<Pubkey, ClientError> {
        if let Some(bank) = self.cache.sol_bank {
            return Ok(bank);
        }
        match self.rpc.get_account_info(&SOL_BANK)? {
            Some(account) if account.owner == MARGINFI_PROGRAM_ID => {
                debug!(bank = %SOL_BANK, "resolved SOL bank");
                self.cache.sol_bank = Some(SOL_BANK);
                Ok(SOL_BANK)
            }
            _ => Err(ClientError::NotFound("SOL bank".to_string())),
        }
    }

    /// Resolves the wallet's margin account by scanning program accounts
    /// for one whose decoded authority is the session wallet. First match
    /// wins; one account per wallet assumed.
    pub fn resolve_margin_account(&mut self) -> Result<Pubkey, ClientError> {
        if let Some(account) = self.cache.margin_account {
            return Ok(account);
        }
        let wallet = self.wallet_address();
        for (address, account) in self.rpc.get_program_accounts(&MARGINFI_PROGRAM_ID)? {
            if account.data.len() == MARGIN_ACCOUNT_LEN
                && MarginAccount::authority_of(&account.data) == Some(wallet)
            {
                debug!(margin_account = %address, "resolved margin account");
                self.cache.margin_account = Some(address);
                return Ok(address);
            }
        }
        Err(ClientError::NotFound(format!(
            "margin account for wallet {wallet}"
        )))
    }

    pub(crate) fn fetch_bank(&mut self) -> Result<(Pubkey, Bank), ClientError> {
        let address = self.resolve_sol_bank()?;
        let account = self.fetch_account(&address, "SOL bank")?;
        Ok((address, Bank::unpack(&account.data)?))
    }

    pub(crate) fn fetch_margin_account(&mut self) -> Result<(Pubkey, MarginAccount), ClientError> {
        let address = self.resolve_margin_account()?;
        let account = self.fetch_account(&address, "margin account")?;
        Ok((address, MarginAccount::unpack(&account.data)?))
    }

    fn fetch_account(&self, address: &Pubkey, what: &str) -> Result<Account, ClientError> {
        self.rpc
            .get_account_info(address)?
            .ok_or_else(|| ClientError::NotFound(what.to_string()))
    }

    /// Creates a new margin account under a fresh keypair (a standalone
    /// keyed account, not a PDA; the key co-signs the transaction) and
    /// caches its address for the rest of the session.
    pub fn create_margin_account(&mut self) -> Result<(Pubkey, Signature), ClientError> {
        let group = self.resolve_group()?;
        let account_key = Keypair::new();
        let address = account_key.pubkey();
        let wallet = self.wallet_address();
        debug!(margin_account = %address, "initializing margin account");

        let instructions = builder::with_compute_budget(
            COMPUTE_UNIT_LIMIT_INIT,
            vec![builder::initialize_account(group, address, wallet, wallet)],
        );
        let signature = transaction::sign_and_send(
            &self.rpc,
            &instructions,
            &wallet,
            &[&self.keypair, &account_key],
        )?;
        info!(margin_account = %address, "margin account created");
        self.cache.margin_account = Some(address);
        Ok((address, signature))
    }

    /// Deposits `amount_sol` into the SOL bank. Validation and entity
    /// resolution happen before any instruction is built.
    pub fn deposit(&mut self, amount_sol: f64) -> Result<Signature, ClientError> {
        validate_amount(amount_sol)?;
        let balance = self.sol_balance()?;
        if amount_sol > balance {
            return Err(ClientError::InvalidInput(format!(
                "amount {amount_sol} SOL exceeds available balance {balance:.9} SOL"
            )));
        }

        let group = self.resolve_group()?;
        let bank = self.resolve_sol_bank()?;
        let margin_account = self.resolve_margin_account()?;
        let rent = self
            .rpc
            .get_minimum_balance_for_rent_exemption(spl_token::state::Account::LEN)?;

        let wallet = self.wallet_address();
        let temp_token_key = Keypair::new();
        let instructions = builder::with_compute_budget(
            COMPUTE_UNIT_LIMIT_TRANSFER,
            builder::deposit_flow(
                wallet,
                temp_token_key.pubkey(),
                group,
                margin_account,
                bank,
                rent,
                sol_to_lamports(amount_sol),
            )?,
        );
        debug!(amount_sol, bank = %bank, "submitting deposit");
        transaction::sign_and_send(
            &self.rpc,
            &instructions,
            &wallet,
            &[&self.keypair, &temp_token_key],
        )
    }

    /// Withdraws `amount_sol` from the SOL bank back to the wallet.
    pub fn withdraw(&mut self, amount_sol: f64) -> Result<Signature, ClientError> {
        validate_amount(amount_sol)?;
        let group = self.resolve_group()?;
        let (bank_address, bank) = self.fetch_bank()?;
        let (margin_address, margin_account) = self.fetch_margin_account()?;
        let deposited = margin_account.deposited(&bank_address, &bank);
        if amount_sol > deposited {
            return Err(ClientError::InvalidInput(format!(
                "amount {amount_sol} SOL exceeds lending position of {deposited:.9} SOL"
            )));
        }
        let rent = self
            .rpc
            .get_minimum_balance_for_rent_exemption(spl_token::state::Account::LEN)?;

        let wallet = self.wallet_address();
        let temp_token_key = Keypair::new();
        let instructions = builder::with_compute_budget(
            COMPUTE_UNIT_LIMIT_TRANSFER,
            builder::withdraw_flow(
                wallet,
                temp_token_key.pubkey(),
                group,
                margin_address,
                bank_address,
                rent,
                sol_to_lamports(amount_sol),
            )?,
        );
        debug!(amount_sol, bank = %bank_address, "submitting withdrawal");
        transaction::sign_and_send(
            &self.rpc,
            &instructions,
            &wallet,
            &[&self.keypair, &temp_token_key],
        )
    }
}

fn validate_amount(amount_sol: f64) -> Result<(), ClientError> {
    if !amount_sol.is_finite() || amount_sol <= 0.0 {
        return Err(ClientError::InvalidInput(
            "amount must be a positive number of SOL".to_string(),
        ));
    }
    Ok(())
}
