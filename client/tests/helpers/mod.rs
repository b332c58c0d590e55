#![allow(dead_code)]

use {
    marginfi_lending::{
        constants::{KNOWN_GROUPS, MARGINFI_PROGRAM_ID, SOL_BANK},
        error::ClientError,
        oracle::PriceOracle,
        rpc::RpcBackend,
        LendingClient,
    },
    solana_sdk::{
        account::Account,
        hash::Hash,
        pubkey::Pubkey,
        signature::{Keypair, Signature},
        signer::Signer,
        transaction::Transaction,
    },
    std::{
        cell::{Cell, RefCell},
        collections::HashMap,
    },
};

/// In-memory ledger backend. Accounts and balances are seeded by tests;
/// submitted transactions are recorded for structural assertions.
#[derive(Default)]
pub struct MockRpc {
    pub balances: HashMap<Pubkey, u64>,
    pub accounts: HashMap<Pubkey, Account>,
    pub rent: u64,
    /// When set, `send_transaction` rejects with this detail.
    pub reject_with: Option<String>,
    /// When set, every read call fails as `Backend`.
    pub fail_reads: bool,
    pub sent: RefCell<Vec<Transaction>>,
    pub program_scans: Cell<usize>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            rent: RENT_EXEMPT_TOKEN_ACCOUNT,
            ..Self::default()
        }
    }

    fn check_reads(&self) -> Result<(), ClientError> {
        if self.fail_reads {
            return Err(ClientError::Backend("connection refused".to_string()));
        }
        Ok(())
    }
}

impl RpcBackend for MockRpc {
    fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError> {
        self.check_reads()?;
        Ok(self.balances.get(address).copied().unwrap_or(0))
    }

    fn get_account_info(&self, address: &Pubkey) -> Result<Option<Account>, ClientError> {
        self.check_reads()?;
        Ok(self.accounts.get(address).cloned())
    }

    fn get_program_accounts(
        &self,
        program: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, ClientError> {
        self.check_reads()?;
        self.program_scans.set(self.program_scans.get() + 1);
        Ok(self
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *program)
            .map(|(address, account)| (*address, account.clone()))
            .collect())
    }

    fn get_latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.check_reads()?;
        Ok(Hash::new_unique())
    }

    fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64, ClientError> {
        self.check_reads()?;
        Ok(self.rent)
    }

    fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        if let Some(detail) = &self.reject_with {
            return Err(ClientError::Rejected(detail.clone()));
        }
        self.sent.borrow_mut().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

pub struct MockOracle {
    /// `None` simulates an unreachable oracle.
    pub sol_price: Option<f64>,
}

impl PriceOracle for MockOracle {
    fn usd_price(&self, _symbol: &str) -> Result<f64, ClientError> {
        self.sol_price
            .ok_or_else(|| ClientError::Backend("oracle timed out".to_string()))
    }
}

pub const RENT_EXEMPT_TOKEN_ACCOUNT: u64 = 2_039_280;
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// Fixture offsets mirror the marginfi v2 published zero-copy layouts,
// written independently of the decoder under test.
const BANK_MINT: usize = 8;
const BANK_MINT_DECIMALS: usize = 40;
const BANK_GROUP: usize = 41;
const BANK_ASSET_SHARE_VALUE: usize = 80;
const BANK_LIABILITY_SHARE_VALUE: usize = 96;
const BANK_LIQUIDITY_VAULT: usize = 112;
const BANK_TOTAL_LIABILITY_SHARES: usize = 256;
const BANK_TOTAL_ASSET_SHARES: usize = 272;
const BANK_OPTIMAL_UTILIZATION: usize = 368;
const BANK_PLATEAU_RATE: usize = 384;
const BANK_MAX_RATE: usize = 400;
const BANK_INSURANCE_IR_FEE: usize = 432;
const BANK_PROTOCOL_IR_FEE: usize = 464;

const MARGIN_GROUP: usize = 8;
const MARGIN_AUTHORITY: usize = 40;
const MARGIN_BALANCES: usize = 72;
const MARGIN_BALANCE_LEN: usize = 104;
pub const MARGIN_ACCOUNT_LEN: usize = 2312;

pub fn encode_i80f48(value: f64) -> [u8; 16] {
    ((value * (1u64 << 48) as f64) as i128).to_le_bytes()
}

fn put_i80f48(data: &mut [u8], offset: usize, value: f64) {
    data[offset..offset + 16].copy_from_slice(&encode_i80f48(value));
}

/// Share value of the fixture SOL bank; positions in tests convert shares
/// through this.
pub const BANK_SHARE_VALUE: f64 = 1.2;
/// Fixture interest-rate curve: utilization 0.4, optimal 0.8, plateau 10%.
pub const BANK_UTILIZATION: f64 = 0.4;
pub const BANK_OPTIMAL: f64 = 0.8;
pub const BANK_PLATEAU: f64 = 0.1;
pub const BANK_MAX: f64 = 2.0;
pub const BANK_INSURANCE_FEE: f64 = 0.025;
pub const BANK_PROTOCOL_FEE: f64 = 0.05;

/// Supply APY the fixture bank should report, recomputed independently.
pub fn expected_bank_apy() -> f64 {
    let borrow_apr = BANK_UTILIZATION / BANK_OPTIMAL * BANK_PLATEAU;
    let apr = borrow_apr * BANK_UTILIZATION * (1.0 - BANK_INSURANCE_FEE - BANK_PROTOCOL_FEE);
    ((1.0 + apr / 365.0).powi(365) - 1.0) * 100.0
}

pub fn bank_data(group: &Pubkey) -> Vec<u8> {
    let total_assets = 1_000_000.0 * LAMPORTS_PER_SOL as f64;
    let mut data = vec![0u8; 1856];
    data[BANK_MINT..BANK_MINT + 32].copy_from_slice(spl_token::native_mint::id().as_ref());
    data[BANK_MINT_DECIMALS] = 9;
    data[BANK_GROUP..BANK_GROUP + 32].copy_from_slice(group.as_ref());
    put_i80f48(&mut data, BANK_ASSET_SHARE_VALUE, BANK_SHARE_VALUE);
    put_i80f48(&mut data, BANK_LIABILITY_SHARE_VALUE, 1.0);
    put_i80f48(&mut data, BANK_TOTAL_ASSET_SHARES, total_assets / BANK_SHARE_VALUE);
    put_i80f48(&mut data, BANK_TOTAL_LIABILITY_SHARES, total_assets * BANK_UTILIZATION);
    put_i80f48(&mut data, BANK_OPTIMAL_UTILIZATION, BANK_OPTIMAL);
    put_i80f48(&mut data, BANK_PLATEAU_RATE, BANK_PLATEAU);
    put_i80f48(&mut data, BANK_MAX_RATE, BANK_MAX);
    put_i80f48(&mut data, BANK_INSURANCE_IR_FEE, BANK_INSURANCE_FEE);
    put_i80f48(&mut data, BANK_PROTOCOL_IR_FEE, BANK_PROTOCOL_FEE);
    data
}

pub fn margin_account_data(authority: &Pubkey, bank: &Pubkey, asset_shares: f64) -> Vec<u8> {
    let mut data = vec![0u8; MARGIN_ACCOUNT_LEN];
    data[MARGIN_GROUP..MARGIN_GROUP + 32].copy_from_slice(KNOWN_GROUPS[0].as_ref());
    data[MARGIN_AUTHORITY..MARGIN_AUTHORITY + 32].copy_from_slice(authority.as_ref());
    data[MARGIN_BALANCES] = 1; // active
    data[MARGIN_BALANCES + 1..MARGIN_BALANCES + 33].copy_from_slice(bank.as_ref());
    data[MARGIN_BALANCES + 40..MARGIN_BALANCES + 56]
        .copy_from_slice(&encode_i80f48(asset_shares));
    data
}

pub fn owned_account(data: Vec<u8>, owner: Pubkey) -> Account {
    Account {
        lamports: 1_000_000,
        data,
        owner,
        executable: false,
        rent_epoch: 0,
    }
}

/// Default position of the seeded margin account, in shares: 0.06 SOL once
/// converted through the bank share value.
pub const SEED_POSITION_SHARES: f64 = 50_000_000.0;

pub fn seed_position_sol() -> f64 {
    SEED_POSITION_SHARES * BANK_SHARE_VALUE / LAMPORTS_PER_SOL as f64
}

/// A backend with the full entity set resolved: candidate group, SOL bank,
/// one margin account owned by `wallet`, and a 1 SOL wallet balance.
pub fn ready_rpc(wallet: &Pubkey) -> (MockRpc, Pubkey) {
    let mut rpc = MockRpc::new();
    rpc.accounts.insert(
        KNOWN_GROUPS[0],
        owned_account(vec![0u8; 12_000], MARGINFI_PROGRAM_ID),
    );
    rpc.accounts.insert(
        SOL_BANK,
        owned_account(bank_data(&KNOWN_GROUPS[0]), MARGINFI_PROGRAM_ID),
    );
    let margin_address = Pubkey::new_unique();
    rpc.accounts.insert(
        margin_address,
        owned_account(
            margin_account_data(wallet, &SOL_BANK, SEED_POSITION_SHARES),
            MARGINFI_PROGRAM_ID,
        ),
    );
    rpc.balances.insert(*wallet, LAMPORTS_PER_SOL);
    (rpc, margin_address)
}

pub fn sent_transactions(rpc: &MockRpc) -> Vec<Transaction> {
    rpc.sent.borrow().clone()
}

pub fn compiled_program(transaction: &Transaction, index: usize) -> Pubkey {
    let message = &transaction.message;
    message.account_keys[message.instructions[index].program_id_index as usize]
}

pub fn compiled_accounts(transaction: &Transaction, index: usize) -> Vec<Pubkey> {
    let message = &transaction.message;
    message.instructions[index]
        .accounts
        .iter()
        .map(|&key_index| message.account_keys[key_index as usize])
        .collect()
}

pub fn compiled_data(transaction: &Transaction, index: usize) -> Vec<u8> {
    transaction.message.instructions[index].data.clone()
}

pub fn client_with(
    rpc: MockRpc,
    oracle: MockOracle,
    keypair: Keypair,
) -> LendingClient<MockRpc, MockOracle> {
    LendingClient::new(rpc, oracle, keypair)
}

pub fn ready_client() -> (LendingClient<MockRpc, MockOracle>, Pubkey, Pubkey) {
    let keypair = Keypair::new();
    let wallet = keypair.pubkey();
    let (rpc, margin_address) = ready_rpc(&wallet);
    (
        client_with(rpc, MockOracle { sol_price: Some(100.0) }, keypair),
        wallet,
        margin_address,
    )
}
