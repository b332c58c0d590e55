//a helper to create the instruction sequences each client operation submits
use {
    super::MarginfiInstruction,
    crate::{
        constants::{MARGINFI_PROGRAM_ID, PRIORITY_FEE_MICROLAMPORTS},
        error::ClientError,
        pda::find_liquidity_vault,
    },
    solana_sdk::{
        compute_budget::ComputeBudgetInstruction,
        instruction::{AccountMeta, Instruction},
        program_pack::Pack,
        pubkey::Pubkey,
        system_instruction, system_program,
    },
};

/// Creates a `MarginfiAccountInitialize` instruction.
pub fn initialize_account(
    group: Pubkey,
    margin_account: Pubkey,
    authority: Pubkey,
    fee_payer: Pubkey,
) -> Instruction {
    Instruction {
        program_id: MARGINFI_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(group, false),
            AccountMeta::new(margin_account, true),
            AccountMeta::new_readonly(authority, true),
            AccountMeta::new(fee_payer, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: MarginfiInstruction::AccountInitialize.pack(),
    }
}

/// Creates a `LendingAccountDeposit` instruction. The liquidity vault is
/// derived from the bank address.
pub fn deposit(
    group: Pubkey,
    margin_account: Pubkey,
    authority: Pubkey,
    bank: Pubkey,
    funding_token_account: Pubkey,
    amount: u64,
) -> Instruction {
    let (liquidity_vault, _bump) = find_liquidity_vault(&bank);
    Instruction {
        program_id: MARGINFI_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(group, false),
            AccountMeta::new(margin_account, false),
            AccountMeta::new(authority, true),
            AccountMeta::new(bank, false),
            AccountMeta::new(funding_token_account, false),
            AccountMeta::new(liquidity_vault, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: MarginfiInstruction::Deposit {
            amount,
            deposit_up_to_limit: None,
        }
        .pack(),
    }
}

/// Creates a `LendingAccountWithdraw` instruction. Account order differs
/// from deposit; the protocol dispatches on it byte-for-byte.
pub fn withdraw(
    group: Pubkey,
    margin_account: Pubkey,
    authority: Pubkey,
    bank: Pubkey,
    destination_token_account: Pubkey,
    amount: u64,
) -> Instruction {
    let (liquidity_vault, _bump) = find_liquidity_vault(&bank);
    Instruction {
        program_id: MARGINFI_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(margin_account, false),
            AccountMeta::new_readonly(group, false),
            AccountMeta::new(destination_token_account, false),
            AccountMeta::new(bank, false),
            AccountMeta::new(liquidity_vault, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new(authority, true),
        ],
        data: MarginfiInstruction::Withdraw { amount }.pack(),
    }
}

/// The four-instruction deposit sequence: create a temporary wrapped-SOL
/// account funded with rent plus the deposit amount, initialize it for the
/// native mint, deposit, close back to the wallet. Must be submitted as one
/// transaction; atomicity is the ledger's guarantee.
///
/// Funding comes from the throwaway account, not the wallet's associated
/// token account ([`crate::pda::find_associated_token_address`]); closing
/// the throwaway is what unwraps the leftover SOL. Callers holding wrapped
/// SOL in their ATA can pass it to [`deposit`] directly.
pub fn deposit_flow(
    wallet: Pubkey,
    temp_token_account: Pubkey,
    group: Pubkey,
    margin_account: Pubkey,
    bank: Pubkey,
    rent_lamports: u64,
    amount: u64,
) -> Result<Vec<Instruction>, ClientError> {
    Ok(vec![
        system_instruction::create_account(
            &wallet,
            &temp_token_account,
            rent_lamports.saturating_add(amount),
            spl_token::state::Account::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_account(
            &spl_token::id(),
            &temp_token_account,
            &spl_token::native_mint::id(),
            &wallet,
        )?,
        deposit(group, margin_account, wallet, bank, temp_token_account, amount),
        spl_token::instruction::close_account(
            &spl_token::id(),
            &temp_token_account,
            &wallet,
            &wallet,
            &[],
        )?,
    ])
}

/// The four-instruction withdraw sequence, symmetric to [`deposit_flow`];
/// the temporary account is funded with rent only and receives the
/// withdrawn lamports before closing back to the wallet.
pub fn withdraw_flow(
    wallet: Pubkey,
    temp_token_account: Pubkey,
    group: Pubkey,
    margin_account: Pubkey,
    bank: Pubkey,
    rent_lamports: u64,
    amount: u64,
) -> Result<Vec<Instruction>, ClientError> {
    Ok(vec![
        system_instruction::create_account(
            &wallet,
            &temp_token_account,
            rent_lamports,
            spl_token::state::Account::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_account(
            &spl_token::id(),
            &temp_token_account,
            &spl_token::native_mint::id(),
            &wallet,
        )?,
        withdraw(group, margin_account, wallet, bank, temp_token_account, amount),
        spl_token::instruction::close_account(
            &spl_token::id(),
            &temp_token_account,
            &wallet,
            &wallet,
            &[],
        )?,
    ])
}

/// Prepends the compute-budget directives carried by every transaction:
/// a unit limit and a fixed priority-fee rate.
pub fn with_compute_budget(unit_limit: u32, instructions: Vec<Instruction>) -> Vec<Instruction> {
    let mut all = Vec::with_capacity(instructions.len() + 2);
    all.push(ComputeBudgetInstruction::set_compute_unit_limit(unit_limit));
    all.push(ComputeBudgetInstruction::set_compute_unit_price(
        PRIORITY_FEE_MICROLAMPORTS,
    ));
    all.extend(instructions);
    all
}
