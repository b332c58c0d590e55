mod helpers;

use {
    assert_matches::assert_matches,
    helpers::*,
    marginfi_lending::{
        constants::{KNOWN_GROUPS, MARGINFI_PROGRAM_ID, SOL_BANK},
        error::ClientError,
        instruction::MarginfiInstruction,
        pda::find_liquidity_vault,
    },
    solana_sdk::{
        pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction, system_program,
    },
};

#[test]
fn withdraw_funds_the_temp_account_with_rent_only() {
    let (mut client, wallet, margin_address) = ready_client();

    client.withdraw(0.01).unwrap();

    let sent = sent_transactions(client.backend());
    assert_eq!(sent.len(), 1);
    let transaction = &sent[0];
    assert_eq!(transaction.signatures.len(), 2);
    assert_eq!(transaction.message.instructions.len(), 6);
    assert_eq!(compiled_program(transaction, 2), system_program::id());
    assert_eq!(compiled_program(transaction, 4), MARGINFI_PROGRAM_ID);

    // Unlike deposit, nothing beyond rent is moved up front; the program
    // pays out into the temp account.
    let temp = compiled_accounts(transaction, 2)[1];
    let expected_create = system_instruction::create_account(
        &wallet,
        &temp,
        RENT_EXEMPT_TOKEN_ACCOUNT,
        165,
        &spl_token::id(),
    );
    assert_eq!(compiled_data(transaction, 2), expected_create.data);

    let (vault, _) = find_liquidity_vault(&SOL_BANK);
    assert_eq!(
        compiled_accounts(transaction, 4),
        vec![
            margin_address,
            KNOWN_GROUPS[0],
            temp,
            SOL_BANK,
            vault,
            spl_token::id(),
            wallet,
        ],
    );
    assert_eq!(
        compiled_data(transaction, 4),
        MarginfiInstruction::Withdraw { amount: 10_000_000 }.pack(),
    );
}

#[test]
fn rejects_amounts_above_the_lending_position() {
    let (mut client, _, _) = ready_client();

    // Seeded position is 0.06 SOL.
    assert!((seed_position_sol() - 0.06).abs() < 1e-9);
    assert_matches!(client.withdraw(0.07), Err(ClientError::InvalidInput(_)));
    assert!(sent_transactions(client.backend()).is_empty());
}

#[test]
fn fails_when_the_sol_bank_is_missing_or_foreign_owned() {
    let keypair = Keypair::new();
    let wallet = keypair.pubkey();
    let (mut rpc, _) = ready_rpc(&wallet);
    rpc.accounts.remove(&SOL_BANK);
    let mut client = client_with(rpc, MockOracle { sol_price: Some(100.0) }, keypair);
    assert_matches!(client.resolve_sol_bank(), Err(ClientError::NotFound(_)));

    let keypair = Keypair::new();
    let wallet = keypair.pubkey();
    let (mut rpc, _) = ready_rpc(&wallet);
    let bank_data = rpc.accounts[&SOL_BANK].data.clone();
    rpc.accounts
        .insert(SOL_BANK, owned_account(bank_data, Pubkey::new_unique()));
    let mut client = client_with(rpc, MockOracle { sol_price: Some(100.0) }, keypair);
    assert_matches!(client.resolve_sol_bank(), Err(ClientError::NotFound(_)));
    assert_matches!(client.withdraw(0.01), Err(ClientError::NotFound(_)));
    assert!(sent_transactions(client.backend()).is_empty());
}

#[test]
fn fails_when_the_wallet_has_no_margin_account() {
    let keypair = Keypair::new();
    let wallet = keypair.pubkey();
    let (mut rpc, margin_address) = ready_rpc(&wallet);
    rpc.accounts.remove(&margin_address);
    let mut client = client_with(rpc, MockOracle { sol_price: Some(100.0) }, keypair);

    assert_matches!(client.withdraw(0.01), Err(ClientError::NotFound(_)));
    assert!(sent_transactions(client.backend()).is_empty());
}
