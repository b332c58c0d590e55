use {
    crate::{error::ClientError, rpc::RpcBackend},
    solana_sdk::{
        instruction::Instruction,
        message::Message,
        pubkey::Pubkey,
        signature::{Keypair, Signature},
        transaction::Transaction,
    },
    tracing::info,
};

/// Binds the instruction list to a fresh blockhash, signs with the full key
/// set (the wallet always; ephemeral keys when an instruction references
/// them as signers) and submits. Signing is local; no key material crosses
/// the RPC boundary. No automatic retry: retry policy belongs to callers.
pub fn sign_and_send<R: RpcBackend>(
    rpc: &R,
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    signers: &[&Keypair],
) -> Result<Signature, ClientError> {
    let recent_blockhash = rpc.get_latest_blockhash()?;
    let message = Message::new_with_blockhash(instructions, Some(fee_payer), &recent_blockhash);
    let mut transaction = Transaction::new_unsigned(message);
    transaction.try_sign(&signers.to_vec(), recent_blockhash)?;
    let signature = rpc.send_transaction(&transaction)?;
    info!(%signature, "transaction submitted");
    Ok(signature)
}
