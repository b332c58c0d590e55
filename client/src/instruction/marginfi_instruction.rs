use crate::error::ClientError;

/// Anchor 8-byte method discriminator: sha256("global:{name}")[..8].
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let digest = solana_sdk::hash::hash(preimage.as_bytes());
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&digest.to_bytes()[..8]);
    tag
}

/// Method name for creating a margin account.
pub const ACCOUNT_INITIALIZE_METHOD: &str = "marginfi_account_initialize";
/// Method name for depositing into a bank.
pub const DEPOSIT_METHOD: &str = "lending_account_deposit";
/// Selector observed on-chain for withdrawals. Pinned as a literal; it does
/// not follow the `global:` hash rule.
pub const WITHDRAW_DISCRIMINATOR: [u8; 8] = [183, 18, 70, 156, 148, 109, 161, 34];

/// Instructions of the marginfi v2 program used by this client.
#[derive(Debug, PartialEq)]
pub enum MarginfiInstruction {
    /// Initializes a new margin account. The account is a standalone keyed
    /// account (not a PDA); its fresh keypair must co-sign.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[]` Marginfi group.
    ///   1. `[writable, signer]` New margin account.
    ///   2. `[signer]` Authority.
    ///   3. `[writable, signer]` Fee payer.
    ///   4. `[]` System program.
    AccountInitialize,
    /// Deposits `amount` base units from a funding token account into a bank.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[]` Marginfi group.
    ///   1. `[writable]` Margin account.
    ///   2. `[writable, signer]` Authority.
    ///   3. `[writable]` Bank.
    ///   4. `[writable]` Funding token account.
    ///   5. `[writable]` Bank liquidity vault.
    ///   6. `[]` Token program.
    Deposit {
        /// Amount in base units.
        amount: u64,
        /// Deposit up to the bank limit instead of exactly `amount`.
        deposit_up_to_limit: Option<bool>,
    },
    /// Withdraws `amount` base units from a bank into a token account.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[writable]` Margin account.
    ///   1. `[]` Marginfi group.
    ///   2. `[writable]` Destination token account.
    ///   3. `[writable]` Bank.
    ///   4. `[writable]` Bank liquidity vault.
    ///   5. `[]` Token program.
    ///   6. `[writable, signer]` Authority.
    Withdraw {
        /// Amount in base units.
        amount: u64,
    },
}

impl MarginfiInstruction {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(17);
        match *self {
            Self::AccountInitialize => {
                buf.extend_from_slice(&anchor_discriminator(ACCOUNT_INITIALIZE_METHOD));
            }
            Self::Deposit {
                amount,
                deposit_up_to_limit,
            } => {
                buf.extend_from_slice(&anchor_discriminator(DEPOSIT_METHOD));
                buf.extend_from_slice(&amount.to_le_bytes());
                match deposit_up_to_limit {
                    None => buf.push(0),
                    Some(flag) => {
                        buf.push(1);
                        buf.push(flag as u8);
                    }
                }
            }
            Self::Withdraw { amount } => {
                buf.extend_from_slice(&WITHDRAW_DISCRIMINATOR);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
        }
        buf
    }

    pub fn unpack(input: &[u8]) -> Result<Self, ClientError> {
        if input.len() < 8 {
            return Err(ClientError::Decode("instruction discriminator"));
        }
        let (tag, rest) = input.split_at(8);
        if tag == anchor_discriminator(ACCOUNT_INITIALIZE_METHOD) {
            Ok(Self::AccountInitialize)
        } else if tag == anchor_discriminator(DEPOSIT_METHOD) {
            let (amount, rest) = Self::unpack_u64(rest)?;
            let (deposit_up_to_limit, _rest) = Self::unpack_option_bool(rest)?;
            Ok(Self::Deposit {
                amount,
                deposit_up_to_limit,
            })
        } else if tag == WITHDRAW_DISCRIMINATOR {
            let (amount, _rest) = Self::unpack_u64(rest)?;
            Ok(Self::Withdraw { amount })
        } else {
            Err(ClientError::Decode("unknown instruction discriminator"))
        }
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ClientError> {
        if input.len() < 8 {
            return Err(ClientError::Decode("u64 instruction argument"));
        }
        let (bytes, rest) = input.split_at(8);
        let value = bytes
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| ClientError::Decode("u64 instruction argument"))?;
        Ok((value, rest))
    }

    fn unpack_option_bool(input: &[u8]) -> Result<(Option<bool>, &[u8]), ClientError> {
        match input.split_first() {
            Some((0, rest)) => Ok((None, rest)),
            Some((1, rest)) => {
                let (&flag, rest) = rest
                    .split_first()
                    .ok_or(ClientError::Decode("Option<bool> instruction argument"))?;
                Ok((Some(flag != 0), rest))
            }
            _ => Err(ClientError::Decode("Option<bool> instruction argument")),
        }
    }
}
