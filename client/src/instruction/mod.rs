pub mod builder;
mod marginfi_instruction;

pub use marginfi_instruction::{
    anchor_discriminator, MarginfiInstruction, ACCOUNT_INITIALIZE_METHOD, DEPOSIT_METHOD,
    WITHDRAW_DISCRIMINATOR,
};
