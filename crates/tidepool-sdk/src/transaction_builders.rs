//! Unsigned-transaction helpers.
//!
//! These never touch the network: the caller supplies the blockhash and signs.

use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey,
    transaction::Transaction,
};

use crate::{SdkError, SdkResult};

/// Combines instructions into one unsigned transaction with `payer` as
/// fee-payer.
pub fn build_multi_instruction_tx(
    instructions: &[Instruction],
    payer: &Pubkey,
    recent_blockhash: Hash,
) -> SdkResult<Transaction> {
    if instructions.is_empty() {
        return Err(SdkError::MissingAccount("instructions"));
    }

    let message = Message::new_with_blockhash(instructions, Some(payer), &recent_blockhash);
    Ok(Transaction::new_unsigned(message))
}
