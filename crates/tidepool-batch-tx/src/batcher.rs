//! Order-preserving packing of instruction sequences into envelopes.

use solana_sdk::{hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey};
use tracing::warn;

use crate::{TxBatchConfig, TxBatchError};

/// An atomic, size-bounded batch of instructions: the unit of broadcast.
/// All instructions apply or none do.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub instructions: Vec<Instruction>,
    pub fee_payer: Pubkey,
}

impl Envelope {
    pub fn new(instructions: Vec<Instruction>, fee_payer: Pubkey) -> Self {
        Self {
            instructions,
            fee_payer,
        }
    }
}

/// Serialized wire size of a transaction holding `instructions`: message
/// bytes plus the signature array (64 bytes per required signer, one byte of
/// count prefix).
fn estimated_wire_size(instructions: &[Instruction], fee_payer: &Pubkey) -> usize {
    let message = Message::new_with_blockhash(instructions, Some(fee_payer), &Hash::default());
    let signatures = message.header.num_required_signatures as usize;
    message.serialize().len() + 1 + 64 * signatures
}

fn fits(config: &TxBatchConfig, instructions: &[Instruction], fee_payer: &Pubkey) -> bool {
    if instructions.len() > config.max_instructions_per_tx {
        return false;
    }
    let estimated_units = instructions.len() as u32 * config.compute_units_per_instruction;
    if estimated_units > config.compute_unit_ceiling {
        return false;
    }
    estimated_wire_size(instructions, fee_payer) <= config.max_transaction_size_bytes
}

/// Packs `instructions` into envelopes in their original order, closing an
/// envelope whenever appending the next instruction would exceed the
/// instruction-count, byte-size, or compute ceiling.
///
/// Instructions are never reordered. A sequence that spills into more than
/// one envelope loses atomicity across the split; that is reported, not
/// masked.
pub fn pack_instructions(
    config: &TxBatchConfig,
    fee_payer: Pubkey,
    instructions: Vec<Instruction>,
) -> Result<Vec<Envelope>, TxBatchError> {
    let mut envelopes = Vec::new();
    let mut current: Vec<Instruction> = Vec::new();

    for instruction in instructions {
        if !fits(config, std::slice::from_ref(&instruction), &fee_payer) {
            // A single instruction that can never fit.
            return Err(TxBatchError::TransactionTooLarge {
                size: estimated_wire_size(std::slice::from_ref(&instruction), &fee_payer),
                max: config.max_transaction_size_bytes,
            });
        }

        current.push(instruction);
        if fits(config, &current, &fee_payer) {
            continue;
        }

        // Close the envelope before the instruction that overflowed it.
        let overflow = current.pop();
        envelopes.push(Envelope::new(std::mem::take(&mut current), fee_payer));
        current.extend(overflow);
    }

    if !current.is_empty() {
        envelopes.push(Envelope::new(current, fee_payer));
    }

    if envelopes.len() > 1 {
        warn!(
            envelopes = envelopes.len(),
            "instruction sequence split across envelopes; atomicity holds only within each envelope"
        );
    }

    Ok(envelopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::system_instruction;

    fn transfer_ix(payer: &Pubkey) -> Instruction {
        system_instruction::transfer(payer, &Pubkey::new_unique(), 1)
    }

    #[test]
    fn packs_everything_into_one_envelope_when_it_fits() {
        let config = TxBatchConfig::default();
        let payer = Pubkey::new_unique();
        let instructions: Vec<_> = (0..3).map(|_| transfer_ix(&payer)).collect();

        let envelopes = pack_instructions(&config, payer, instructions).unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].instructions.len(), 3);
    }

    #[test]
    fn respects_instruction_count_ceiling_without_reordering() {
        let config = TxBatchConfig {
            max_instructions_per_tx: 4,
            ..Default::default()
        };
        let payer = Pubkey::new_unique();
        let instructions: Vec<_> = (0..10).map(|_| transfer_ix(&payer)).collect();
        let expected: Vec<_> = instructions.iter().map(|ix| ix.accounts[1].pubkey).collect();

        let envelopes = pack_instructions(&config, payer, instructions).unwrap();
        assert_eq!(envelopes.len(), 3);
        for envelope in &envelopes {
            assert!(envelope.instructions.len() <= 4);
        }

        let repacked: Vec<_> = envelopes
            .iter()
            .flat_map(|e| e.instructions.iter().map(|ix| ix.accounts[1].pubkey))
            .collect();
        assert_eq!(repacked, expected);
    }

    #[test]
    fn respects_byte_size_ceiling() {
        let config = TxBatchConfig {
            max_transaction_size_bytes: 400,
            ..Default::default()
        };
        let payer = Pubkey::new_unique();
        let instructions: Vec<_> = (0..6).map(|_| transfer_ix(&payer)).collect();

        let envelopes = pack_instructions(&config, payer, instructions).unwrap();
        assert!(envelopes.len() > 1);
        for envelope in &envelopes {
            assert!(estimated_wire_size(&envelope.instructions, &payer) <= 400);
        }
    }

    #[test]
    fn respects_compute_ceiling() {
        let config = TxBatchConfig {
            compute_unit_ceiling: 200_000,
            compute_units_per_instruction: 100_000,
            ..Default::default()
        };
        let payer = Pubkey::new_unique();
        let instructions: Vec<_> = (0..5).map(|_| transfer_ix(&payer)).collect();

        let envelopes = pack_instructions(&config, payer, instructions).unwrap();
        for envelope in &envelopes {
            assert!(envelope.instructions.len() <= 2);
        }
    }

    #[test]
    fn oversized_single_instruction_is_an_error() {
        let config = TxBatchConfig {
            max_transaction_size_bytes: 64,
            ..Default::default()
        };
        let payer = Pubkey::new_unique();

        let result = pack_instructions(&config, payer, vec![transfer_ix(&payer)]);
        assert!(matches!(
            result,
            Err(TxBatchError::TransactionTooLarge { .. })
        ));
    }

    #[test]
    fn empty_input_yields_no_envelopes() {
        let config = TxBatchConfig::default();
        let envelopes = pack_instructions(&config, Pubkey::new_unique(), vec![]).unwrap();
        assert!(envelopes.is_empty());
    }
}
