/*!
# Tidepool SDK

Client-side surface of the tidepool protocol program: deterministic address
derivation, typed instruction builders for every program entry point, unsigned
transaction helpers, and the declarative environment specification consumed by
`tidepool-deploy`.

The program itself is opaque to this crate: instructions are encoded directly
in the Anchor wire format (8-byte entry-point discriminator followed by
borsh-serialized arguments) without linking the on-chain code.
*/

mod address_finder;
mod error;
mod instruction;
mod instruction_builders;
mod spec;
mod transaction_builders;

pub use address_finder::{AddressFinder, STATEMENT_SEED, STATE_SEED};
pub use error::{SdkError, SdkResult};
pub use instruction::discriminator;
pub use instruction_builders::*;
pub use spec::*;
pub use transaction_builders::*;

use solana_sdk::pubkey::Pubkey;

/// The tidepool program id.
pub const ID: Pubkey = solana_sdk::pubkey!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Serialized size of the pool-registry account, allocated by the caller
/// before `create_state` takes ownership of it.
pub const POOL_REGISTRY_SIZE: usize = 3649;
