//! Resolved addresses of a composed environment.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::{Keypair, Signature}};

use crate::dispatcher::InstructionGroup;

/// Everything a caller needs to reference a composed environment afterwards:
/// the root accounts, one [`PoolHandle`] per pool, and, depending on the
/// execution mode, either the unsigned instruction plan or the confirmed
/// signatures.
pub struct EnvironmentHandle {
    pub state: Pubkey,
    pub registry: Pubkey,
    pub admin: Pubkey,
    /// Pools composed by this run, in input order. Pools that already existed
    /// before a resumed run are not listed.
    pub pools: Vec<PoolHandle>,
    /// Present in build-only mode: the ordered instruction groups plus the
    /// fresh keypairs that must co-sign them.
    pub plan: Option<EnvironmentPlan>,
    /// Present in execute mode: one signature per confirmed envelope, in
    /// submission order.
    pub signatures: Vec<Signature>,
}

impl EnvironmentHandle {
    /// Total pools registered after this run, usable as
    /// [`tidepool_sdk::ExistingRoot::pool_count`] on re-entry.
    pub fn next_pool_index(&self) -> u8 {
        self.pools
            .last()
            .map(|pool| pool.index + 1)
            .unwrap_or_default()
    }
}

/// Identities of one pool, recorded at composition time.
#[derive(Debug, Clone, Copy)]
pub struct PoolHandle {
    pub index: u8,
    pub base_token: Pubkey,
    pub quote_token: Pubkey,
    pub base_reserve: Pubkey,
    pub quote_reserve: Pubkey,
    pub base_oracle: Option<Pubkey>,
    pub quote_oracle: Option<Pubkey>,
}

/// The build-only output: instruction groups in dependency order and the
/// freshly generated keypairs (registry, mints, reserves) whose signatures
/// the envelopes will require.
#[derive(Default)]
pub struct EnvironmentPlan {
    pub groups: Vec<InstructionGroup>,
    pub signers: Vec<Keypair>,
}

impl EnvironmentPlan {
    /// All instructions of the plan, flattened in emission order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.groups.iter().flat_map(|group| group.instructions.iter())
    }
}
