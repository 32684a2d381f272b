//! Mode-polymorphic dispatch of composed instruction groups.
//!
//! The composer builds every group through one code path; the [`Dispatcher`]
//! decides what a finished group becomes. `BuildOnly` collects groups and
//! their fresh signers into a plan; `Execute` packs each group into envelopes
//! and drives them to confirmation, strictly one group after the other.

use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tidepool_batch_tx::{pack_instructions, Network, TxPipeline};
use tracing::info;

use crate::{ComposeError, ComposeResult, EnvironmentPlan};

/// Whether composition yields an instruction plan or a live environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Pure: no network calls, instructions are returned unsigned.
    BuildOnly,
    /// Each group is packed, broadcast, and confirmed before the next starts.
    Execute,
}

/// One labeled instruction group: the unit of dispatch (the root, or one
/// whole pool). A group is packed into as few envelopes as the ceilings
/// allow.
#[derive(Debug, Clone)]
pub struct InstructionGroup {
    pub label: String,
    pub instructions: Vec<Instruction>,
}

/// Execution strategy threaded through one composition run.
pub struct Dispatcher<'a, N: Network> {
    mode: ExecutionMode,
    pipeline: &'a TxPipeline<N>,
    admin: &'a Keypair,
    plan: EnvironmentPlan,
    signatures: Vec<Signature>,
}

impl<'a, N: Network> Dispatcher<'a, N> {
    pub fn new(mode: ExecutionMode, pipeline: &'a TxPipeline<N>, admin: &'a Keypair) -> Self {
        Self {
            mode,
            pipeline,
            admin,
            plan: EnvironmentPlan::default(),
            signatures: Vec::new(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Dispatches one finished group. `fresh_signers` are the keypairs
    /// generated while building the group (registry, mints, reserves) whose
    /// signatures its envelopes require, beyond the admin's.
    pub async fn dispatch(
        &mut self,
        label: &str,
        instructions: Vec<Instruction>,
        fresh_signers: Vec<Keypair>,
    ) -> ComposeResult<()> {
        match self.mode {
            ExecutionMode::BuildOnly => {
                self.plan.groups.push(InstructionGroup {
                    label: label.to_string(),
                    instructions,
                });
                self.plan.signers.extend(fresh_signers);
            }
            ExecutionMode::Execute => {
                let envelopes =
                    pack_instructions(self.pipeline.config(), self.admin.pubkey(), instructions)
                        .map_err(|source| ComposeError::Packing {
                            label: label.to_string(),
                            source,
                        })?;

                let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + fresh_signers.len());
                signers.push(self.admin);
                signers.extend(fresh_signers.iter());

                info!(label, envelopes = envelopes.len(), "queued {label}");
                let signatures = self
                    .pipeline
                    .submit_all(label, &envelopes, &signers)
                    .await
                    .map_err(|source| ComposeError::Broadcast {
                        label: label.to_string(),
                        source,
                    })?;
                info!(label, "confirmed {label}");
                self.signatures.extend(signatures);
            }
        }
        Ok(())
    }

    /// Consumes the dispatcher: the collected plan (build-only) and the
    /// confirmed signatures (execute).
    pub fn finish(self) -> (Option<EnvironmentPlan>, Vec<Signature>) {
        match self.mode {
            ExecutionMode::BuildOnly => (Some(self.plan), self.signatures),
            ExecutionMode::Execute => (None, self.signatures),
        }
    }
}
