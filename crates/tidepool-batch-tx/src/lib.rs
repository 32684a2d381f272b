/*!
# Tidepool Batch Transaction Pipeline

Packs ordered instruction sequences into atomic transaction envelopes under
the network's per-transaction ceilings, then drives each envelope to ledger
confirmation through a bounded, classified retry loop.

All network access goes through the [`Network`] capability trait; there is no
implicit global connection. Production code uses [`RpcNetwork`]; tests inject
a scripted double.

## Quick start

```no_run
use tidepool_batch_tx::{pack_instructions, RpcNetwork, TxBatchConfig, TxPipeline};
use solana_sdk::{commitment_config::CommitmentConfig, instruction::Instruction, signature::Keypair, signer::Signer};

# async fn example(instructions: Vec<Instruction>) -> Result<(), Box<dyn std::error::Error>> {
let payer = Keypair::new();
let config = TxBatchConfig::default();
let envelopes = pack_instructions(&config, payer.pubkey(), instructions)?;

let network = RpcNetwork::new(
    "https://api.devnet.solana.com".to_string(),
    CommitmentConfig::confirmed(),
);
let pipeline = TxPipeline::with_config(network, config);
for envelope in &envelopes {
    pipeline.submit_and_confirm(envelope, &[&payer]).await?;
}
# Ok(())
# }
```
*/

mod batcher;
mod config;
mod error;
mod network;
mod pipeline;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use batcher::{pack_instructions, Envelope};
pub use config::TxBatchConfig;
pub use error::TxBatchError;
pub use network::{Network, NetworkError, NetworkResult, RpcNetwork};
pub use pipeline::{EnvelopeState, TxPipeline};
