use crate::error::{CliError, CliResult};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Signer},
};
use std::path::PathBuf;
use tidepool_batch_tx::{pack_instructions, RpcNetwork, TxPipeline};
use tidepool_client::TidepoolClient;
use tidepool_sdk::{
    build_force_override_oracle_ix, AddressFinder, AdminAccounts, ForceOverrideOracleArgs,
};

pub async fn execute(
    pool: u8,
    base: bool,
    price: u32,
    confidence: u32,
    exponent: i8,
    keypair_path: PathBuf,
    rpc_url: String,
) -> CliResult<()> {
    let side = if base { "base" } else { "quote" };
    println!("🔧 Overriding {} price on pool {}...", side, pool);

    let admin = read_keypair_file(&keypair_path)
        .map_err(|e| CliError::InvalidConfig(format!("Failed to read admin keypair: {}", e)))?;

    let client = TidepoolClient::new(RpcNetwork::new(
        rpc_url.clone(),
        CommitmentConfig::confirmed(),
    ));
    let state = client
        .get_root_state()
        .await?
        .ok_or_else(|| CliError::InvalidConfig("No tidepool environment found".to_string()))?;

    let finder = AddressFinder::default();
    let (state_address, _) = finder.find_state_address();
    let accounts = AdminAccounts {
        state: state_address,
        registry: state.registry(),
        admin: admin.pubkey(),
    };

    let instruction = build_force_override_oracle_ix(
        &finder,
        &accounts,
        ForceOverrideOracleArgs {
            index: pool,
            base,
            price,
            conf: confidence,
            exp: exponent,
            time: None,
        },
    )?;

    let pipeline = TxPipeline::new(RpcNetwork::new(rpc_url, CommitmentConfig::confirmed()));
    let envelopes = pack_instructions(pipeline.config(), admin.pubkey(), vec![instruction])?;
    let signatures = pipeline
        .submit_all(&format!("pool {pool}"), &envelopes, &[&admin])
        .await?;

    println!("✅ Price override confirmed: {}", signatures[0]);
    Ok(())
}
