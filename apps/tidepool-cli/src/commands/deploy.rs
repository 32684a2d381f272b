use crate::config::{DeployOutput, EnvironmentConfig};
use crate::error::{CliError, CliResult};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Signer},
};
use std::fs;
use std::path::PathBuf;
use tidepool_batch_tx::{RpcNetwork, TxPipeline};
use tidepool_deploy::{compose_environment, ExecutionMode};

pub async fn execute(
    config_path: PathBuf,
    keypair_path: PathBuf,
    rpc_url: String,
    dry_run: bool,
    output: Option<PathBuf>,
) -> CliResult<()> {
    println!("🚀 Deploying tidepool environment...");
    println!("Config: {}", config_path.display());
    println!("RPC URL: {}", rpc_url);

    println!("\n🔑 Reading admin keypair...");
    let admin = read_keypair_file(&keypair_path)
        .map_err(|e| CliError::InvalidConfig(format!("Failed to read admin keypair: {}", e)))?;
    println!("✅ Admin public key: {}", admin.pubkey());

    println!("\n📋 Reading environment configuration...");
    let config: EnvironmentConfig = serde_yaml::from_str(&fs::read_to_string(&config_path)?)?;
    let root = config.root_spec(admin.pubkey());
    let pools = config.pool_specs();
    println!(
        "✅ Environment '{}': {} pools{}",
        config.environment_name,
        pools.len(),
        if root.existing.is_some() {
            " (resuming against existing root)"
        } else {
            ""
        }
    );

    let network = RpcNetwork::new(rpc_url, CommitmentConfig::confirmed());
    let pipeline = TxPipeline::new(network);

    let mode = if dry_run {
        ExecutionMode::BuildOnly
    } else {
        ExecutionMode::Execute
    };
    let handle = compose_environment(&pipeline, &admin, &root, &pools, mode).await?;

    if let Some(plan) = &handle.plan {
        println!("\n📦 Instruction plan ({} groups):", plan.groups.len());
        for group in &plan.groups {
            println!(
                "  {}: {} instructions",
                group.label,
                group.instructions.len()
            );
        }
        println!("\nDry run: nothing was broadcast.");
        return Ok(());
    }

    println!("\n🎉 Environment deployed!");
    println!("  State:    {}", handle.state);
    println!("  Registry: {}", handle.registry);
    for pool in &handle.pools {
        println!(
            "  Pool {}: base {} / quote {}",
            pool.index, pool.base_token, pool.quote_token
        );
    }
    println!("  {} envelopes confirmed", handle.signatures.len());

    if let Some(output_path) = output {
        let summary = DeployOutput::from_handle(&handle);
        fs::write(&output_path, serde_json::to_string_pretty(&summary)?)?;
        println!("\n💾 Wrote handles to {}", output_path.display());
        println!("   Feed them back under `existing:` to resume or extend this environment.");
    }

    Ok(())
}
