use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "tidepool")]
#[command(about = "Tidepool CLI - Declarative environment provisioning for the tidepool protocol")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy an environment from a configuration file
    Deploy {
        /// Environment configuration file (YAML)
        config: PathBuf,

        /// Admin keypair file
        #[arg(short, long)]
        keypair: PathBuf,

        /// Solana RPC URL
        #[arg(short, long, default_value = "https://api.devnet.solana.com")]
        rpc_url: String,

        /// Build and print the instruction plan without broadcasting
        #[arg(long)]
        dry_run: bool,

        /// Write the resolved handles to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the deployed environment
    Status {
        /// Solana RPC URL
        #[arg(short, long, default_value = "https://api.devnet.solana.com")]
        rpc_url: String,
    },

    /// Force-override one side's price source on a pool
    OverridePrice {
        /// Pool index
        pool: u8,

        /// Override the base side (the quote side otherwise)
        #[arg(long)]
        base: bool,

        /// Price in feed units
        #[arg(long)]
        price: u32,

        /// Confidence interval
        #[arg(long, default_value = "1")]
        confidence: u32,

        /// Decimal exponent of the price
        #[arg(long, default_value = "-2", allow_hyphen_values = true)]
        exponent: i8,

        /// Admin keypair file
        #[arg(short, long)]
        keypair: PathBuf,

        /// Solana RPC URL
        #[arg(short, long, default_value = "https://api.devnet.solana.com")]
        rpc_url: String,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tidepool=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Deploy {
            config,
            keypair,
            rpc_url,
            dry_run,
            output,
        } => runtime.block_on(commands::deploy::execute(
            config, keypair, rpc_url, dry_run, output,
        )),
        Commands::Status { rpc_url } => runtime.block_on(commands::status::execute(rpc_url)),
        Commands::OverridePrice {
            pool,
            base,
            price,
            confidence,
            exponent,
            keypair,
            rpc_url,
        } => runtime.block_on(commands::override_price::execute(
            pool, base, price, confidence, exponent, keypair, rpc_url,
        )),
    }
}
