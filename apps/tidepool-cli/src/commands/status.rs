use crate::error::CliResult;
use solana_sdk::commitment_config::CommitmentConfig;
use tidepool_batch_tx::RpcNetwork;
use tidepool_client::TidepoolClient;

pub async fn execute(rpc_url: String) -> CliResult<()> {
    println!("🔍 Reading tidepool environment...");
    println!("RPC URL: {}", rpc_url);

    let network = RpcNetwork::new(rpc_url, CommitmentConfig::confirmed());
    let client = TidepoolClient::new(network);

    let Some((state, registry)) = client.get_environment().await? else {
        println!("\nNo tidepool environment found.");
        return Ok(());
    };

    println!("\n✅ Environment");
    println!("  Admin:    {}", state.admin());
    println!("  Registry: {}", state.registry());
    println!("  Pools:    {}", registry.pool_count());

    for index in 0..registry.pool_count() {
        println!("\n  📦 Pool {}", index);
        println!("    Base token:  {}", registry.base_token(index)?);
        println!("    Quote token: {}", registry.quote_token(index)?);

        let mut services = Vec::new();
        if registry.has_lending(index)? {
            services.push("lending");
        }
        if registry.has_swapping(index)? {
            services.push("swapping");
        }
        if registry.has_trading(index)? {
            services.push("trading");
        }
        println!(
            "    Services:    {}",
            if services.is_empty() {
                "none".to_string()
            } else {
                services.join(", ")
            }
        );

        for (side, label) in [(true, "base"), (false, "quote")] {
            if let Some(price) = registry.price(index, side)? {
                println!(
                    "    {} price: {} ± {} (e{})",
                    label, price.price, price.confidence, price.exponent
                );
            }
        }

        let strategy_count = registry.strategy_count(index)?;
        println!("    Strategies:  {}", strategy_count);
        for strategy_index in 0..strategy_count {
            let strategy = registry.strategy(index, strategy_index)?;
            let mut flags = Vec::new();
            if strategy.lend {
                flags.push("lend");
            }
            if strategy.swap {
                flags.push("swap");
            }
            if strategy.trade {
                flags.push("trade");
            }
            println!(
                "      {} [{}] collateral {} / liquidation {}",
                strategy_index,
                flags.join("+"),
                strategy.collateral_ratio,
                strategy.liquidation_threshold
            );
        }
    }

    Ok(())
}
