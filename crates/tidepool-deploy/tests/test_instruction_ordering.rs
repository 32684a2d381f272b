//! The per-pool emission order is load-bearing: a pool exists before its
//! services, price sources before any strategy, fee curves right after the
//! service they refine, strategies last and in input order.

use solana_sdk::{signature::Keypair, signer::Signer};
use tidepool_batch_tx::{testing::MockNetwork, TxPipeline};
use tidepool_deploy::{compose_environment, ExecutionMode};
use tidepool_sdk::{
    discriminator, FeeCurveSegment, FeeCurveTarget, LendingSpec, PoolSpec, PriceOverride,
    PriceSourceSpec, RootSpec, StrategySpec, SwapSpec, TradingSpec,
};

fn oracle(price: u32) -> PriceSourceSpec {
    PriceSourceSpec {
        feed: None,
        decimals: 6,
        skip_init: true,
        max_update_interval: 10,
        override_price: Some(PriceOverride {
            price,
            confidence: 1,
            exponent: -2,
        }),
    }
}

fn segment(target: FeeCurveTarget, bound: u64) -> FeeCurveSegment {
    FeeCurveSegment {
        target,
        bound,
        a: 0,
        b: 0,
        c: 3000,
    }
}

fn full_pool() -> PoolSpec {
    PoolSpec {
        token_decimals: 6,
        base_oracle: Some(oracle(200)),
        quote_oracle: Some(oracle(100)),
        lending: Some(LendingSpec {
            max_utilization: 800_000,
            max_borrow: 10_000,
            initial_fee_time: 0,
            fees: vec![
                segment(FeeCurveTarget::Lend, 500_000),
                segment(FeeCurveTarget::Lend, 1_000_000),
            ],
        }),
        swapping: Some(SwapSpec {
            kept_fee: 100_000,
            max_total_sold: 1_000_000,
            fees: vec![
                segment(FeeCurveTarget::SwapBuy, 1_000_000),
                segment(FeeCurveTarget::SwapSell, 1_000_000),
            ],
        }),
        trading: Some(TradingSpec {
            collateral_ratio: 1_500_000,
            liquidation_threshold: 1_100_000,
            max_leverage: 5,
            open_fee: 2_000,
        }),
        strategies: vec![
            StrategySpec {
                lend: true,
                swap: false,
                trade: false,
                collateral_ratio: 1_000_000,
                liquidation_threshold: 1_000_000,
            },
            StrategySpec {
                lend: true,
                swap: true,
                trade: true,
                collateral_ratio: 1_200_000,
                liquidation_threshold: 1_050_000,
            },
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn pool_instructions_follow_the_dependency_order() {
    let admin = Keypair::new();
    let root = RootSpec::new(admin.pubkey());
    let pipeline = TxPipeline::new(MockNetwork::new());

    let handle = compose_environment(
        &pipeline,
        &admin,
        &root,
        &[full_pool()],
        ExecutionMode::BuildOnly,
    )
    .await
    .unwrap();

    let plan = handle.plan.expect("build-only carries a plan");
    assert_eq!(plan.groups.len(), 2);
    assert_eq!(plan.groups[0].label, "root");
    assert_eq!(plan.groups[1].label, "pool 0");

    // Only the program's own instructions; mint setup goes through the
    // system and token programs.
    let entry_points: Vec<[u8; 8]> = plan.groups[1]
        .instructions
        .iter()
        .filter(|ix| ix.program_id == tidepool_sdk::ID)
        .map(|ix| ix.data[..8].try_into().unwrap())
        .collect();

    let expected: Vec<[u8; 8]> = [
        "init_pool",
        "enable_oracle",
        "force_override_oracle",
        "enable_oracle",
        "force_override_oracle",
        "enable_lending",
        "modify_fee_curve",
        "modify_fee_curve",
        "enable_swapping",
        "modify_fee_curve",
        "modify_fee_curve",
        "enable_trading",
        "add_strategy",
        "add_strategy",
    ]
    .iter()
    .map(|name| discriminator(name))
    .collect();

    assert_eq!(entry_points, expected);
}

#[tokio::test]
async fn price_sources_strictly_precede_strategies() {
    let admin = Keypair::new();
    let root = RootSpec::new(admin.pubkey());
    let pipeline = TxPipeline::new(MockNetwork::new());

    let handle = compose_environment(
        &pipeline,
        &admin,
        &root,
        &[full_pool()],
        ExecutionMode::BuildOnly,
    )
    .await
    .unwrap();

    let instructions = &handle.plan.unwrap().groups[1].instructions;
    let last_oracle = instructions
        .iter()
        .rposition(|ix| ix.data.starts_with(&discriminator("enable_oracle")))
        .unwrap();
    let first_strategy = instructions
        .iter()
        .position(|ix| ix.data.starts_with(&discriminator("add_strategy")))
        .unwrap();
    assert!(last_oracle < first_strategy);
}

#[tokio::test]
async fn fee_curve_segments_keep_their_input_order() {
    let admin = Keypair::new();
    let root = RootSpec::new(admin.pubkey());
    let pipeline = TxPipeline::new(MockNetwork::new());

    let mut pool = full_pool();
    pool.lending.as_mut().unwrap().fees = vec![
        segment(FeeCurveTarget::Lend, 250_000),
        segment(FeeCurveTarget::Lend, 600_000),
        segment(FeeCurveTarget::Lend, 1_000_000),
    ];

    let handle = compose_environment(&pipeline, &admin, &root, &[pool], ExecutionMode::BuildOnly)
        .await
        .unwrap();

    // Wire layout after the discriminator: index u8, service u8, base u8,
    // bound u64 le.
    let bounds: Vec<u64> = handle.plan.unwrap().groups[1]
        .instructions
        .iter()
        .filter(|ix| ix.data.starts_with(&discriminator("modify_fee_curve")))
        .filter(|ix| ix.data[9] == 1)
        .map(|ix| u64::from_le_bytes(ix.data[11..19].try_into().unwrap()))
        .collect();

    assert_eq!(bounds, vec![250_000, 600_000, 1_000_000]);
}
