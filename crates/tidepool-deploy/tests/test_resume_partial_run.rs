//! A run that stops after pool 0 confirms must be resumable: passing the
//! recorded root handles back in appends exactly the missing pool, with no
//! duplicate root and no duplicate pool 0.

use solana_sdk::{signature::Keypair, signer::Signer};
use tidepool_batch_tx::{testing::MockNetwork, TxPipeline};
use tidepool_deploy::{compose_environment, ExecutionMode};
use tidepool_sdk::{discriminator, ExistingRoot, LendingSpec, PoolSpec, RootSpec};

fn pool() -> PoolSpec {
    PoolSpec {
        token_decimals: 6,
        lending: Some(LendingSpec {
            max_utilization: 800_000,
            max_borrow: 10_000,
            initial_fee_time: 0,
            fees: vec![],
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn resumed_run_appends_one_pool_without_recreating_the_root() {
    let admin = Keypair::new();
    let pipeline = TxPipeline::new(MockNetwork::new());

    // First run: root plus pool 0, then the process "crashes".
    let first = compose_environment(
        &pipeline,
        &admin,
        &RootSpec::new(admin.pubkey()),
        &[pool()],
        ExecutionMode::Execute,
    )
    .await
    .unwrap();
    assert_eq!(first.pools.len(), 1);
    assert_eq!(first.next_pool_index(), 1);

    // Resume with the recorded handles: only pool 1 is provisioned.
    let resumed_root = RootSpec::new(admin.pubkey()).with_existing(ExistingRoot {
        state: first.state,
        registry: first.registry,
        pool_count: first.next_pool_index(),
    });
    let second = compose_environment(
        &pipeline,
        &admin,
        &resumed_root,
        &[pool()],
        ExecutionMode::Execute,
    )
    .await
    .unwrap();

    assert_eq!(second.state, first.state);
    assert_eq!(second.registry, first.registry);
    assert_eq!(second.pools.len(), 1);
    assert_eq!(second.pools[0].index, 1);

    // Exactly one create_state and two init_pool across both runs.
    let sent = pipeline.network().sent_transactions();
    let count = |name: &str| {
        let disc = discriminator(name);
        sent.iter()
            .flat_map(|tx| tx.message.instructions.iter())
            .filter(|ix| ix.data.starts_with(&disc))
            .count()
    };
    assert_eq!(count("create_state"), 1);
    assert_eq!(count("init_pool"), 2);
}

#[tokio::test]
async fn resumed_build_only_plan_has_no_root_group() {
    let admin = Keypair::new();
    let pipeline = TxPipeline::new(MockNetwork::new());

    let root = RootSpec::new(admin.pubkey()).with_existing(ExistingRoot {
        state: solana_sdk::pubkey::Pubkey::new_unique(),
        registry: solana_sdk::pubkey::Pubkey::new_unique(),
        pool_count: 3,
    });

    let handle = compose_environment(
        &pipeline,
        &admin,
        &root,
        &[pool()],
        ExecutionMode::BuildOnly,
    )
    .await
    .unwrap();

    let plan = handle.plan.unwrap();
    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.groups[0].label, "pool 3");
    assert!(!plan
        .instructions()
        .any(|ix| ix.data.starts_with(&discriminator("create_state"))));
    assert_eq!(handle.pools[0].index, 3);
}
