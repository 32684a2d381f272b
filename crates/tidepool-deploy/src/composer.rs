//! Spec-to-instruction composition.
//!
//! One run owns its whole instruction graph: the root group first (unless a
//! pre-existing root is supplied), then one group per pool in input order.
//! Within a pool the emission order is load-bearing and fixed: the pool must
//! exist before any service is enabled on it, price sources must exist before
//! any strategy that will read them, and fee curves refine a service only
//! after it is enabled.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use tidepool_batch_tx::{Network, TxPipeline};
use tidepool_sdk::{
    build_add_strategy_ix, build_create_mint_ixs, build_create_registry_account_ix,
    build_create_state_ix, build_enable_lending_ix, build_enable_oracle_ix,
    build_enable_swapping_ix, build_enable_trading_ix, build_force_override_oracle_ix,
    build_init_pool_ix, build_modify_fee_curve_ix, AddStrategyArgs, AddressFinder, AdminAccounts,
    EnableLendingArgs, EnableOracleArgs, EnableSwappingArgs, EnableTradingArgs,
    ForceOverrideOracleArgs, ModifyFeeCurveArgs, PoolSpec, PoolTokenAccounts, PriceSourceSpec,
    RootSpec, POOL_REGISTRY_SIZE,
};
use tracing::debug;

use crate::{
    ComposeError, ComposeResult, Dispatcher, EnvironmentHandle, ExecutionMode, PoolHandle,
};

/// Composes the target environment described by `root` and `pools`.
///
/// In [`ExecutionMode::BuildOnly`] no network call is made and the returned
/// handle carries the unsigned instruction plan. In
/// [`ExecutionMode::Execute`] each group is packed, broadcast, and confirmed
/// before the next starts; a failure aborts the remaining pools but leaves
/// already-confirmed ones applied. Re-invoking with the handle's addresses in
/// [`RootSpec::existing`] resumes such a run without duplicating pools.
pub async fn compose_environment<N: Network>(
    pipeline: &TxPipeline<N>,
    admin: &Keypair,
    root: &RootSpec,
    pools: &[PoolSpec],
    mode: ExecutionMode,
) -> ComposeResult<EnvironmentHandle> {
    if root.admin != admin.pubkey() {
        return Err(ComposeError::Config(format!(
            "spec admin {} does not match the signing keypair {}",
            root.admin,
            admin.pubkey()
        )));
    }

    let finder = AddressFinder::new(root.program_id);
    let mut dispatcher = Dispatcher::new(mode, pipeline, admin);

    let (state, registry, start_index) = match &root.existing {
        Some(existing) => {
            debug!(state = %existing.state, registry = %existing.registry,
                   pool_count = existing.pool_count, "resuming against existing root");
            (existing.state, existing.registry, existing.pool_count)
        }
        None => {
            let registry_keypair = Keypair::new();
            let registry = registry_keypair.pubkey();
            let (state, _) = finder.find_state_address();

            let instructions = vec![
                build_create_registry_account_ix(
                    &root.admin,
                    &registry,
                    POOL_REGISTRY_SIZE,
                    &root.program_id,
                ),
                build_create_state_ix(&finder, root.admin, registry)?,
            ];
            dispatcher
                .dispatch("root", instructions, vec![registry_keypair])
                .await?;
            (state, registry, 0)
        }
    };

    let admin_accounts = AdminAccounts {
        state,
        registry,
        admin: root.admin,
    };

    let mut handles = Vec::with_capacity(pools.len());
    for (offset, spec) in pools.iter().enumerate() {
        let index = u8::try_from(start_index as usize + offset)
            .map_err(|_| ComposeError::Config("pool index exceeds u8 range".to_string()))?;
        let (instructions, fresh_signers, handle) =
            compose_pool(&finder, &admin_accounts, spec, index)?;
        dispatcher
            .dispatch(&format!("pool {index}"), instructions, fresh_signers)
            .await?;
        handles.push(handle);
    }

    let (plan, signatures) = dispatcher.finish();
    Ok(EnvironmentHandle {
        state,
        registry,
        admin: root.admin,
        pools: handles,
        plan,
        signatures,
    })
}

/// Emits one pool's instructions in dependency order and records its
/// identities.
fn compose_pool(
    finder: &AddressFinder,
    admin_accounts: &AdminAccounts,
    spec: &PoolSpec,
    index: u8,
) -> ComposeResult<(Vec<Instruction>, Vec<Keypair>, PoolHandle)> {
    let mut instructions = Vec::new();
    let mut fresh_signers = Vec::new();

    let base_token = resolve_mint(
        &admin_accounts.admin,
        spec.base_token,
        spec.token_decimals,
        &mut instructions,
        &mut fresh_signers,
    )?;
    let quote_token = resolve_mint(
        &admin_accounts.admin,
        spec.quote_token,
        spec.token_decimals,
        &mut instructions,
        &mut fresh_signers,
    )?;

    let reserve_base = Keypair::new();
    let reserve_quote = Keypair::new();
    let tokens = PoolTokenAccounts {
        base: base_token,
        quote: quote_token,
        reserve_base: reserve_base.pubkey(),
        reserve_quote: reserve_quote.pubkey(),
    };
    instructions.push(build_init_pool_ix(finder, admin_accounts, &tokens)?);
    fresh_signers.push(reserve_base);
    fresh_signers.push(reserve_quote);

    let base_oracle = compose_oracle(
        finder,
        admin_accounts,
        spec.base_oracle.as_ref(),
        index,
        true,
        &mut instructions,
    )?;
    let quote_oracle = compose_oracle(
        finder,
        admin_accounts,
        spec.quote_oracle.as_ref(),
        index,
        false,
        &mut instructions,
    )?;

    if let Some(lending) = &spec.lending {
        instructions.push(build_enable_lending_ix(
            finder,
            admin_accounts,
            EnableLendingArgs {
                index,
                max_utilization: lending.max_utilization,
                max_borrow: lending.max_borrow,
                initial_fee_time: lending.initial_fee_time,
            },
        )?);
        for segment in &lending.fees {
            instructions.push(build_modify_fee_curve_ix(
                finder,
                admin_accounts,
                ModifyFeeCurveArgs::for_segment(index, segment),
            )?);
        }
    }

    if let Some(swapping) = &spec.swapping {
        instructions.push(build_enable_swapping_ix(
            finder,
            admin_accounts,
            EnableSwappingArgs {
                index,
                kept_fee: swapping.kept_fee,
                max_total_sold: swapping.max_total_sold,
            },
        )?);
        for segment in &swapping.fees {
            instructions.push(build_modify_fee_curve_ix(
                finder,
                admin_accounts,
                ModifyFeeCurveArgs::for_segment(index, segment),
            )?);
        }
    }

    if let Some(trading) = &spec.trading {
        instructions.push(build_enable_trading_ix(
            finder,
            admin_accounts,
            EnableTradingArgs {
                index,
                collateral_ratio: trading.collateral_ratio,
                liquidation_threshold: trading.liquidation_threshold,
                max_leverage: trading.max_leverage,
                open_fee: trading.open_fee,
            },
        )?);
    }

    for strategy in &spec.strategies {
        instructions.push(build_add_strategy_ix(
            finder,
            admin_accounts,
            AddStrategyArgs {
                index,
                lend: strategy.lend,
                swap: strategy.swap,
                trade: strategy.trade,
                collateral_ratio: strategy.collateral_ratio,
                liquidation_threshold: strategy.liquidation_threshold,
            },
        )?);
    }

    debug!(index, instructions = instructions.len(), "composed pool");
    let handle = PoolHandle {
        index,
        base_token,
        quote_token,
        base_reserve: tokens.reserve_base,
        quote_reserve: tokens.reserve_quote,
        base_oracle,
        quote_oracle,
    };
    Ok((instructions, fresh_signers, handle))
}

/// An existing mint passes through; a missing one is minted fresh, with its
/// keypair added to the group's signers.
fn resolve_mint(
    admin: &Pubkey,
    existing: Option<Pubkey>,
    decimals: u8,
    instructions: &mut Vec<Instruction>,
    fresh_signers: &mut Vec<Keypair>,
) -> ComposeResult<Pubkey> {
    match existing {
        Some(mint) => Ok(mint),
        None => {
            let keypair = Keypair::new();
            let mint = keypair.pubkey();
            instructions.extend(build_create_mint_ixs(admin, &mint, admin, decimals)?);
            fresh_signers.push(keypair);
            Ok(mint)
        }
    }
}

/// Enables one side's price source, then applies its administrative override
/// if configured. The feed identity is recorded even when freshly generated.
fn compose_oracle(
    finder: &AddressFinder,
    admin_accounts: &AdminAccounts,
    spec: Option<&PriceSourceSpec>,
    index: u8,
    base: bool,
    instructions: &mut Vec<Instruction>,
) -> ComposeResult<Option<Pubkey>> {
    let Some(oracle) = spec else {
        return Ok(None);
    };

    let feed = oracle.feed.unwrap_or_else(|| Keypair::new().pubkey());
    instructions.push(build_enable_oracle_ix(
        finder,
        admin_accounts,
        feed,
        EnableOracleArgs {
            index,
            decimals: oracle.decimals,
            base,
            skip_init: oracle.skip_init,
            max_update_interval: oracle.max_update_interval,
        },
    )?);

    if let Some(price) = oracle.override_price {
        instructions.push(build_force_override_oracle_ix(
            finder,
            admin_accounts,
            ForceOverrideOracleArgs {
                index,
                base,
                price: price.price,
                conf: price.confidence,
                exp: price.exponent,
                time: None,
            },
        )?);
    }

    Ok(Some(feed))
}
