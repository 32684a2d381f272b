use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tidepool_deploy::EnvironmentHandle;
use tidepool_sdk::{
    ExistingRoot, FeeCurveSegment, FeeCurveTarget, LendingSpec, PoolSpec, PriceOverride,
    PriceSourceSpec, RootSpec, StrategySpec, SwapSpec, TradingSpec,
};

/// Environment configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Human-readable environment name (for organization)
    pub environment_name: String,

    /// Program id override; the canonical tidepool program when absent
    pub program_id: Option<Pubkey>,

    /// Handles of a previous run, for resuming a partial deployment
    pub existing: Option<ExistingRootConfig>,

    /// Pools to provision, in order
    pub pools: Vec<PoolConfig>,
}

impl EnvironmentConfig {
    pub fn root_spec(&self, admin: Pubkey) -> RootSpec {
        let mut root = RootSpec::new(admin);
        if let Some(program_id) = self.program_id {
            root.program_id = program_id;
        }
        if let Some(existing) = &self.existing {
            root = root.with_existing(ExistingRoot {
                state: existing.state,
                registry: existing.registry,
                pool_count: existing.pool_count,
            });
        }
        root
    }

    pub fn pool_specs(&self) -> Vec<PoolSpec> {
        self.pools.iter().map(PoolConfig::to_spec).collect()
    }
}

/// Handles returned by a previous run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingRootConfig {
    pub state: Pubkey,
    pub registry: Pubkey,
    pub pool_count: u8,
}

/// Configuration for a single pool within an environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Human-readable pool name (for organization)
    pub pool_name: String,

    /// Existing base mint; minted fresh when absent
    pub base_token: Option<Pubkey>,

    /// Existing quote mint; minted fresh when absent
    pub quote_token: Option<Pubkey>,

    /// Decimals used when minting fresh tokens
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,

    pub base_oracle: Option<OracleConfig>,
    pub quote_oracle: Option<OracleConfig>,
    pub lending: Option<LendingConfig>,
    pub swapping: Option<SwapConfig>,
    pub trading: Option<TradingConfig>,

    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
}

impl PoolConfig {
    pub fn to_spec(&self) -> PoolSpec {
        PoolSpec {
            base_token: self.base_token,
            quote_token: self.quote_token,
            token_decimals: self.token_decimals,
            base_oracle: self.base_oracle.as_ref().map(OracleConfig::to_spec),
            quote_oracle: self.quote_oracle.as_ref().map(OracleConfig::to_spec),
            lending: self.lending.as_ref().map(LendingConfig::to_spec),
            swapping: self.swapping.as_ref().map(SwapConfig::to_spec),
            trading: self.trading.as_ref().map(TradingConfig::to_spec),
            strategies: self.strategies.iter().map(StrategyConfig::to_spec).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Feed account; a fresh identity is recorded when absent
    pub feed: Option<Pubkey>,

    #[serde(default = "default_token_decimals")]
    pub decimals: u8,

    #[serde(default = "default_true")]
    pub skip_init: bool,

    /// Maximum accepted feed staleness, in seconds
    #[serde(default = "default_max_update_interval")]
    pub max_update_interval: u32,

    pub override_price: Option<PriceOverrideConfig>,
}

impl OracleConfig {
    fn to_spec(&self) -> PriceSourceSpec {
        PriceSourceSpec {
            feed: self.feed,
            decimals: self.decimals,
            skip_init: self.skip_init,
            max_update_interval: self.max_update_interval,
            override_price: self.override_price.as_ref().map(PriceOverrideConfig::to_spec),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOverrideConfig {
    pub price: u32,
    #[serde(default = "default_confidence")]
    pub confidence: u32,
    pub exponent: i8,
}

impl PriceOverrideConfig {
    fn to_spec(&self) -> PriceOverride {
        PriceOverride {
            price: self.price,
            confidence: self.confidence,
            exponent: self.exponent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LendingConfig {
    /// Utilization ceiling, fraction denominated in 1e6
    pub max_utilization: u32,

    /// Borrow ceiling in quote units
    pub max_borrow: u64,

    /// Grace period before fees accrue, in seconds
    #[serde(default)]
    pub initial_fee_time: u32,

    /// Fee-curve segments in ascending bound order
    #[serde(default)]
    pub fees: Vec<FeeSegmentConfig>,
}

impl LendingConfig {
    fn to_spec(&self) -> LendingSpec {
        LendingSpec {
            max_utilization: self.max_utilization,
            max_borrow: self.max_borrow,
            initial_fee_time: self.initial_fee_time,
            fees: self.fees.iter().map(FeeSegmentConfig::to_spec).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Share of fees kept by the pool, fraction denominated in 1e6
    pub kept_fee: u32,

    /// Ceiling on total notional sold
    pub max_total_sold: u64,

    #[serde(default)]
    pub fees: Vec<FeeSegmentConfig>,
}

impl SwapConfig {
    fn to_spec(&self) -> SwapSpec {
        SwapSpec {
            kept_fee: self.kept_fee,
            max_total_sold: self.max_total_sold,
            fees: self.fees.iter().map(FeeSegmentConfig::to_spec).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
    pub max_leverage: u64,
    pub open_fee: u64,
}

impl TradingConfig {
    fn to_spec(&self) -> TradingSpec {
        TradingSpec {
            collateral_ratio: self.collateral_ratio,
            liquidation_threshold: self.liquidation_threshold,
            max_leverage: self.max_leverage,
            open_fee: self.open_fee,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub lend: bool,
    #[serde(default)]
    pub swap: bool,
    #[serde(default)]
    pub trade: bool,
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
}

impl StrategyConfig {
    fn to_spec(&self) -> StrategySpec {
        StrategySpec {
            lend: self.lend,
            swap: self.swap,
            trade: self.trade,
            collateral_ratio: self.collateral_ratio,
            liquidation_threshold: self.liquidation_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSegmentConfig {
    pub target: FeeTargetConfig,
    pub bound: u64,
    pub a: u64,
    pub b: u64,
    pub c: u64,
}

impl FeeSegmentConfig {
    fn to_spec(&self) -> FeeCurveSegment {
        FeeCurveSegment {
            target: match self.target {
                FeeTargetConfig::Lend => FeeCurveTarget::Lend,
                FeeTargetConfig::SwapBuy => FeeCurveTarget::SwapBuy,
                FeeTargetConfig::SwapSell => FeeCurveTarget::SwapSell,
            },
            bound: self.bound,
            a: self.a,
            b: self.b,
            c: self.c,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTargetConfig {
    Lend,
    SwapBuy,
    SwapSell,
}

/// Resolved handles written after a successful deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployOutput {
    pub state: Pubkey,
    pub registry: Pubkey,
    /// Pools registered after this run; feed back as `existing.pool_count`
    pub pool_count: u8,
    pub pools: Vec<PoolOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolOutput {
    pub index: u8,
    pub base_token: Pubkey,
    pub quote_token: Pubkey,
    pub base_reserve: Pubkey,
    pub quote_reserve: Pubkey,
    pub base_oracle: Option<Pubkey>,
    pub quote_oracle: Option<Pubkey>,
}

impl DeployOutput {
    pub fn from_handle(handle: &EnvironmentHandle) -> Self {
        Self {
            state: handle.state,
            registry: handle.registry,
            pool_count: handle.next_pool_index(),
            pools: handle
                .pools
                .iter()
                .map(|pool| PoolOutput {
                    index: pool.index,
                    base_token: pool.base_token,
                    quote_token: pool.quote_token,
                    base_reserve: pool.base_reserve,
                    quote_reserve: pool.quote_reserve,
                    base_oracle: pool.base_oracle,
                    quote_oracle: pool.quote_oracle,
                })
                .collect(),
        }
    }
}

fn default_token_decimals() -> u8 {
    6
}

fn default_true() -> bool {
    true
}

fn default_max_update_interval() -> u32 {
    10
}

fn default_confidence() -> u32 {
    1
}
