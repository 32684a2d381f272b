//! Declarative description of a target tidepool deployment.
//!
//! A [`RootSpec`] plus a list of [`PoolSpec`]s is the complete input to
//! environment composition. Specs are caller-owned, read-only, and live for
//! one provisioning run; they carry no network state of their own.

use solana_sdk::pubkey::Pubkey;

/// Root parameters of a deployment.
#[derive(Debug, Clone)]
pub struct RootSpec {
    /// Administrator authority: fee-payer and required signer of every
    /// admin instruction in the run.
    pub admin: Pubkey,
    /// Program to deploy against.
    pub program_id: Pubkey,
    /// Pre-existing root accounts for idempotent re-entry. When set,
    /// composition skips `create_state` and appends pools starting at
    /// `pool_count`.
    pub existing: Option<ExistingRoot>,
}

impl RootSpec {
    pub fn new(admin: Pubkey) -> Self {
        Self {
            admin,
            program_id: crate::ID,
            existing: None,
        }
    }

    pub fn with_existing(mut self, existing: ExistingRoot) -> Self {
        self.existing = Some(existing);
        self
    }
}

/// Handles of an already-provisioned root, as returned by a previous run.
#[derive(Debug, Clone, Copy)]
pub struct ExistingRoot {
    pub state: Pubkey,
    pub registry: Pubkey,
    /// Pools already registered; the next pool gets this index.
    pub pool_count: u8,
}

/// One paired-asset pool and the services enabled on it.
#[derive(Debug, Clone, Default)]
pub struct PoolSpec {
    /// Existing base mint, or `None` to mint a fresh one at compose time.
    pub base_token: Option<Pubkey>,
    /// Existing quote mint, or `None` to mint a fresh one. Pools may share a
    /// quote token by passing the same pubkey.
    pub quote_token: Option<Pubkey>,
    /// Decimals used when minting fresh tokens.
    pub token_decimals: u8,
    pub base_oracle: Option<PriceSourceSpec>,
    pub quote_oracle: Option<PriceSourceSpec>,
    pub lending: Option<LendingSpec>,
    pub swapping: Option<SwapSpec>,
    pub trading: Option<TradingSpec>,
    /// Strategies in input order; order is preserved on-chain.
    pub strategies: Vec<StrategySpec>,
}

/// One side's price feed configuration.
#[derive(Debug, Clone)]
pub struct PriceSourceSpec {
    /// Feed account, or `None` to record a freshly generated identity.
    pub feed: Option<Pubkey>,
    pub decimals: u8,
    /// Skip reading the feed at enable time; the price is then seeded with
    /// [`PriceSourceSpec::override_price`] if present.
    pub skip_init: bool,
    /// Maximum accepted feed staleness, in seconds.
    pub max_update_interval: u32,
    pub override_price: Option<PriceOverride>,
}

/// Administrative price override, applied right after the oracle is enabled.
#[derive(Debug, Clone, Copy)]
pub struct PriceOverride {
    pub price: u32,
    pub confidence: u32,
    pub exponent: i8,
}

/// Lending service parameters.
#[derive(Debug, Clone)]
pub struct LendingSpec {
    /// Utilization ceiling, fraction denominated in 1e6.
    pub max_utilization: u32,
    /// Borrow ceiling in quote units.
    pub max_borrow: u64,
    /// Grace period before fees accrue, in seconds.
    pub initial_fee_time: u32,
    /// Fee-curve segments, ascending bound order (caller invariant).
    pub fees: Vec<FeeCurveSegment>,
}

/// Swapping service parameters.
#[derive(Debug, Clone)]
pub struct SwapSpec {
    /// Share of fees kept by the pool, fraction denominated in 1e6.
    pub kept_fee: u32,
    /// Ceiling on total notional sold.
    pub max_total_sold: u64,
    /// Fee-curve segments for both directions, ascending bound order per
    /// direction (caller invariant).
    pub fees: Vec<FeeCurveSegment>,
}

/// Leveraged trading service parameters.
#[derive(Debug, Clone)]
pub struct TradingSpec {
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
    pub max_leverage: u64,
    pub open_fee: u64,
}

/// A user-selectable opt-in combination of services with its own risk
/// parameters.
#[derive(Debug, Clone)]
pub struct StrategySpec {
    pub lend: bool,
    pub swap: bool,
    pub trade: bool,
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
}

/// Which fee curve a segment refines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeCurveTarget {
    Lend,
    SwapBuy,
    SwapSell,
}

impl FeeCurveTarget {
    /// Wire encoding: (service id, direction flag).
    pub fn wire(self) -> (u8, bool) {
        match self {
            FeeCurveTarget::Lend => (1, true),
            FeeCurveTarget::SwapBuy => (2, true),
            FeeCurveTarget::SwapSell => (2, false),
        }
    }
}

/// One piecewise-polynomial fee schedule piece, valid up to `bound`.
///
/// Segments of one target must be supplied in ascending bound order; this
/// layer forwards them as-is and the program rejects violations.
#[derive(Debug, Clone, Copy)]
pub struct FeeCurveSegment {
    pub target: FeeCurveTarget,
    pub bound: u64,
    pub a: u64,
    pub b: u64,
    pub c: u64,
}
