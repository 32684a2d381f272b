/*!
# Tidepool Client

Read-only access to deployed tidepool state: zero-copy views over the raw
root-state and pool-registry account bytes, and a thin read-back client that
fetches them through the [`tidepool_batch_tx::Network`] capability.

Nothing here drives control flow of a deployment: the pipeline composes from
its spec alone and uses this crate (in tests and in the `status` command) only
to confirm post-conditions.
*/

mod client;
mod decode;
mod errors;

pub use client::TidepoolClient;
pub use decode::{
    OracleState, PoolEntry, PoolKeys, PoolRegistry, PoolRegistryAccount, PriceInfo, RootState,
    RootStateAccount, StrategyEntry, StrategyInfo, MAX_POOLS, MAX_STRATEGIES, SERVICE_LENDING,
    SERVICE_SWAPPING, SERVICE_TRADING,
};
pub use errors::{ClientError, ClientResult};
