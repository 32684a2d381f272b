//! Zero-copy images of the tidepool accounts.
//!
//! Account bytes are interpreted in place with `bytemuck`; every multi-byte
//! number is stored as a little-endian byte array so the structs carry no
//! implicit padding and decode on any host. Accessors return owned
//! `solana_sdk` types; nothing here is ever written back.

use bytemuck::{Pod, Zeroable};
use solana_sdk::pubkey::Pubkey;

use crate::{ClientError, ClientResult};

pub const MAX_POOLS: usize = 10;
pub const MAX_STRATEGIES: usize = 6;

/// Service bits of [`PoolEntry::services`].
pub const SERVICE_LENDING: u8 = 1 << 0;
pub const SERVICE_SWAPPING: u8 = 1 << 1;
pub const SERVICE_TRADING: u8 = 1 << 2;

/// Singleton root account: admin authority plus the registry it owns.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RootState {
    pub discriminator: [u8; 8],
    pub bump: u8,
    pub admin: [u8; 32],
    pub registry: [u8; 32],
}

/// One side's oracle snapshot.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct OracleState {
    pub enabled: u8,
    pub decimals: u8,
    pub exponent: u8,
    pub price: [u8; 8],
    pub confidence: [u8; 8],
    pub last_update: [u8; 4],
    pub max_update_interval: [u8; 4],
}

/// One strategy slot.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct StrategyEntry {
    pub lend: u8,
    pub swap: u8,
    pub trade: u8,
    pub collateral_ratio: [u8; 8],
    pub liquidation_threshold: [u8; 8],
}

/// One pool slot: enabled services, oracle snapshots, strategies.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PoolEntry {
    pub services: u8,
    pub strategy_count: u8,
    pub base_oracle: OracleState,
    pub quote_oracle: OracleState,
    pub strategies: [StrategyEntry; MAX_STRATEGIES],
}

/// Identities recorded for one pool at creation time.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PoolKeys {
    pub base_token: [u8; 32],
    pub quote_token: [u8; 32],
    pub base_reserve: [u8; 32],
    pub quote_reserve: [u8; 32],
    pub base_oracle: [u8; 32],
    pub quote_oracle: [u8; 32],
    pub base_oracle_set: u8,
    pub quote_oracle_set: u8,
}

/// The pool registry: a fixed-capacity array with a head counter.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PoolRegistry {
    pub discriminator: [u8; 8],
    pub pool_count: u8,
    pub pools: [PoolEntry; MAX_POOLS],
    pub keys: [PoolKeys; MAX_POOLS],
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

/// Decoded per-strategy view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyInfo {
    pub lend: bool,
    pub swap: bool,
    pub trade: bool,
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
}

/// Decoded oracle price view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceInfo {
    pub price: u64,
    pub confidence: u64,
    pub exponent: i8,
}

/// Typed view over raw root-state bytes.
pub struct RootStateAccount {
    state: RootState,
}

impl RootStateAccount {
    pub const SIZE: usize = std::mem::size_of::<RootState>();

    pub fn load(data: &[u8]) -> ClientResult<Self> {
        let state = bytemuck::try_from_bytes::<RootState>(data)
            .map_err(|e| ClientError::InvalidAccountData(format!("root state: {e}")))?;
        Ok(Self { state: *state })
    }

    pub fn bump(&self) -> u8 {
        self.state.bump
    }

    pub fn admin(&self) -> Pubkey {
        Pubkey::new_from_array(self.state.admin)
    }

    pub fn registry(&self) -> Pubkey {
        Pubkey::new_from_array(self.state.registry)
    }
}

/// Typed view over raw pool-registry bytes.
pub struct PoolRegistryAccount {
    registry: PoolRegistry,
}

impl PoolRegistryAccount {
    pub const SIZE: usize = std::mem::size_of::<PoolRegistry>();

    pub fn load(data: &[u8]) -> ClientResult<Self> {
        let registry = bytemuck::try_from_bytes::<PoolRegistry>(data)
            .map_err(|e| ClientError::InvalidAccountData(format!("pool registry: {e}")))?;
        Ok(Self {
            registry: *registry,
        })
    }

    pub fn pool_count(&self) -> u8 {
        self.registry.pool_count
    }

    fn keys(&self, index: u8) -> ClientResult<&PoolKeys> {
        if index >= self.registry.pool_count {
            return Err(ClientError::PoolIndexOutOfBounds(index));
        }
        Ok(&self.registry.keys[index as usize])
    }

    fn pool(&self, index: u8) -> ClientResult<&PoolEntry> {
        if index >= self.registry.pool_count {
            return Err(ClientError::PoolIndexOutOfBounds(index));
        }
        Ok(&self.registry.pools[index as usize])
    }

    pub fn base_token(&self, index: u8) -> ClientResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.keys(index)?.base_token))
    }

    pub fn quote_token(&self, index: u8) -> ClientResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.keys(index)?.quote_token))
    }

    pub fn base_reserve(&self, index: u8) -> ClientResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.keys(index)?.base_reserve))
    }

    pub fn quote_reserve(&self, index: u8) -> ClientResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.keys(index)?.quote_reserve))
    }

    pub fn base_oracle(&self, index: u8) -> ClientResult<Option<Pubkey>> {
        let keys = self.keys(index)?;
        Ok((keys.base_oracle_set != 0).then(|| Pubkey::new_from_array(keys.base_oracle)))
    }

    pub fn quote_oracle(&self, index: u8) -> ClientResult<Option<Pubkey>> {
        let keys = self.keys(index)?;
        Ok((keys.quote_oracle_set != 0).then(|| Pubkey::new_from_array(keys.quote_oracle)))
    }

    pub fn has_lending(&self, index: u8) -> ClientResult<bool> {
        Ok(self.pool(index)?.services & SERVICE_LENDING != 0)
    }

    pub fn has_swapping(&self, index: u8) -> ClientResult<bool> {
        Ok(self.pool(index)?.services & SERVICE_SWAPPING != 0)
    }

    pub fn has_trading(&self, index: u8) -> ClientResult<bool> {
        Ok(self.pool(index)?.services & SERVICE_TRADING != 0)
    }

    pub fn strategy_count(&self, index: u8) -> ClientResult<u8> {
        Ok(self.pool(index)?.strategy_count)
    }

    pub fn strategy(&self, index: u8, strategy: u8) -> ClientResult<StrategyInfo> {
        let pool = self.pool(index)?;
        if strategy >= pool.strategy_count {
            return Err(ClientError::StrategyIndexOutOfBounds(strategy));
        }
        let entry = &pool.strategies[strategy as usize];
        Ok(StrategyInfo {
            lend: entry.lend != 0,
            swap: entry.swap != 0,
            trade: entry.trade != 0,
            collateral_ratio: u64::from_le_bytes(entry.collateral_ratio),
            liquidation_threshold: u64::from_le_bytes(entry.liquidation_threshold),
        })
    }

    pub fn price(&self, index: u8, base: bool) -> ClientResult<Option<PriceInfo>> {
        let pool = self.pool(index)?;
        let oracle = if base {
            &pool.base_oracle
        } else {
            &pool.quote_oracle
        };
        if oracle.enabled == 0 {
            return Ok(None);
        }
        Ok(Some(PriceInfo {
            price: u64::from_le_bytes(oracle.price),
            confidence: u64::from_le_bytes(oracle.confidence),
            exponent: oracle.exponent as i8,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_one_pool() -> PoolRegistry {
        let mut registry = PoolRegistry::default();
        registry.pool_count = 1;
        registry.keys[0].base_token = Pubkey::new_unique().to_bytes();
        registry.keys[0].quote_token = Pubkey::new_unique().to_bytes();
        registry.keys[0].base_oracle = Pubkey::new_unique().to_bytes();
        registry.keys[0].base_oracle_set = 1;
        registry.pools[0].services = SERVICE_LENDING | SERVICE_SWAPPING;
        registry.pools[0].strategy_count = 1;
        registry.pools[0].strategies[0] = StrategyEntry {
            lend: 1,
            swap: 0,
            trade: 0,
            collateral_ratio: 1_000_000u64.to_le_bytes(),
            liquidation_threshold: 1_000_000u64.to_le_bytes(),
        };
        registry.pools[0].base_oracle = OracleState {
            enabled: 1,
            decimals: 6,
            exponent: (-2i8) as u8,
            price: 200u64.to_le_bytes(),
            confidence: 1u64.to_le_bytes(),
            last_update: 42u32.to_le_bytes(),
            max_update_interval: 1u32.to_le_bytes(),
        };
        registry
    }

    #[test]
    fn registry_image_matches_the_allocated_size() {
        assert_eq!(PoolRegistryAccount::SIZE, tidepool_sdk::POOL_REGISTRY_SIZE);
    }

    #[test]
    fn root_state_round_trips() {
        let admin = Pubkey::new_unique();
        let registry = Pubkey::new_unique();
        let state = RootState {
            discriminator: [7; 8],
            bump: 254,
            admin: admin.to_bytes(),
            registry: registry.to_bytes(),
        };

        let decoded = RootStateAccount::load(bytemuck::bytes_of(&state)).unwrap();
        assert_eq!(decoded.admin(), admin);
        assert_eq!(decoded.registry(), registry);
        assert_eq!(decoded.bump(), 254);
    }

    #[test]
    fn registry_accessors_round_trip() {
        let registry = registry_with_one_pool();
        let decoded = PoolRegistryAccount::load(bytemuck::bytes_of(&registry)).unwrap();

        assert_eq!(decoded.pool_count(), 1);
        assert!(decoded.has_lending(0).unwrap());
        assert!(decoded.has_swapping(0).unwrap());
        assert!(!decoded.has_trading(0).unwrap());
        assert!(decoded.base_oracle(0).unwrap().is_some());
        assert!(decoded.quote_oracle(0).unwrap().is_none());

        let strategy = decoded.strategy(0, 0).unwrap();
        assert!(strategy.lend);
        assert!(!strategy.swap);
        assert_eq!(strategy.collateral_ratio, 1_000_000);

        let price = decoded.price(0, true).unwrap().unwrap();
        assert_eq!(price.price, 200);
        assert_eq!(price.exponent, -2);
        assert!(decoded.price(0, false).unwrap().is_none());
    }

    #[test]
    fn out_of_bounds_indices_are_errors() {
        let registry = registry_with_one_pool();
        let decoded = PoolRegistryAccount::load(bytemuck::bytes_of(&registry)).unwrap();

        assert!(matches!(
            decoded.base_token(1),
            Err(ClientError::PoolIndexOutOfBounds(1))
        ));
        assert!(matches!(
            decoded.strategy(0, 1),
            Err(ClientError::StrategyIndexOutOfBounds(1))
        ));
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let registry = registry_with_one_pool();
        let bytes = bytemuck::bytes_of(&registry);
        assert!(PoolRegistryAccount::load(&bytes[..bytes.len() - 1]).is_err());
    }
}
