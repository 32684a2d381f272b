//! Read-back client: fetch + decode, nothing else.

use solana_sdk::pubkey::Pubkey;
use tidepool_batch_tx::Network;
use tidepool_sdk::AddressFinder;

use crate::{ClientError, ClientResult, PoolRegistryAccount, RootStateAccount};

/// Fetches and decodes deployed tidepool state over an injected [`Network`].
pub struct TidepoolClient<N: Network> {
    address_finder: AddressFinder,
    network: N,
}

impl<N: Network> TidepoolClient<N> {
    pub fn new(network: N) -> Self {
        Self::with_address_finder(network, AddressFinder::default())
    }

    pub fn with_address_finder(network: N, address_finder: AddressFinder) -> Self {
        Self {
            address_finder,
            network,
        }
    }

    pub fn address_finder(&self) -> &AddressFinder {
        &self.address_finder
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// The root state, or `None` when the environment has not been created.
    pub async fn get_root_state(&self) -> ClientResult<Option<RootStateAccount>> {
        let (state_address, _) = self.address_finder.find_state_address();
        match self.network.account_data(&state_address).await? {
            Some(data) => Ok(Some(RootStateAccount::load(&data)?)),
            None => Ok(None),
        }
    }

    /// The pool registry at an explicit address.
    pub async fn get_registry(&self, registry: &Pubkey) -> ClientResult<Option<PoolRegistryAccount>> {
        match self.network.account_data(registry).await? {
            Some(data) => Ok(Some(PoolRegistryAccount::load(&data)?)),
            None => Ok(None),
        }
    }

    /// Root state plus the registry it references; errors if the root exists
    /// but its registry does not.
    pub async fn get_environment(
        &self,
    ) -> ClientResult<Option<(RootStateAccount, PoolRegistryAccount)>> {
        let Some(state) = self.get_root_state().await? else {
            return Ok(None);
        };
        let registry_address = state.registry();
        let registry = self
            .get_registry(&registry_address)
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(registry_address.to_string()))?;
        Ok(Some((state, registry)))
    }
}
