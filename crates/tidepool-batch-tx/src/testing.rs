//! Scripted [`Network`] double for tests.
//!
//! Stands in for a validator where the real fixture would need the compiled
//! program: sends are recorded, failures are injected per call, and
//! confirmation can be delayed by a configurable number of polls.

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::{Network, NetworkError, NetworkResult};

#[derive(Default)]
struct MockState {
    blockhash_counter: u64,
    send_failures: VecDeque<NetworkError>,
    confirm_lag: usize,
    sent: Vec<Transaction>,
    polls: HashMap<Signature, usize>,
    accounts: HashMap<Pubkey, Vec<u8>>,
}

/// In-memory [`Network`] with scripted failures and instant (or lagged)
/// confirmation.
#[derive(Default)]
pub struct MockNetwork {
    state: Mutex<MockState>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues errors returned by the next `send_transaction` calls, in order.
    pub fn fail_next_sends(&self, errors: Vec<NetworkError>) {
        self.state.lock().unwrap().send_failures.extend(errors);
    }

    /// Number of confirmation polls a sent transaction stays unconfirmed.
    pub fn set_confirm_lag(&self, polls: usize) {
        self.state.lock().unwrap().confirm_lag = polls;
    }

    /// Seeds raw account bytes served by `account_data`.
    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.state.lock().unwrap().accounts.insert(address, data);
    }

    /// Transactions that were accepted (not failed) by `send_transaction`.
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state.lock().unwrap().sent.len()
    }

    pub fn was_confirmed(&self, signature: &Signature) -> bool {
        let state = self.state.lock().unwrap();
        state
            .polls
            .get(signature)
            .is_some_and(|polls| *polls > state.confirm_lag)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn latest_blockhash(&self) -> NetworkResult<Hash> {
        let mut state = self.state.lock().unwrap();
        state.blockhash_counter += 1;
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&state.blockhash_counter.to_le_bytes());
        Ok(Hash::new_from_array(bytes))
    }

    async fn send_transaction(&self, tx: &Transaction) -> NetworkResult<Signature> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.send_failures.pop_front() {
            return Err(err);
        }
        let signature = tx.signatures[0];
        state.sent.push(tx.clone());
        state.polls.insert(signature, 0);
        Ok(signature)
    }

    async fn confirm_signature(&self, signature: &Signature) -> NetworkResult<bool> {
        let mut state = self.state.lock().unwrap();
        let lag = state.confirm_lag;
        match state.polls.get_mut(signature) {
            Some(polls) => {
                *polls += 1;
                Ok(*polls > lag)
            }
            None => Ok(false),
        }
    }

    async fn account_data(&self, address: &Pubkey) -> NetworkResult<Option<Vec<u8>>> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }
}
