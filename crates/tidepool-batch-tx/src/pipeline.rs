//! Broadcast and confirmation of envelopes.
//!
//! Each envelope runs the state machine `Unsent → Sent → Confirmed | Failed`.
//! A transient failure (timeout, unreachable node, expired blockhash) returns
//! the envelope to `Unsent` and re-broadcasts it under a bounded exponential
//! backoff with a fresh blockhash; a program-level rejection is fatal
//! immediately. Envelopes of a run are driven strictly one at a time.

use backoff::backoff::Backoff;
use solana_sdk::{
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{Envelope, Network, NetworkError, TxBatchConfig, TxBatchError};

/// Lifecycle of one envelope inside a broadcast attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Unsent,
    Sent,
    Confirmed,
}

/// Drives envelopes to durability over an injected [`Network`].
pub struct TxPipeline<N: Network> {
    network: N,
    config: TxBatchConfig,
}

impl<N: Network> TxPipeline<N> {
    pub fn new(network: N) -> Self {
        Self::with_config(network, TxBatchConfig::default())
    }

    pub fn with_config(network: N, config: TxBatchConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn config(&self) -> &TxBatchConfig {
        &self.config
    }

    /// Broadcasts `envelope` and blocks the calling flow until it is durable
    /// at the network's commitment, retrying transient failures with a fresh
    /// blockhash each attempt.
    pub async fn submit_and_confirm(
        &self,
        envelope: &Envelope,
        signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError> {
        if envelope.instructions.is_empty() {
            return Err(TxBatchError::NoInstructions);
        }

        let started = Instant::now();
        let mut backoff = self.config.retry_backoff.clone();
        backoff.reset();

        loop {
            match self.attempt(envelope, signers).await {
                Ok(signature) => return Ok(signature),
                Err(TxBatchError::Network(err)) if err.is_transient() => {
                    match backoff.next_backoff() {
                        Some(delay) => {
                            warn!(error = %err, retry_in_ms = delay.as_millis() as u64,
                                  "transient broadcast failure; envelope back to unsent");
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            return Err(TxBatchError::RetriesExhausted {
                                elapsed_secs: started.elapsed().as_secs(),
                                last_error: err.to_string(),
                            });
                        }
                    }
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// One `Unsent → Sent → Confirmed` pass.
    async fn attempt(
        &self,
        envelope: &Envelope,
        signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError> {
        let mut state = EnvelopeState::Unsent;

        let recent_blockhash = self.network.latest_blockhash().await?;
        let transaction = self.sign_envelope(envelope, signers, recent_blockhash)?;
        debug!(?state, instructions = envelope.instructions.len(), "broadcasting envelope");

        let signature = match self.network.send_transaction(&transaction).await {
            Ok(signature) => {
                state = EnvelopeState::Sent;
                signature
            }
            Err(NetworkError::Rejected(reason)) => {
                return Err(TxBatchError::Rejected(reason));
            }
            Err(transport) => return Err(transport.into()),
        };
        debug!(%signature, "envelope sent");

        let deadline = Instant::now() + self.config.confirmation_timeout;
        while state == EnvelopeState::Sent {
            if self.network.confirm_signature(&signature).await? {
                state = EnvelopeState::Confirmed;
                break;
            }
            if Instant::now() >= deadline {
                return Err(TxBatchError::Network(NetworkError::Transport(format!(
                    "confirmation of {signature} timed out"
                ))));
            }
            tokio::time::sleep(self.config.confirmation_poll_interval).await;
        }

        Ok(signature)
    }

    /// Signs the envelope with exactly the signers its message requires,
    /// preserving the message's signer order.
    fn sign_envelope(
        &self,
        envelope: &Envelope,
        signers: &[&Keypair],
        recent_blockhash: solana_sdk::hash::Hash,
    ) -> Result<Transaction, TxBatchError> {
        let message = solana_sdk::message::Message::new_with_blockhash(
            &envelope.instructions,
            Some(&envelope.fee_payer),
            &recent_blockhash,
        );

        let required = message.header.num_required_signatures as usize;
        let mut selected: Vec<&Keypair> = Vec::with_capacity(required);
        for key in &message.account_keys[..required] {
            let signer = signers
                .iter()
                .find(|candidate| candidate.pubkey() == *key)
                .ok_or(TxBatchError::MissingSigner(*key))?;
            selected.push(signer);
        }

        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_sign(&selected, recent_blockhash)
            .map_err(|e| TxBatchError::Signing(e.to_string()))?;
        Ok(transaction)
    }

    /// Submits envelopes strictly sequentially, advancing only after the
    /// previous one is durable. Progress is logged with the run label and
    /// envelope index so a restarted run can be correlated by eye.
    pub async fn submit_all(
        &self,
        label: &str,
        envelopes: &[Envelope],
        signers: &[&Keypair],
    ) -> Result<Vec<Signature>, TxBatchError> {
        let mut signatures = Vec::with_capacity(envelopes.len());
        for (index, envelope) in envelopes.iter().enumerate() {
            info!(label, index, "queued {label} envelope {index}");
            let signature = self.submit_and_confirm(envelope, signers).await?;
            info!(label, index, %signature, "confirmed {label} envelope {index}");
            signatures.push(signature);
        }
        Ok(signatures)
    }
}
