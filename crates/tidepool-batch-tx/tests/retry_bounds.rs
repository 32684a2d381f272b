//! The retry loop must have an escape hatch: an envelope that never confirms
//! exhausts its backoff budget instead of livelocking.

use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction};
use std::time::Duration;
use tidepool_batch_tx::{
    testing::MockNetwork, Envelope, TxBatchConfig, TxBatchError, TxPipeline,
};

fn tight_config() -> TxBatchConfig {
    TxBatchConfig {
        retry_backoff: backoff::ExponentialBackoff {
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(2),
            max_elapsed_time: Some(Duration::from_millis(40)),
            ..Default::default()
        },
        confirmation_poll_interval: Duration::from_millis(1),
        confirmation_timeout: Duration::from_millis(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn never_confirming_envelope_exhausts_retries() {
    let network = MockNetwork::new();
    // Far more polls than the confirmation timeout allows per attempt.
    network.set_confirm_lag(1_000_000);

    let pipeline = TxPipeline::with_config(network, tight_config());
    let payer = Keypair::new();
    let envelope = Envelope::new(
        vec![system_instruction::transfer(
            &payer.pubkey(),
            &Pubkey::new_unique(),
            1,
        )],
        payer.pubkey(),
    );

    let result = pipeline.submit_and_confirm(&envelope, &[&payer]).await;
    assert!(matches!(
        result,
        Err(TxBatchError::RetriesExhausted { .. })
    ));
    // Every attempt re-broadcast the envelope; none were silently dropped.
    assert!(pipeline.network().sent_count() >= 1);
}

#[tokio::test]
async fn each_retry_attempt_uses_a_fresh_blockhash() {
    let network = MockNetwork::new();
    network.fail_next_sends(vec![
        tidepool_batch_tx::NetworkError::Transport("timeout".into()),
    ]);

    let pipeline = TxPipeline::with_config(network, tight_config());
    let payer = Keypair::new();
    let envelope = Envelope::new(
        vec![system_instruction::transfer(
            &payer.pubkey(),
            &Pubkey::new_unique(),
            1,
        )],
        payer.pubkey(),
    );

    pipeline
        .submit_and_confirm(&envelope, &[&payer])
        .await
        .unwrap();

    let sent = pipeline.network().sent_transactions();
    assert_eq!(sent.len(), 1);
    // The mock hands out a new blockhash per request; the successful attempt
    // was the second request, so the confirmed transaction does not carry the
    // first blockhash.
    let first = {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&1u64.to_le_bytes());
        solana_sdk::hash::Hash::new_from_array(bytes)
    };
    assert_ne!(sent[0].message.recent_blockhash, first);
}
