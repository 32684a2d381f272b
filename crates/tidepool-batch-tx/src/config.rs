use backoff::ExponentialBackoff;
use std::time::Duration;

/// Configuration for envelope packing and broadcast.
#[derive(Debug, Clone)]
pub struct TxBatchConfig {
    /// Backoff schedule for retrying transient broadcast failures. The
    /// schedule's `max_elapsed_time` bounds the whole retry loop; a genuine
    /// program rejection is never retried at all.
    pub retry_backoff: ExponentialBackoff,

    /// Instruction-count ceiling per envelope.
    pub max_instructions_per_tx: usize,

    /// Serialized-transaction ceiling in bytes, conservatively below the
    /// 1232-byte wire limit.
    pub max_transaction_size_bytes: usize,

    /// Compute-unit ceiling per envelope.
    pub compute_unit_ceiling: u32,

    /// Rough per-instruction compute estimate used against the ceiling.
    pub compute_units_per_instruction: u32,

    /// Interval between confirmation polls for a sent envelope.
    pub confirmation_poll_interval: Duration,

    /// How long a sent envelope may stay unconfirmed before the attempt is
    /// treated as a transient failure and re-broadcast.
    pub confirmation_timeout: Duration,
}

impl Default for TxBatchConfig {
    fn default() -> Self {
        Self {
            retry_backoff: ExponentialBackoff {
                initial_interval: Duration::from_millis(500),
                max_interval: Duration::from_secs(30),
                max_elapsed_time: Some(Duration::from_secs(300)),
                multiplier: 2.0,
                ..Default::default()
            },
            max_instructions_per_tx: 10,
            max_transaction_size_bytes: 1200,
            compute_unit_ceiling: 1_400_000,
            compute_units_per_instruction: 100_000,
            confirmation_poll_interval: Duration::from_millis(400),
            confirmation_timeout: Duration::from_secs(30),
        }
    }
}
