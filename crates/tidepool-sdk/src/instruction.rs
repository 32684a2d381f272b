use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use crate::{SdkError, SdkResult};

/// Anchor-style entry-point discriminator: first 8 bytes of
/// `sha256("global:<entry_point>")`.
pub fn discriminator(entry_point: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(b"global:");
    hasher.update(entry_point.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Encodes `discriminator || borsh(args)` for one entry point.
pub(crate) fn instruction_data<T: BorshSerialize>(
    entry_point: &str,
    args: &T,
) -> SdkResult<Vec<u8>> {
    let mut data = discriminator(entry_point).to_vec();
    let encoded = borsh::to_vec(args).map_err(|e| SdkError::Serialization(e.to_string()))?;
    data.extend_from_slice(&encoded);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminators_are_stable_and_distinct() {
        assert_eq!(discriminator("create_state"), discriminator("create_state"));
        assert_ne!(discriminator("create_state"), discriminator("init_pool"));
    }

    #[test]
    fn data_starts_with_discriminator() {
        let data = instruction_data("enable_lending", &(3u8, 800_000u32)).unwrap();
        assert_eq!(&data[..8], &discriminator("enable_lending"));
        assert_eq!(data.len(), 8 + 1 + 4);
    }
}
