use solana_sdk::pubkey::Pubkey;

/// Seed of the singleton root-state PDA.
pub const STATE_SEED: &[u8] = b"state";
/// Seed prefix of per-user statement PDAs.
pub const STATEMENT_SEED: &[u8] = b"statement";

/// Derives every deterministic address of a tidepool deployment.
///
/// Root state and user statements are PDAs over fixed string seeds; the pool
/// registry, token reserves, and price feeds are freshly generated identities
/// recorded at creation time and are therefore not derivable here.
pub struct AddressFinder {
    pub program_id: Pubkey,

    pub rent_id: Pubkey,
    pub system_program_id: Pubkey,
    pub token_program_id: Pubkey,
}

impl AddressFinder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            rent_id: solana_sdk::sysvar::rent::ID,
            system_program_id: solana_sdk::system_program::ID,
            token_program_id: spl_token::ID,
        }
    }

    pub fn find_state_address(&self) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[STATE_SEED], &self.program_id)
    }

    pub fn find_statement_address(&self, owner: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[STATEMENT_SEED, owner.as_ref()], &self.program_id)
    }
}

impl Default for AddressFinder {
    fn default() -> Self {
        Self::new(crate::ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_address_is_deterministic() {
        let finder = AddressFinder::default();
        assert_eq!(finder.find_state_address(), finder.find_state_address());
    }

    #[test]
    fn statement_addresses_differ_per_owner() {
        let finder = AddressFinder::default();
        let (a, _) = finder.find_statement_address(&Pubkey::new_unique());
        let (b, _) = finder.find_statement_address(&Pubkey::new_unique());
        assert_ne!(a, b);
    }
}
