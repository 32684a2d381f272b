//! One builder per tidepool program entry point.
//!
//! Builders are pure: they check structural preconditions only (the required
//! account references are enforced by the parameter types) and never validate
//! business values; the program is the sole authority on those, and a
//! violation surfaces as a program-level rejection at broadcast time.
//!
//! Admin entry points are composed by `tidepool-deploy`; user-facing entry
//! points (`create_statement` through `double_swap`) are provided for callers
//! that drive the deployed environment afterwards.

use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
};

use crate::{
    instruction::instruction_data, AddressFinder, FeeCurveSegment, SdkError, SdkResult,
};

/// The admin account triple shared by every administrative entry point.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccounts {
    pub state: Pubkey,
    pub registry: Pubkey,
    pub admin: Pubkey,
}

/// Token accounts of one pool at creation time.
#[derive(Debug, Clone, Copy)]
pub struct PoolTokenAccounts {
    pub base: Pubkey,
    pub quote: Pubkey,
    pub reserve_base: Pubkey,
    pub reserve_quote: Pubkey,
}

/// Accounts of a user operation touching both sides of a pool.
#[derive(Debug, Clone, Copy)]
pub struct UserPoolAccounts {
    pub state: Pubkey,
    pub registry: Pubkey,
    pub statement: Pubkey,
    pub signer: Pubkey,
    pub account_base: Pubkey,
    pub account_quote: Pubkey,
    pub reserve_base: Pubkey,
    pub reserve_quote: Pubkey,
}

fn admin_metas(accounts: &AdminAccounts) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(accounts.state, false),
        AccountMeta::new(accounts.registry, false),
        AccountMeta::new(accounts.admin, true),
    ]
}

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

/// System instruction allocating the pool-registry account. The registry is a
/// freshly generated keypair, so it must co-sign the enclosing envelope.
pub fn build_create_registry_account_ix(
    admin: &Pubkey,
    registry: &Pubkey,
    space: usize,
    program_id: &Pubkey,
) -> Instruction {
    let lamports = Rent::default().minimum_balance(space);
    system_instruction::create_account(admin, registry, lamports, space as u64, program_id)
}

pub fn build_create_state_ix(
    finder: &AddressFinder,
    admin: Pubkey,
    registry: Pubkey,
) -> SdkResult<Instruction> {
    let (state, _) = finder.find_state_address();

    let accounts = vec![
        AccountMeta::new(admin, true),
        AccountMeta::new(state, false),
        AccountMeta::new(registry, false),
        AccountMeta::new_readonly(finder.rent_id, false),
        AccountMeta::new_readonly(finder.system_program_id, false),
    ];

    Ok(Instruction {
        program_id: finder.program_id,
        accounts,
        data: instruction_data("create_state", &())?,
    })
}

// ---------------------------------------------------------------------------
// Pool provisioning
// ---------------------------------------------------------------------------

/// Registers a new pool and initializes its two reserve token accounts.
/// Both reserves are fresh keypairs and must co-sign.
pub fn build_init_pool_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    tokens: &PoolTokenAccounts,
) -> SdkResult<Instruction> {
    let mut metas = admin_metas(accounts);
    metas.extend([
        AccountMeta::new(tokens.reserve_base, true),
        AccountMeta::new(tokens.reserve_quote, true),
        AccountMeta::new_readonly(tokens.base, false),
        AccountMeta::new_readonly(tokens.quote, false),
        AccountMeta::new_readonly(finder.token_program_id, false),
        AccountMeta::new_readonly(finder.system_program_id, false),
    ]);

    Ok(Instruction {
        program_id: finder.program_id,
        accounts: metas,
        data: instruction_data("init_pool", &())?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct EnableOracleArgs {
    pub index: u8,
    pub decimals: u8,
    pub base: bool,
    pub skip_init: bool,
    pub max_update_interval: u32,
}

pub fn build_enable_oracle_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    price_feed: Pubkey,
    args: EnableOracleArgs,
) -> SdkResult<Instruction> {
    let mut metas = admin_metas(accounts);
    metas.push(AccountMeta::new_readonly(price_feed, false));

    Ok(Instruction {
        program_id: finder.program_id,
        accounts: metas,
        data: instruction_data("enable_oracle", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct ForceOverrideOracleArgs {
    pub index: u8,
    pub base: bool,
    pub price: u32,
    pub conf: u32,
    pub exp: i8,
    /// Override timestamp; `None` means the ledger clock.
    pub time: Option<u32>,
}

pub fn build_force_override_oracle_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    args: ForceOverrideOracleArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: admin_metas(accounts),
        data: instruction_data("force_override_oracle", &args)?,
    })
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct EnableLendingArgs {
    pub index: u8,
    pub max_utilization: u32,
    pub max_borrow: u64,
    pub initial_fee_time: u32,
}

pub fn build_enable_lending_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    args: EnableLendingArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: admin_metas(accounts),
        data: instruction_data("enable_lending", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct EnableSwappingArgs {
    pub index: u8,
    pub kept_fee: u32,
    pub max_total_sold: u64,
}

pub fn build_enable_swapping_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    args: EnableSwappingArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: admin_metas(accounts),
        data: instruction_data("enable_swapping", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct EnableTradingArgs {
    pub index: u8,
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
    pub max_leverage: u64,
    pub open_fee: u64,
}

pub fn build_enable_trading_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    args: EnableTradingArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: admin_metas(accounts),
        data: instruction_data("enable_trading", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct ModifyFeeCurveArgs {
    pub index: u8,
    pub service: u8,
    pub base: bool,
    pub bound: u64,
    pub a: u64,
    pub b: u64,
    pub c: u64,
}

impl ModifyFeeCurveArgs {
    /// Wire arguments for one [`FeeCurveSegment`] of pool `index`.
    pub fn for_segment(index: u8, segment: &FeeCurveSegment) -> Self {
        let (service, base) = segment.target.wire();
        Self {
            index,
            service,
            base,
            bound: segment.bound,
            a: segment.a,
            b: segment.b,
            c: segment.c,
        }
    }
}

pub fn build_modify_fee_curve_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    args: ModifyFeeCurveArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: admin_metas(accounts),
        data: instruction_data("modify_fee_curve", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct AddStrategyArgs {
    pub index: u8,
    pub lend: bool,
    pub swap: bool,
    pub trade: bool,
    pub collateral_ratio: u64,
    pub liquidation_threshold: u64,
}

pub fn build_add_strategy_ix(
    finder: &AddressFinder,
    accounts: &AdminAccounts,
    args: AddStrategyArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: admin_metas(accounts),
        data: instruction_data("add_strategy", &args)?,
    })
}

// ---------------------------------------------------------------------------
// Fresh mints
// ---------------------------------------------------------------------------

/// Allocates and initializes a fresh SPL mint. The mint keypair must co-sign.
pub fn build_create_mint_ixs(
    payer: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    decimals: u8,
) -> SdkResult<Vec<Instruction>> {
    let space = spl_token::state::Mint::LEN;
    let lamports = Rent::default().minimum_balance(space);

    let allocate = system_instruction::create_account(
        payer,
        mint,
        lamports,
        space as u64,
        &spl_token::ID,
    );
    let initialize =
        spl_token::instruction::initialize_mint(&spl_token::ID, mint, mint_authority, None, decimals)
            .map_err(|e| SdkError::Serialization(e.to_string()))?;

    Ok(vec![allocate, initialize])
}

// ---------------------------------------------------------------------------
// User-facing entry points
// ---------------------------------------------------------------------------

pub fn build_create_statement_ix(finder: &AddressFinder, payer: Pubkey) -> SdkResult<Instruction> {
    let (statement, _) = finder.find_statement_address(&payer);

    let accounts = vec![
        AccountMeta::new(statement, false),
        AccountMeta::new(payer, true),
        AccountMeta::new_readonly(finder.rent_id, false),
        AccountMeta::new_readonly(finder.system_program_id, false),
    ];

    Ok(Instruction {
        program_id: finder.program_id,
        accounts,
        data: instruction_data("create_statement", &())?,
    })
}

fn user_pool_metas(finder: &AddressFinder, accounts: &UserPoolAccounts) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(accounts.state, false),
        AccountMeta::new(accounts.registry, false),
        AccountMeta::new(accounts.statement, false),
        AccountMeta::new(accounts.signer, true),
        AccountMeta::new(accounts.account_base, false),
        AccountMeta::new(accounts.account_quote, false),
        AccountMeta::new(accounts.reserve_base, false),
        AccountMeta::new(accounts.reserve_quote, false),
        AccountMeta::new_readonly(finder.token_program_id, false),
    ]
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct DepositArgs {
    pub pool: u8,
    pub strategy: u8,
    pub quantity: u64,
    pub base: bool,
}

pub fn build_deposit_ix(
    finder: &AddressFinder,
    accounts: &UserPoolAccounts,
    args: DepositArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_pool_metas(finder, accounts),
        data: instruction_data("deposit", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct WithdrawArgs {
    pub pool: u8,
    pub strategy: u8,
    pub quantity: u64,
    pub base: bool,
}

pub fn build_withdraw_ix(
    finder: &AddressFinder,
    accounts: &UserPoolAccounts,
    args: WithdrawArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_pool_metas(finder, accounts),
        data: instruction_data("withdraw", &args)?,
    })
}

/// Accounts of a single-sided user operation (borrow/repay).
#[derive(Debug, Clone, Copy)]
pub struct UserBaseAccounts {
    pub state: Pubkey,
    pub registry: Pubkey,
    pub statement: Pubkey,
    pub signer: Pubkey,
    pub account_base: Pubkey,
    pub reserve_base: Pubkey,
}

fn user_base_metas(finder: &AddressFinder, accounts: &UserBaseAccounts) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(accounts.state, false),
        AccountMeta::new(accounts.registry, false),
        AccountMeta::new(accounts.statement, false),
        AccountMeta::new(accounts.signer, true),
        AccountMeta::new(accounts.account_base, false),
        AccountMeta::new(accounts.reserve_base, false),
        AccountMeta::new_readonly(finder.token_program_id, false),
    ]
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct BorrowArgs {
    pub pool: u8,
    pub amount: u64,
}

pub fn build_borrow_ix(
    finder: &AddressFinder,
    accounts: &UserBaseAccounts,
    args: BorrowArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_base_metas(finder, accounts),
        data: instruction_data("borrow", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct RepayArgs {
    pub pool: u8,
    pub amount: u64,
}

pub fn build_repay_ix(
    finder: &AddressFinder,
    accounts: &UserBaseAccounts,
    args: RepayArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_base_metas(finder, accounts),
        data: instruction_data("repay", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct OpenPositionArgs {
    pub pool: u8,
    pub amount: u64,
    pub long: bool,
}

pub fn build_open_position_ix(
    finder: &AddressFinder,
    accounts: &UserPoolAccounts,
    args: OpenPositionArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_pool_metas(finder, accounts),
        data: instruction_data("open_position", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct ClosePositionArgs {
    pub pool: u8,
    pub long: bool,
}

pub fn build_close_position_ix(
    finder: &AddressFinder,
    accounts: &UserPoolAccounts,
    args: ClosePositionArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_pool_metas(finder, accounts),
        data: instruction_data("close_position", &args)?,
    })
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct SingleSwapArgs {
    pub pool: u8,
    pub amount: u64,
    pub min_expected: u64,
    pub from_base: bool,
    pub by_amount_out: bool,
}

pub fn build_single_swap_ix(
    finder: &AddressFinder,
    accounts: &UserPoolAccounts,
    args: SingleSwapArgs,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: finder.program_id,
        accounts: user_pool_metas(finder, accounts),
        data: instruction_data("single_swap", &args)?,
    })
}

/// Accounts of a two-pool swap routed through a shared quote token.
#[derive(Debug, Clone, Copy)]
pub struct DoubleSwapAccounts {
    pub state: Pubkey,
    pub registry: Pubkey,
    pub signer: Pubkey,
    pub account_in: Pubkey,
    pub account_out: Pubkey,
    pub reserve_in: Pubkey,
    pub reserve_out: Pubkey,
}

#[derive(BorshSerialize, Debug, Clone, Copy)]
pub struct DoubleSwapArgs {
    pub pool_in: u8,
    pub pool_out: u8,
    pub amount: u64,
    pub min_expected: u64,
    pub by_amount_out: bool,
}

pub fn build_double_swap_ix(
    finder: &AddressFinder,
    accounts: &DoubleSwapAccounts,
    args: DoubleSwapArgs,
) -> SdkResult<Instruction> {
    let metas = vec![
        AccountMeta::new(accounts.state, false),
        AccountMeta::new(accounts.registry, false),
        AccountMeta::new(accounts.signer, true),
        AccountMeta::new(accounts.account_in, false),
        AccountMeta::new(accounts.account_out, false),
        AccountMeta::new(accounts.reserve_in, false),
        AccountMeta::new(accounts.reserve_out, false),
        AccountMeta::new_readonly(finder.token_program_id, false),
    ];

    Ok(Instruction {
        program_id: finder.program_id,
        accounts: metas,
        data: instruction_data("double_swap", &args)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeeCurveTarget;

    fn admin_accounts() -> AdminAccounts {
        AdminAccounts {
            state: Pubkey::new_unique(),
            registry: Pubkey::new_unique(),
            admin: Pubkey::new_unique(),
        }
    }

    #[test]
    fn create_state_marks_admin_as_signer() {
        let finder = AddressFinder::default();
        let ix = build_create_state_ix(&finder, Pubkey::new_unique(), Pubkey::new_unique()).unwrap();
        assert_eq!(ix.program_id, crate::ID);
        assert!(ix.accounts[0].is_signer);
        assert!(!ix.accounts[1].is_signer);
    }

    #[test]
    fn init_pool_requires_reserve_signatures() {
        let finder = AddressFinder::default();
        let tokens = PoolTokenAccounts {
            base: Pubkey::new_unique(),
            quote: Pubkey::new_unique(),
            reserve_base: Pubkey::new_unique(),
            reserve_quote: Pubkey::new_unique(),
        };
        let ix = build_init_pool_ix(&finder, &admin_accounts(), &tokens).unwrap();
        let signer_count = ix.accounts.iter().filter(|m| m.is_signer).count();
        // admin plus the two fresh reserves
        assert_eq!(signer_count, 3);
    }

    #[test]
    fn fee_curve_segment_maps_to_wire_args() {
        let segment = FeeCurveSegment {
            target: FeeCurveTarget::SwapSell,
            bound: 2_000_000,
            a: 0,
            b: 0,
            c: 100,
        };
        let args = ModifyFeeCurveArgs::for_segment(4, &segment);
        assert_eq!(args.index, 4);
        assert_eq!(args.service, 2);
        assert!(!args.base);
        assert_eq!(args.bound, 2_000_000);
    }

    #[test]
    fn create_mint_allocates_then_initializes() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ixs = build_create_mint_ixs(&payer, &mint, &payer, 6).unwrap();
        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, solana_sdk::system_program::ID);
        assert_eq!(ixs[1].program_id, spl_token::ID);
    }

    #[test]
    fn statement_is_derived_from_payer() {
        let finder = AddressFinder::default();
        let payer = Pubkey::new_unique();
        let ix = build_create_statement_ix(&finder, payer).unwrap();
        let (expected, _) = finder.find_statement_address(&payer);
        assert_eq!(ix.accounts[0].pubkey, expected);
    }
}
