//! # Adaptive AMM: Curvature-Tunable Market Maker
//!
//! A two-token automated market maker on Solana whose trading curve can be
//! reshaped while the pool is live.
//!
//! ## Overview
//!
//! Every pool prices along `x^q + y^q = k^q` (or `x * y = k` at `q = 0`).
//! A keeper adapts `q` to market conditions: more negative values deepen
//! price impact in turbulent markets, positive values flatten the curve
//! toward constant-sum for pegged or calm pairs.
//!
//! ## How it works
//! - Anyone can create and fund a pool, then trade or provide liquidity.
//! - The keeper (e.g. a Chainlink Automation upkeep) calls `update_q`.
//! - Swap fees stay in the pool and accrue to LP shares.
//!

use anchor_lang::prelude::*;

pub mod amm;
pub mod instructions;
pub mod state;

pub use amm::*;
pub use instructions::*;
pub use state::SwapDirection;

// Replace with your deployed program ID
declare_id!("4vTKs3o4PyrEpVm3CVntQRjAn23XrgrGJSFTXUnj68i6");

/// Main Adaptive AMM program
#[program]
pub mod adaptive_amm {
    use super::*;

    /// Initialize the protocol with global configuration
    pub fn initialize(
        ctx: Context<Initialize>,
        default_fee_bps: u16,
        keeper: Pubkey,
        min_liquidity: u64,
    ) -> Result<()> {
        ctx.accounts
            .initialize(default_fee_bps, keeper, min_liquidity, &ctx.bumps)
    }

    /// Create pool state with its initial curvature (Step 1)
    pub fn create_pool_state(ctx: Context<CreatePoolState>, q_ppm: i64) -> Result<()> {
        ctx.accounts.create_pool_state(q_ppm, &ctx.bumps)
    }

    /// Create the LP share mint (Step 2)
    pub fn create_pool_mint(ctx: Context<CreatePoolMint>) -> Result<()> {
        ctx.accounts.create_pool_mint()
    }

    /// Create pool vaults and the creator's LP account (Step 3)
    pub fn create_pool_vaults(ctx: Context<CreatePoolVaults>) -> Result<()> {
        ctx.accounts.create_pool_vaults()
    }

    /// Fund the pool with initial liquidity and open trading (Step 4)
    pub fn fund_pool(ctx: Context<FundPool>, amount_x: u64, amount_y: u64) -> Result<u64> {
        ctx.accounts.fund_pool(amount_x, amount_y)
    }

    /// Deposit both tokens in the current ratio for LP shares
    pub fn add_liquidity(
        ctx: Context<AddLiquidity>,
        max_amount_x: u64,
        max_amount_y: u64,
        min_shares: u64,
    ) -> Result<u64> {
        ctx.accounts
            .add_liquidity(max_amount_x, max_amount_y, min_shares)
    }

    /// Burn LP shares for a pro-rata slice of both reserves
    pub fn remove_liquidity(
        ctx: Context<RemoveLiquidity>,
        shares: u64,
        min_amount_x: u64,
        min_amount_y: u64,
    ) -> Result<()> {
        ctx.accounts
            .remove_liquidity(shares, min_amount_x, min_amount_y)?;
        Ok(())
    }

    /// Sell token X for token Y
    pub fn swap_x_for_y(ctx: Context<Swap>, amount_in: u64, min_amount_out: u64) -> Result<u64> {
        ctx.accounts
            .swap(SwapDirection::XForY, amount_in, min_amount_out)
    }

    /// Sell token Y for token X
    pub fn swap_y_for_x(ctx: Context<Swap>, amount_in: u64, min_amount_out: u64) -> Result<u64> {
        ctx.accounts
            .swap(SwapDirection::YForX, amount_in, min_amount_out)
    }

    /// Adapt a pool's curvature (keeper only)
    pub fn update_q(ctx: Context<UpdateCurve>, new_q_ppm: i64) -> Result<()> {
        ctx.accounts.update_q(new_q_ppm)
    }

    /// Rotate the keeper authority (admin only)
    pub fn set_keeper(ctx: Context<UpdateConfig>, keeper: Pubkey) -> Result<()> {
        ctx.accounts.set_keeper(keeper)
    }

    /// Pause or resume pool creation, trading and deposits (admin only)
    pub fn set_paused(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
        ctx.accounts.set_paused(paused)
    }

    /// Change a pool's swap fee (admin only)
    pub fn set_pool_fee(ctx: Context<UpdatePool>, fee_bps: u16) -> Result<()> {
        ctx.accounts.set_pool_fee(fee_bps)
    }
}
