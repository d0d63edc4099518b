//! Curvature Adaptation
//!
//! The keeper retunes a pool's `q` as market conditions change.
//!
//! ## Adaptation Flow
//!
//! 1. Keeper observes the market (volatility, oracle deviation, ...)
//! 2. Keeper calls `update_q` with the new curvature
//! 3. `k` is recomputed at the current reserves, so the pool stays on the
//!    new curve and the marginal price of the current state is the only
//!    thing that moves
//! 4. Subsequent swaps price along the new curve
//!
//! ## Keeper Integration
//!
//! The keeper can be:
//! - **Chainlink Automation**: an upkeep whose forwarder signs the call
//! - **Off-chain model**: a bot tracking realised volatility
//! - **Multisig**: manual governance of the curve

use anchor_lang::prelude::*;

use crate::state::{Config, Pool};

/// Event emitted when a pool's curvature changes
#[event]
pub struct CurvatureUpdated {
    pub pool_id: u64,
    pub old_q_ppm: i64,
    pub new_q_ppm: i64,
    /// Invariant at the current reserves under the new curvature
    pub invariant: f64,
    pub keeper: Pubkey,
    pub timestamp: i64,
}

/// Accounts for curvature updates
#[derive(Accounts)]
pub struct UpdateCurve<'info> {
    /// Keeper authorized to adapt pools
    #[account(
        constraint = config.is_keeper(&keeper.key()) @ UpdateCurveError::Unauthorized
    )]
    pub keeper: Signer<'info>,

    /// Protocol configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Pool to adapt
    #[account(mut)]
    pub pool: Box<Account<'info, Pool>>,
}

impl<'info> UpdateCurve<'info> {
    /// Switch the pool to curvature `new_q_ppm`
    pub fn update_q(&mut self, new_q_ppm: i64) -> Result<()> {
        let clock = Clock::get()?;

        let change = self.pool.update_curvature(new_q_ppm, clock.unix_timestamp)?;

        emit!(CurvatureUpdated {
            pool_id: self.pool.id,
            old_q_ppm: change.old_q_ppm,
            new_q_ppm: change.new_q_ppm,
            invariant: change.invariant,
            keeper: self.keeper.key(),
            timestamp: clock.unix_timestamp,
        });

        msg!(
            "Pool {} curvature: {} -> {} ppm",
            self.pool.id,
            change.old_q_ppm,
            change.new_q_ppm
        );

        Ok(())
    }
}

#[error_code]
pub enum UpdateCurveError {
    #[msg("Only the keeper can adapt the curve")]
    Unauthorized,
    #[msg("Pool is not active")]
    PoolNotActive,
}
