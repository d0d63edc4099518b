//! Protocol Initialization
//!
//! Sets up the global configuration for the adaptive market maker.
//! This is typically called once during deployment.

use anchor_lang::prelude::*;

use crate::amm::MAX_FEE_BPS;
use crate::state::Config;

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration
    pub fn initialize(
        &mut self,
        default_fee_bps: u16,
        keeper: Pubkey,
        min_liquidity: u64,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        require!(default_fee_bps <= MAX_FEE_BPS, InitializeError::FeeTooHigh);
        require!(min_liquidity > 0, InitializeError::InvalidMinLiquidity);

        self.config.set_inner(Config {
            admin: self.admin.key(),
            keeper,
            default_fee_bps,
            min_liquidity,
            pool_count: 0,
            bump: bumps.config,
            paused: false,
        });

        msg!("Protocol initialized!");
        msg!("Admin: {}", self.admin.key());
        msg!("Keeper: {}", keeper);
        msg!("Fee: {} bps", default_fee_bps);

        Ok(())
    }
}

#[error_code]
pub enum InitializeError {
    #[msg("Swap fee cannot exceed 30%")]
    FeeTooHigh,
    #[msg("Minimum liquidity must be positive")]
    InvalidMinLiquidity,
}
