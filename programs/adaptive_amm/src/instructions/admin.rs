//! Administrative Controls
//!
//! Admin-only knobs on the global configuration and on individual pools.

use anchor_lang::prelude::*;

use crate::amm::MAX_FEE_BPS;
use crate::state::{Config, Pool};

/// Event emitted when the keeper authority changes
#[event]
pub struct KeeperChanged {
    pub old_keeper: Pubkey,
    pub new_keeper: Pubkey,
}

/// Event emitted when a pool's swap fee changes
#[event]
pub struct PoolFeeChanged {
    pub pool_id: u64,
    pub old_fee_bps: u16,
    pub new_fee_bps: u16,
}

/// Event emitted when the protocol is paused or resumed
#[event]
pub struct PauseToggled {
    pub paused: bool,
}

/// Accounts for protocol-wide admin actions
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        constraint = admin.key() == config.admin @ AdminError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,
}

impl<'info> UpdateConfig<'info> {
    pub fn set_keeper(&mut self, keeper: Pubkey) -> Result<()> {
        let old_keeper = self.config.keeper;
        self.config.keeper = keeper;

        emit!(KeeperChanged {
            old_keeper,
            new_keeper: keeper,
        });
        msg!("Keeper: {} -> {}", old_keeper, keeper);

        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.config.paused = paused;

        emit!(PauseToggled { paused });
        msg!("Protocol paused: {}", paused);

        Ok(())
    }
}

/// Accounts for per-pool admin actions
#[derive(Accounts)]
pub struct UpdatePool<'info> {
    #[account(
        constraint = admin.key() == config.admin @ AdminError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(mut)]
    pub pool: Box<Account<'info, Pool>>,
}

impl<'info> UpdatePool<'info> {
    pub fn set_pool_fee(&mut self, fee_bps: u16) -> Result<()> {
        require!(fee_bps <= MAX_FEE_BPS, AdminError::FeeTooHigh);

        let old_fee_bps = self.pool.fee_bps;
        self.pool.fee_bps = fee_bps;

        emit!(PoolFeeChanged {
            pool_id: self.pool.id,
            old_fee_bps,
            new_fee_bps: fee_bps,
        });

        Ok(())
    }
}

#[error_code]
pub enum AdminError {
    #[msg("Only the protocol admin can do this")]
    Unauthorized,
    #[msg("Swap fee cannot exceed 30%")]
    FeeTooHigh,
}
