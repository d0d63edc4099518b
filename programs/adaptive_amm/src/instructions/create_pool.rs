//! Permissionless Pool Creation Pipeline
//!
//! This file contains the complete modular pipeline for creating a pool.
//! Due to Solana's 4KB stack limit, the creation process is split into
//! 4 atomic steps that must be called in sequence.
//!
//! Step 1: CreatePoolState - Initializes the pool account and its curvature.
//! Step 2: CreatePoolMint - Creates the LP share mint.
//! Step 3: CreatePoolVaults - Creates the pool's token vaults and the creator's LP account.
//! Step 4: FundPool - Transfers initial liquidity, mints LP shares and opens trading.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Config, Pool, PoolStatus, ReserveSnapshot, HISTORY_LEN};

/// Decimals of every LP share mint
pub const LP_DECIMALS: u8 = 9;

// =============================================================================
// STEP 1: CREATE POOL STATE
// =============================================================================

/// Event emitted when pool state is created
#[event]
pub struct PoolCreated {
    pub pool_id: u64,
    pub creator: Pubkey,
    pub mint_x: Pubkey,
    pub mint_y: Pubkey,
    pub q_ppm: i64,
}

#[derive(Accounts)]
pub struct CreatePoolState<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = creator,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, config.pool_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub mint_x: InterfaceAccount<'info, Mint>,

    pub mint_y: InterfaceAccount<'info, Mint>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreatePoolState<'info> {
    pub fn create_pool_state(&mut self, q_ppm: i64, bumps: &CreatePoolStateBumps) -> Result<()> {
        let clock = Clock::get()?;

        let (pool_id, curve) = self
            .config
            .register_pool(&self.mint_x.key(), &self.mint_y.key(), q_ppm)?;

        self.pool.set_inner(Pool {
            id: pool_id,
            creator: self.creator.key(),
            mint_x: self.mint_x.key(),
            mint_y: self.mint_y.key(),
            lp_mint: Pubkey::default(),
            reserve_x: 0,
            reserve_y: 0,
            lp_supply: 0,
            q_ppm: curve.q_ppm(),
            fee_bps: self.config.default_fee_bps,
            status: PoolStatus::Created,
            created_at: clock.unix_timestamp,
            last_q_update: clock.unix_timestamp,
            history: [ReserveSnapshot::default(); HISTORY_LEN],
            history_head: 0,
            history_len: 0,
            bump: bumps.pool,
        });

        emit!(PoolCreated {
            pool_id,
            creator: self.creator.key(),
            mint_x: self.mint_x.key(),
            mint_y: self.mint_y.key(),
            q_ppm: curve.q_ppm(),
        });

        Ok(())
    }
}

// =============================================================================
// STEP 2: CREATE POOL MINT
// =============================================================================

/// Event emitted when the LP mint is created
#[event]
pub struct PoolMintCreated {
    pub pool_id: u64,
    pub lp_mint: Pubkey,
}

#[derive(Accounts)]
pub struct CreatePoolMint<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        constraint = pool.creator == creator.key() @ CreatePoolError::Unauthorized,
        constraint = pool.lp_mint == Pubkey::default() @ CreatePoolError::AlreadyInitialized,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init,
        payer = creator,
        mint::decimals = LP_DECIMALS,
        mint::authority = pool,
        seeds = [b"lp_mint", pool.key().as_ref()],
        bump,
    )]
    pub lp_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePoolMint<'info> {
    pub fn create_pool_mint(&mut self) -> Result<()> {
        self.pool.lp_mint = self.lp_mint.key();

        emit!(PoolMintCreated {
            pool_id: self.pool.id,
            lp_mint: self.lp_mint.key(),
        });

        Ok(())
    }
}

// =============================================================================
// STEP 3: CREATE POOL VAULTS
// =============================================================================

/// Event emitted when pool vaults are created
#[event]
pub struct PoolVaultsCreated {
    pub pool_id: u64,
    pub vault_x: Pubkey,
    pub vault_y: Pubkey,
}

#[derive(Accounts)]
pub struct CreatePoolVaults<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        constraint = pool.creator == creator.key() @ CreatePoolError::Unauthorized,
        constraint = pool.status == PoolStatus::Created @ CreatePoolError::AlreadyInitialized,
        constraint = pool.lp_mint != Pubkey::default() @ CreatePoolError::MintMissing,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// CHECK: Manual validation to save stack
    #[account(constraint = mint_x.key() == pool.mint_x)]
    pub mint_x: AccountInfo<'info>,

    /// CHECK: Manual validation to save stack
    #[account(constraint = mint_y.key() == pool.mint_y)]
    pub mint_y: AccountInfo<'info>,

    /// CHECK: Manual validation to save stack
    #[account(constraint = lp_mint.key() == pool.lp_mint)]
    pub lp_mint: AccountInfo<'info>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = mint_x,
        associated_token::authority = pool,
    )]
    pub vault_x: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = mint_y,
        associated_token::authority = pool,
    )]
    pub vault_y: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = lp_mint,
        associated_token::authority = creator,
    )]
    pub creator_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePoolVaults<'info> {
    pub fn create_pool_vaults(&mut self) -> Result<()> {
        emit!(PoolVaultsCreated {
            pool_id: self.pool.id,
            vault_x: self.vault_x.key(),
            vault_y: self.vault_y.key(),
        });
        Ok(())
    }
}

// =============================================================================
// STEP 4: FUND POOL
// =============================================================================

/// Event emitted when the pool is funded and opens for trading
#[event]
pub struct PoolFunded {
    pub pool_id: u64,
    pub amount_x: u64,
    pub amount_y: u64,
    pub shares: u64,
}

#[derive(Accounts)]
pub struct FundPool<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        constraint = pool.creator == creator.key() @ CreatePoolError::Unauthorized,
        constraint = pool.lp_mint != Pubkey::default() @ CreatePoolError::MintMissing,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(constraint = mint_x.key() == pool.mint_x)]
    pub mint_x: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = mint_y.key() == pool.mint_y)]
    pub mint_y: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Manual validation to save stack
    #[account(mut, constraint = lp_mint.key() == pool.lp_mint)]
    pub lp_mint: AccountInfo<'info>,

    #[account(
        mut,
        associated_token::mint = mint_x,
        associated_token::authority = creator,
    )]
    pub creator_x: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_y,
        associated_token::authority = creator,
    )]
    pub creator_y: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = lp_mint,
        associated_token::authority = creator,
    )]
    pub creator_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_x,
        associated_token::authority = pool,
    )]
    pub vault_x: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_y,
        associated_token::authority = pool,
    )]
    pub vault_y: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> FundPool<'info> {
    pub fn fund_pool(&mut self, amount_x: u64, amount_y: u64) -> Result<u64> {
        let clock = Clock::get()?;

        let (shares, total_supply) = self.pool.quote_funding(
            amount_x,
            amount_y,
            self.config.min_liquidity,
            self.config.paused,
        )?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.creator_x.to_account_info(),
                    mint: self.mint_x.to_account_info(),
                    to: self.vault_x.to_account_info(),
                    authority: self.creator.to_account_info(),
                },
            ),
            amount_x,
            self.mint_x.decimals,
        )?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.creator_y.to_account_info(),
                    mint: self.mint_y.to_account_info(),
                    to: self.vault_y.to_account_info(),
                    authority: self.creator.to_account_info(),
                },
            ),
            amount_y,
            self.mint_y.decimals,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.lp_mint.to_account_info(),
                    to: self.creator_lp.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            shares,
        )?;

        self.pool
            .apply_funding(amount_x, amount_y, total_supply, clock.unix_timestamp);

        emit!(PoolFunded {
            pool_id: self.pool.id,
            amount_x,
            amount_y,
            shares,
        });

        Ok(shares)
    }
}

#[error_code]
pub enum CreatePoolError {
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Pool tokens must be different mints")]
    IdenticalMints,
    #[msg("Only the pool creator can run this step")]
    Unauthorized,
    #[msg("Pool step already completed")]
    AlreadyInitialized,
    #[msg("LP mint has not been created")]
    MintMissing,
    #[msg("Initial liquidity below minimum")]
    InsufficientLiquidity,
    #[msg("Arithmetic overflow")]
    Overflow,
}
