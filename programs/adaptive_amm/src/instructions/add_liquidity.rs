//! Liquidity Provision
//!
//! Deposits both tokens in the pool's current ratio and mints LP shares.
//! Because every curve in the family is homogeneous, a proportional deposit
//! scales `k` without moving the price or touching `q`.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Config, Pool};

/// Event emitted when liquidity is added
#[event]
pub struct LiquidityAdded {
    pub pool_id: u64,
    pub provider: Pubkey,
    pub amount_x: u64,
    pub amount_y: u64,
    pub shares: u64,
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(mut)]
    pub pool: Box<Account<'info, Pool>>,

    #[account(constraint = mint_x.key() == pool.mint_x)]
    pub mint_x: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = mint_y.key() == pool.mint_y)]
    pub mint_y: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, constraint = lp_mint.key() == pool.lp_mint)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = mint_x,
        associated_token::authority = provider,
    )]
    pub provider_x: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_y,
        associated_token::authority = provider,
    )]
    pub provider_y: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
    )]
    pub provider_lp: Box<InterfaceAccount<'info, TokenAccount>>,

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
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> AddLiquidity<'info> {
    /// Deposit at most `max_amount_x` / `max_amount_y`, minting at least `min_shares`
    pub fn add_liquidity(
        &mut self,
        max_amount_x: u64,
        max_amount_y: u64,
        min_shares: u64,
    ) -> Result<u64> {
        let deposit = self.pool.quote_deposit(
            max_amount_x,
            max_amount_y,
            min_shares,
            self.config.paused,
        )?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.provider_x.to_account_info(),
                    mint: self.mint_x.to_account_info(),
                    to: self.vault_x.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            deposit.amount_x,
            self.mint_x.decimals,
        )?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.provider_y.to_account_info(),
                    mint: self.mint_y.to_account_info(),
                    to: self.vault_y.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            deposit.amount_y,
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
                    to: self.provider_lp.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            deposit.shares,
        )?;

        self.pool.apply_deposit(&deposit)?;

        emit!(LiquidityAdded {
            pool_id: self.pool.id,
            provider: self.provider.key(),
            amount_x: deposit.amount_x,
            amount_y: deposit.amount_y,
            shares: deposit.shares,
        });

        Ok(deposit.shares)
    }
}

#[error_code]
pub enum LiquidityError {
    #[msg("Pool is not active")]
    PoolNotActive,
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("Withdrawal would empty a reserve")]
    ReserveDepleted,
    #[msg("Arithmetic overflow")]
    Overflow,
}
