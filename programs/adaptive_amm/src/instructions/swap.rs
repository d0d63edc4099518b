//! Token Swaps
//!
//! Sells one pool token for the other along the adaptive curve.
//!
//! ## Fee Handling
//!
//! ```text
//! fee         = amount_in * fee_bps / 10000
//! curve_input = amount_in - fee
//! amount_out  = curve(reserve_in, reserve_out, curve_input)
//! reserve_in += amount_in        (the fee stays with the LPs)
//! ```

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Config, Pool, SwapDirection};

/// Event emitted after every swap
#[event]
pub struct Swapped {
    pub pool_id: u64,
    pub trader: Pubkey,
    pub x_for_y: bool,
    pub amount_in: u64,
    pub fee: u64,
    pub amount_out: u64,
    pub reserve_x: u64,
    pub reserve_y: u64,
    /// Marginal price of X in Y after the trade, scaled by 1e12
    pub spot_price: u64,
}

/// Accounts for swapping in either direction
#[derive(Accounts)]
pub struct Swap<'info> {
    /// Trader
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Protocol configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Pool being traded against
    #[account(mut)]
    pub pool: Box<Account<'info, Pool>>,

    #[account(constraint = mint_x.key() == pool.mint_x)]
    pub mint_x: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = mint_y.key() == pool.mint_y)]
    pub mint_y: Box<InterfaceAccount<'info, Mint>>,

    /// Trader's token X account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = mint_x,
        associated_token::authority = trader,
    )]
    pub trader_x: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Trader's token Y account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = mint_y,
        associated_token::authority = trader,
    )]
    pub trader_y: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool's token X vault
    #[account(
        mut,
        associated_token::mint = mint_x,
        associated_token::authority = pool,
    )]
    pub vault_x: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool's token Y vault
    #[account(
        mut,
        associated_token::mint = mint_y,
        associated_token::authority = pool,
    )]
    pub vault_y: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Swap<'info> {
    /// Sell `amount_in` of one token and receive at least `min_amount_out` of the other
    pub fn swap(
        &mut self,
        direction: SwapDirection,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64> {
        let clock = Clock::get()?;

        let curve = self.pool.curve()?;
        let quote = self
            .pool
            .quote_swap(direction, amount_in, min_amount_out, self.config.paused)?;
        let amount_out = quote.amount_out;

        let (trader_in, vault_in, mint_in, trader_out, vault_out, mint_out) = match direction {
            SwapDirection::XForY => (
                &self.trader_x,
                &self.vault_x,
                &self.mint_x,
                &self.trader_y,
                &self.vault_y,
                &self.mint_y,
            ),
            SwapDirection::YForX => (
                &self.trader_y,
                &self.vault_y,
                &self.mint_y,
                &self.trader_x,
                &self.vault_x,
                &self.mint_x,
            ),
        };

        // Pull the full input, fee included
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: trader_in.to_account_info(),
                    mint: mint_in.to_account_info(),
                    to: vault_in.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            amount_in,
            mint_in.decimals,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: vault_out.to_account_info(),
                    mint: mint_out.to_account_info(),
                    to: trader_out.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            amount_out,
            mint_out.decimals,
        )?;

        self.pool.apply_swap(direction, amount_in, amount_out)?;
        self.pool.record_snapshot(clock.unix_timestamp);

        // Saturates for extreme reserve ratios instead of failing the trade
        let spot_price = curve
            .spot_price(self.pool.reserve_x, self.pool.reserve_y)
            .unwrap_or(u64::MAX);

        emit!(Swapped {
            pool_id: self.pool.id,
            trader: self.trader.key(),
            x_for_y: direction == SwapDirection::XForY,
            amount_in,
            fee: quote.fee,
            amount_out,
            reserve_x: self.pool.reserve_x,
            reserve_y: self.pool.reserve_y,
            spot_price,
        });

        Ok(amount_out)
    }
}

#[error_code]
pub enum SwapError {
    #[msg("Pool is not active")]
    PoolNotActive,
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Swap amount must be greater than zero")]
    ZeroAmount,
    #[msg("Swap would return nothing")]
    ZeroOutput,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
}
