//! Liquidity Withdrawal
//!
//! Burns LP shares and releases the matching slice of both reserves.
//!
//! ```text
//! out_x = shares * reserve_x / lp_supply
//! out_y = shares * reserve_y / lp_supply
//! ```
//!
//! Withdrawals are allowed even while the protocol is paused.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::state::Pool;

/// Event emitted when liquidity is removed
#[event]
pub struct LiquidityRemoved {
    pub pool_id: u64,
    pub provider: Pubkey,
    pub shares: u64,
    pub amount_x: u64,
    pub amount_y: u64,
}

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
    pub provider: Signer<'info>,

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
        mut,
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
}

impl<'info> RemoveLiquidity<'info> {
    /// Burn `shares` and receive at least `min_amount_x` / `min_amount_y`
    pub fn remove_liquidity(
        &mut self,
        shares: u64,
        min_amount_x: u64,
        min_amount_y: u64,
    ) -> Result<(u64, u64)> {
        let (amount_x, amount_y) = self
            .pool
            .quote_withdrawal(shares, min_amount_x, min_amount_y)?;

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.lp_mint.to_account_info(),
                    from: self.provider_lp.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            shares,
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
                    from: self.vault_x.to_account_info(),
                    mint: self.mint_x.to_account_info(),
                    to: self.provider_x.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            amount_x,
            self.mint_x.decimals,
        )?;

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault_y.to_account_info(),
                    mint: self.mint_y.to_account_info(),
                    to: self.provider_y.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            amount_y,
            self.mint_y.decimals,
        )?;

        self.pool.apply_withdrawal(shares, amount_x, amount_y)?;

        emit!(LiquidityRemoved {
            pool_id: self.pool.id,
            provider: self.provider.key(),
            shares,
            amount_x,
            amount_y,
        });

        Ok((amount_x, amount_y))
    }
}
