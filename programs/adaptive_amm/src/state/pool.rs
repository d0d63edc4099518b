//! Adaptive Pool State
//!
//! Each pool pairs two token mints with their vaults, an LP mint, and the
//! curvature currently in force.

use anchor_lang::prelude::*;

use crate::amm::{
    apply_fee, initial_shares, size_deposit, size_withdrawal, AdaptiveCurve, AmmError, Deposit,
};
use crate::instructions::{CreatePoolError, LiquidityError, SwapError, UpdateCurveError};

/// Number of reserve snapshots kept on-chain
pub const HISTORY_LEN: usize = 16;

/// Individual liquidity pool account
///
/// Seeds: ["pool", pool_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Unique pool identifier
    pub id: u64,

    /// Pool creator's address
    pub creator: Pubkey,

    /// Token X mint address
    pub mint_x: Pubkey,

    /// Token Y mint address
    pub mint_y: Pubkey,

    /// LP share mint address
    pub lp_mint: Pubkey,

    /// Token X held by the pool
    pub reserve_x: u64,

    /// Token Y held by the pool
    pub reserve_y: u64,

    /// Total LP shares, including the locked minimum
    pub lp_supply: u64,

    /// Curvature in parts-per-million, always normalized
    pub q_ppm: i64,

    /// Swap fee in basis points, retained by the pool
    pub fee_bps: u16,

    /// Pool lifecycle status
    pub status: PoolStatus,

    /// Unix timestamp when the pool was created
    pub created_at: i64,

    /// Unix timestamp of the last curvature change
    pub last_q_update: i64,

    /// Ring buffer of recent reserve states
    pub history: [ReserveSnapshot; HISTORY_LEN],

    /// Next slot to write in `history`
    pub history_head: u8,

    /// Number of valid entries in `history`
    pub history_len: u8,

    /// PDA bump seed
    pub bump: u8,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";

    pub fn curve(&self) -> Result<AdaptiveCurve> {
        AdaptiveCurve::new(self.q_ppm)
    }

    /// Invariant `k` at the current reserves and curvature
    pub fn invariant(&self) -> Result<f64> {
        self.curve()?.invariant(self.reserve_x, self.reserve_y)
    }

    /// `(reserve_in, reserve_out)` for a swap in `direction`
    pub fn reserves(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::XForY => (self.reserve_x, self.reserve_y),
            SwapDirection::YForX => (self.reserve_y, self.reserve_x),
        }
    }

    /// Book a completed swap against the reserves
    pub fn apply_swap(
        &mut self,
        direction: SwapDirection,
        amount_in: u64,
        amount_out: u64,
    ) -> Result<()> {
        let (reserve_in, reserve_out) = match direction {
            SwapDirection::XForY => (&mut self.reserve_x, &mut self.reserve_y),
            SwapDirection::YForX => (&mut self.reserve_y, &mut self.reserve_x),
        };

        *reserve_in = reserve_in.checked_add(amount_in).ok_or(AmmError::Overflow)?;
        *reserve_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(AmmError::InsufficientLiquidity)?;

        Ok(())
    }

    /// Price a swap and enforce every precondition for executing it
    pub fn quote_swap(
        &self,
        direction: SwapDirection,
        amount_in: u64,
        min_amount_out: u64,
        paused: bool,
    ) -> Result<SwapQuote> {
        require!(!paused, SwapError::ProtocolPaused);
        require!(self.status == PoolStatus::Active, SwapError::PoolNotActive);
        require!(amount_in > 0, SwapError::ZeroAmount);

        let (amount_after_fee, fee) = apply_fee(amount_in, self.fee_bps)?;
        let (reserve_in, reserve_out) = self.reserves(direction);
        let amount_out = self
            .curve()?
            .amount_out(reserve_in, reserve_out, amount_after_fee)?;

        require!(amount_out > 0, SwapError::ZeroOutput);
        require!(amount_out >= min_amount_out, SwapError::SlippageExceeded);

        Ok(SwapQuote { amount_out, fee })
    }

    /// Size the opening deposit of a freshly created pool
    ///
    /// Returns `(shares_to_creator, total_supply)`.
    pub fn quote_funding(
        &self,
        amount_x: u64,
        amount_y: u64,
        min_liquidity: u64,
        paused: bool,
    ) -> Result<(u64, u64)> {
        require!(!paused, CreatePoolError::ProtocolPaused);
        require!(
            self.status == PoolStatus::Created,
            CreatePoolError::AlreadyInitialized
        );
        require!(
            amount_x >= min_liquidity && amount_y >= min_liquidity,
            CreatePoolError::InsufficientLiquidity
        );

        initial_shares(amount_x, amount_y)
    }

    /// Book the opening deposit and open the pool for trading
    pub fn apply_funding(&mut self, amount_x: u64, amount_y: u64, total_supply: u64, timestamp: i64) {
        self.reserve_x = amount_x;
        self.reserve_y = amount_y;
        self.lp_supply = total_supply;
        self.status = PoolStatus::Active;
        self.record_snapshot(timestamp);
    }

    /// Size a proportional deposit of at most `max_amount_x` / `max_amount_y`
    pub fn quote_deposit(
        &self,
        max_amount_x: u64,
        max_amount_y: u64,
        min_shares: u64,
        paused: bool,
    ) -> Result<Deposit> {
        require!(!paused, LiquidityError::ProtocolPaused);
        require!(self.status == PoolStatus::Active, LiquidityError::PoolNotActive);

        let deposit = size_deposit(
            self.reserve_x,
            self.reserve_y,
            self.lp_supply,
            max_amount_x,
            max_amount_y,
        )?;
        require!(deposit.shares >= min_shares, LiquidityError::SlippageExceeded);

        Ok(deposit)
    }

    pub fn apply_deposit(&mut self, deposit: &Deposit) -> Result<()> {
        self.reserve_x = self
            .reserve_x
            .checked_add(deposit.amount_x)
            .ok_or(LiquidityError::Overflow)?;
        self.reserve_y = self
            .reserve_y
            .checked_add(deposit.amount_y)
            .ok_or(LiquidityError::Overflow)?;
        self.lp_supply = self
            .lp_supply
            .checked_add(deposit.shares)
            .ok_or(LiquidityError::Overflow)?;

        Ok(())
    }

    /// Reserves released for burning `shares`
    ///
    /// Takes no pause flag: withdrawals stay open while the protocol is paused.
    pub fn quote_withdrawal(
        &self,
        shares: u64,
        min_amount_x: u64,
        min_amount_y: u64,
    ) -> Result<(u64, u64)> {
        require!(self.status == PoolStatus::Active, LiquidityError::PoolNotActive);

        let (amount_x, amount_y) =
            size_withdrawal(self.reserve_x, self.reserve_y, self.lp_supply, shares)?;

        require!(
            amount_x >= min_amount_x && amount_y >= min_amount_y,
            LiquidityError::SlippageExceeded
        );
        // The locked minimum keeps both reserves above zero
        require!(
            amount_x < self.reserve_x && amount_y < self.reserve_y,
            LiquidityError::ReserveDepleted
        );

        Ok((amount_x, amount_y))
    }

    pub fn apply_withdrawal(&mut self, shares: u64, amount_x: u64, amount_y: u64) -> Result<()> {
        self.reserve_x = self
            .reserve_x
            .checked_sub(amount_x)
            .ok_or(LiquidityError::ReserveDepleted)?;
        self.reserve_y = self
            .reserve_y
            .checked_sub(amount_y)
            .ok_or(LiquidityError::ReserveDepleted)?;
        self.lp_supply = self
            .lp_supply
            .checked_sub(shares)
            .ok_or(AmmError::InsufficientShares)?;

        Ok(())
    }

    /// Move the pool onto curvature `new_q_ppm` through its current reserves
    pub fn update_curvature(&mut self, new_q_ppm: i64, timestamp: i64) -> Result<CurvatureChange> {
        require!(self.status == PoolStatus::Active, UpdateCurveError::PoolNotActive);

        let curve = AdaptiveCurve::new(new_q_ppm)?;
        let invariant = curve.invariant(self.reserve_x, self.reserve_y)?;
        let old_q_ppm = self.q_ppm;

        self.q_ppm = curve.q_ppm();
        self.last_q_update = timestamp;
        self.record_snapshot(timestamp);

        Ok(CurvatureChange {
            old_q_ppm,
            new_q_ppm: curve.q_ppm(),
            invariant,
        })
    }

    /// Append the current reserves to the history, overwriting the oldest
    pub fn record_snapshot(&mut self, timestamp: i64) {
        self.history[self.history_head as usize] = ReserveSnapshot {
            reserve_x: self.reserve_x,
            reserve_y: self.reserve_y,
            q_ppm: self.q_ppm,
            timestamp,
        };

        self.history_head = ((self.history_head as usize + 1) % HISTORY_LEN) as u8;
        if (self.history_len as usize) < HISTORY_LEN {
            self.history_len += 1;
        }
    }

    /// Recorded snapshots, oldest first
    pub fn history(&self) -> Vec<ReserveSnapshot> {
        let len = self.history_len as usize;
        let start = (self.history_head as usize + HISTORY_LEN - len) % HISTORY_LEN;

        (0..len)
            .map(|i| self.history[(start + i) % HISTORY_LEN])
            .collect()
    }
}

/// Priced swap, ready to execute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapQuote {
    /// Output released to the trader
    pub amount_out: u64,
    /// Part of the input kept by the pool as fee
    pub fee: u64,
}

/// Result of a curvature update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvatureChange {
    pub old_q_ppm: i64,
    pub new_q_ppm: i64,
    /// `k` recomputed at the current reserves under the new curvature
    pub invariant: f64,
}

/// Point on the pool's reserve path
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct ReserveSnapshot {
    pub reserve_x: u64,
    pub reserve_y: u64,
    pub q_ppm: i64,
    pub timestamp: i64,
}

/// Pool lifecycle status
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum PoolStatus {
    /// Accounts are being set up, no liquidity yet
    #[default]
    Created,
    /// Funded and open for trading
    Active,
}

/// Which token the trader sells to the pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwapDirection {
    /// Sell X, receive Y
    XForY,
    /// Sell Y, receive X
    YForX,
}
