//! # Liquidity Shares and Fees
//!
//! LP shares are claims on a fixed fraction of both reserves. Every curve in
//! the family is homogeneous (`x^q + y^q = k^q` scales linearly with `x` and
//! `y`), so proportional deposits and withdrawals move the pool along a ray
//! from the origin and leave the current price untouched.
//!
//! ```text
//! first deposit : shares = √(x · y) − MINIMUM_LIQUIDITY
//! later deposit : shares = min(dx · T / x, dy · T / y)
//! withdrawal    : out_x  = shares · x / T,  out_y = shares · y / T
//! ```

use anchor_lang::prelude::*;

use super::adaptive_curve::{div_ceil, sqrt, AmmError};

/// Shares locked forever on the first deposit so `T` never returns to zero
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Basis-point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Highest swap fee a pool may charge (30%)
pub const MAX_FEE_BPS: u16 = 3_000;

/// Result of sizing a deposit against the current pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deposit {
    /// Shares minted to the provider
    pub shares: u64,
    /// Token X actually pulled from the provider
    pub amount_x: u64,
    /// Token Y actually pulled from the provider
    pub amount_y: u64,
}

/// Shares for the first deposit into an empty pool
///
/// Returns `(shares_to_provider, total_supply)`; the difference is locked.
pub fn initial_shares(amount_x: u64, amount_y: u64) -> Result<(u64, u64)> {
    require!(amount_x > 0 && amount_y > 0, AmmError::ZeroAmount);

    let total = sqrt(amount_x as u128 * amount_y as u128) as u64;
    require!(total > MINIMUM_LIQUIDITY, AmmError::InsufficientLiquidity);

    Ok((total - MINIMUM_LIQUIDITY, total))
}

/// Size a proportional deposit bounded by `max_x` and `max_y`
///
/// The amounts pulled are rounded up so the existing holders never lose value.
pub fn size_deposit(
    reserve_x: u64,
    reserve_y: u64,
    lp_supply: u64,
    max_x: u64,
    max_y: u64,
) -> Result<Deposit> {
    require!(max_x > 0 && max_y > 0, AmmError::ZeroAmount);
    require!(
        reserve_x > 0 && reserve_y > 0 && lp_supply > 0,
        AmmError::InvalidReserves
    );

    let supply = lp_supply as u128;
    let by_x = mul_div(max_x, supply, reserve_x as u128)?;
    let by_y = mul_div(max_y, supply, reserve_y as u128)?;
    let shares = by_x.min(by_y);
    require!(shares > 0, AmmError::ZeroAmount);

    let amount_x = mul_div_ceil(shares, reserve_x as u128, supply)?;
    let amount_y = mul_div_ceil(shares, reserve_y as u128, supply)?;

    Ok(Deposit {
        shares: u64::try_from(shares).map_err(|_| error!(AmmError::Overflow))?,
        amount_x: u64::try_from(amount_x).map_err(|_| error!(AmmError::Overflow))?,
        amount_y: u64::try_from(amount_y).map_err(|_| error!(AmmError::Overflow))?,
    })
}

/// Reserves released when burning `shares`, rounded down
pub fn size_withdrawal(
    reserve_x: u64,
    reserve_y: u64,
    lp_supply: u64,
    shares: u64,
) -> Result<(u64, u64)> {
    require!(shares > 0, AmmError::ZeroAmount);
    require!(shares <= lp_supply, AmmError::InsufficientShares);

    let supply = lp_supply as u128;
    let out_x = mul_div(shares, reserve_x as u128, supply)?;
    let out_y = mul_div(shares, reserve_y as u128, supply)?;

    // Both fit: shares <= supply
    Ok((out_x as u64, out_y as u64))
}

/// Split `amount` into `(amount_after_fee, fee)`
pub fn apply_fee(amount: u64, fee_bps: u16) -> Result<(u64, u64)> {
    require!(fee_bps <= MAX_FEE_BPS, AmmError::InvalidFee);

    let fee = amount
        .checked_mul(fee_bps as u64)
        .ok_or(AmmError::Overflow)?
        / BPS_DENOMINATOR;

    Ok((amount - fee, fee))
}

fn mul_div(a: u64, b: u128, denominator: u128) -> Result<u128> {
    Ok((a as u128)
        .checked_mul(b)
        .ok_or(AmmError::Overflow)?
        / denominator)
}

fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128> {
    let product = a.checked_mul(b).ok_or(AmmError::Overflow)?;
    Ok(div_ceil(product, denominator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    #[test]
    fn test_initial_shares_lock_minimum() {
        let (shares, total) = initial_shares(1_000_000, 4_000_000).unwrap();
        assert_eq!(total, 2_000_000);
        assert_eq!(shares, 2_000_000 - MINIMUM_LIQUIDITY);
    }

    #[test]
    fn test_initial_shares_too_small() {
        assert_eq!(
            initial_shares(1_000, 1_000).unwrap_err(),
            Error::from(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_deposit_limited_by_scarcer_side() {
        // Pool 1000 X / 2000 Y, 1000 shares. Offer 100 X and 1000 Y.
        let d = size_deposit(1000, 2000, 1000, 100, 1000).unwrap();
        assert_eq!(d.shares, 100);
        assert_eq!(d.amount_x, 100);
        assert_eq!(d.amount_y, 200);
    }

    #[test]
    fn test_deposit_rounds_against_provider() {
        // 3 shares of a 7-share pool holding 10/10 cost ceil(30/7) = 5 each
        let d = size_deposit(10, 10, 7, 5, 5).unwrap();
        assert_eq!(d.shares, 3);
        assert_eq!(d.amount_x, 5);
        assert_eq!(d.amount_y, 5);
    }

    #[test]
    fn test_mul_div_ceil_at_u128_limit() {
        assert_eq!(mul_div_ceil(u128::MAX, 1, 2).unwrap(), 1u128 << 127);
        assert_eq!(mul_div_ceil(u128::MAX, 1, u128::MAX).unwrap(), 1);
        assert_eq!(
            mul_div_ceil(u128::MAX, 2, 3).unwrap_err(),
            Error::from(AmmError::Overflow)
        );

        // Largest product a deposit can form
        let d = size_deposit(u64::MAX, u64::MAX, u64::MAX, u64::MAX, u64::MAX).unwrap();
        assert_eq!(d.shares, u64::MAX);
        assert_eq!(d.amount_x, u64::MAX);
        assert_eq!(d.amount_y, u64::MAX);
    }

    #[test]
    fn test_dust_deposit_rejected() {
        assert_eq!(
            size_deposit(1_000_000, 1_000_000, 1000, 1, 1).unwrap_err(),
            Error::from(AmmError::ZeroAmount)
        );
    }

    #[test]
    fn test_withdrawal_pro_rata() {
        assert_eq!(size_withdrawal(1000, 3000, 100, 10).unwrap(), (100, 300));
        assert_eq!(size_withdrawal(1000, 3000, 100, 100).unwrap(), (1000, 3000));
        assert_eq!(
            size_withdrawal(1000, 3000, 100, 101).unwrap_err(),
            Error::from(AmmError::InsufficientShares)
        );
    }

    #[test]
    fn test_apply_fee() {
        assert_eq!(apply_fee(10_000, 30).unwrap(), (9_970, 30));
        assert_eq!(apply_fee(99, 30).unwrap(), (99, 0));
        assert_eq!(apply_fee(1_000, 0).unwrap(), (1_000, 0));
        assert_eq!(
            apply_fee(1_000, MAX_FEE_BPS + 1).unwrap_err(),
            Error::from(AmmError::InvalidFee)
        );
    }
}
