//! # Adaptive Trading Curve
//!
//! A two-token pool whose reserves `x` and `y` always lie on a curve from
//! the power-mean family:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │        q != 0 :   x^q + y^q = k^q                           │
//! │        q == 0 :   x * y     = k       (constant product)    │
//! │                                                              │
//! │   Where:                                                     │
//! │   • x, y = reserves of token X and token Y                  │
//! │   • q    = curvature, adapted by the keeper                 │
//! │   • k    = invariant at the current q                       │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shape of the family
//!
//! ```text
//!   q = -1.0   strongly convex, steep price impact
//!   q = -0.5
//!   q =  0.0   x * y = k (Uniswap v2)
//!   q =  0.5
//!   q =  1.0   x + y = k (constant sum, no price impact)
//! ```
//!
//! ## Swap Formula
//!
//! Selling `dx` of the input token into the pool:
//!
//! ```text
//! 1. new_x = x + dx
//! 2. new_y = (x^q + y^q - new_x^q)^(1/q)     (solve invariant for y)
//! 3. dy    = y - new_y                       (released to the trader)
//! ```
//!
//! The curve is symmetric in its two arguments, so the same routine serves
//! both swap directions with the reserves exchanged.
//!
//! ## Marginal Price
//!
//! Differentiating the invariant gives the price of X in units of Y:
//!
//! ```text
//! -dy/dx = (x / y)^(q - 1)
//! ```
//!
//! ## Numerics
//!
//! `q` is stored as parts-per-million. The `q == 0` and `q == 1` branches run
//! entirely in integers. Every other `q` needs a real exponent and is
//! evaluated in `f64`. Subtracting `x^q + y^q - new_x^q` directly loses all
//! precision once reserves pass 2^53, so the swap is rewritten around the
//! relative growth of the input reserve:
//!
//! ```text
//! s       = (x / y)^q * expm1(q * ln1p(dx / x))
//! dy      = y * -expm1(ln1p(-s) / q)
//! ```
//!
//! Both factors are well conditioned, so `dy` carries a small relative error
//! that `ROUNDING_MARGIN` more than covers before flooring.

use anchor_lang::prelude::*;

/// Errors specific to the adaptive trading curve
#[error_code]
pub enum AmmError {
    #[msg("Invalid reserves: must be positive")]
    InvalidReserves,
    #[msg("Curvature q outside the allowed range")]
    InvalidCurvature,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Trade has no solution on the curve")]
    InsufficientLiquidity,
    #[msg("Fee exceeds the maximum")]
    InvalidFee,
    #[msg("Not enough shares for this withdrawal")]
    InsufficientShares,
}

/// Fixed-point scale of `q` (1.0 == 1_000_000)
pub const Q_SCALE: i64 = 1_000_000;

/// Most convex curve the pool accepts (q = -1.0)
pub const Q_MIN: i64 = -Q_SCALE;

/// Flattest curve the pool accepts (q = 1.0, constant sum)
pub const Q_MAX: i64 = Q_SCALE;

/// |q| below this is treated as exactly zero (q = 0.001)
pub const Q_ZERO_BAND: i64 = 1_000;

/// Fixed-point scale for spot prices
pub const PRICE_SCALE: u128 = 1_000_000_000_000;

/// Relative haircut on real-exponent swap outputs
///
/// Covers the accumulated `f64` error of the output fraction, which stays
/// within a few dozen ulps (~1e-14).
const ROUNDING_MARGIN: f64 = 1e-12;

/// Adaptive power-mean curve
///
/// Holds a validated, normalized curvature. Build with [`AdaptiveCurve::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdaptiveCurve {
    q_ppm: i64,
}

impl AdaptiveCurve {
    /// Validate and normalize a curvature given in parts-per-million
    ///
    /// Values within [`Q_ZERO_BAND`] of zero snap to the constant-product
    /// curve; `(x^q + y^q)^(1/q)` has no usable limit there.
    pub fn new(q_ppm: i64) -> Result<Self> {
        require!(
            (Q_MIN..=Q_MAX).contains(&q_ppm),
            AmmError::InvalidCurvature
        );

        let q_ppm = if q_ppm.abs() < Q_ZERO_BAND { 0 } else { q_ppm };
        Ok(Self { q_ppm })
    }

    pub fn q_ppm(&self) -> i64 {
        self.q_ppm
    }

    pub fn is_constant_product(&self) -> bool {
        self.q_ppm == 0
    }

    fn exponent(&self) -> f64 {
        self.q_ppm as f64 / Q_SCALE as f64
    }

    /// Calculate the invariant `k` of a pool holding `x` and `y`
    ///
    /// Constant product returns `x * y`; every other curve returns
    /// `(x^q + y^q)^(1/q)`.
    ///
    /// # Example
    /// ```ignore
    /// let curve = AdaptiveCurve::new(1_000_000)?; // q = 1
    /// assert_eq!(curve.invariant(300, 700)?, 1000.0);
    /// ```
    pub fn invariant(&self, x: u64, y: u64) -> Result<f64> {
        require!(x > 0 && y > 0, AmmError::InvalidReserves);

        if self.is_constant_product() {
            return Ok(x as f64 * y as f64);
        }

        let q = self.exponent();
        let k = ((x as f64).powf(q) + (y as f64).powf(q)).powf(1.0 / q);
        require!(k.is_finite() && k > 0.0, AmmError::Overflow);

        Ok(k)
    }

    /// Calculate the output released when `amount_in` is sold into the pool
    ///
    /// # Arguments
    /// * `reserve_in` - Reserve of the token being sold to the pool
    /// * `reserve_out` - Reserve of the token being bought
    /// * `amount_in` - Amount entering the curve (after fees)
    ///
    /// # Returns
    /// * Amount of the output token, rounded down
    ///
    /// # Example
    /// ```ignore
    /// // Balanced pool, constant product
    /// let out = AdaptiveCurve::new(0)?.amount_out(1000, 1000, 100)?;
    /// assert_eq!(out, 90);
    /// ```
    pub fn amount_out(&self, reserve_in: u64, reserve_out: u64, amount_in: u64) -> Result<u64> {
        require!(amount_in > 0, AmmError::ZeroAmount);
        require!(reserve_in > 0 && reserve_out > 0, AmmError::InvalidReserves);

        // The new input reserve must still fit in a token account
        let new_in = reserve_in.checked_add(amount_in).ok_or(AmmError::Overflow)?;

        if self.is_constant_product() {
            let k = (reserve_in as u128)
                .checked_mul(reserve_out as u128)
                .ok_or(AmmError::Overflow)?;
            // k / new_in < reserve_out, and at least one unit stays behind
            let new_out = div_ceil(k, new_in as u128);
            return Ok((reserve_out as u128 - new_out) as u64);
        }

        if self.q_ppm == Q_MAX {
            // x + y = k is exact in integers
            require!(amount_in < reserve_out, AmmError::InsufficientLiquidity);
            return Ok(amount_in);
        }

        let q = self.exponent();

        // new_out^q = reserve_out^q * (1 - s), with
        // s = (reserve_in / reserve_out)^q * ((1 + amount_in / reserve_in)^q - 1)
        let growth = (amount_in as f64 / reserve_in as f64).ln_1p();
        let ratio = reserve_in as f64 / reserve_out as f64;
        let s = ratio.powf(q) * (q * growth).exp_m1();

        // q > 0: new_in alone already exceeds k
        require!(s.is_finite() && s < 1.0, AmmError::InsufficientLiquidity);

        // 1 - (1 - s)^(1/q), the share of reserve_out released
        let released = -((-s).ln_1p() / q).exp_m1();
        let amount_out = reserve_out as f64 * released * (1.0 - ROUNDING_MARGIN);
        require!(
            amount_out.is_finite() && amount_out >= 0.0,
            AmmError::InsufficientLiquidity
        );

        let amount_out = amount_out as u64;
        require!(amount_out < reserve_out, AmmError::InsufficientLiquidity);

        Ok(amount_out)
    }

    /// Marginal price of X in units of Y, scaled by [`PRICE_SCALE`]
    ///
    /// `(x / y)^(q - 1)`, which reduces to `y / x` on the constant-product curve.
    pub fn spot_price(&self, reserve_x: u64, reserve_y: u64) -> Result<u64> {
        require!(reserve_x > 0 && reserve_y > 0, AmmError::InvalidReserves);

        if self.is_constant_product() {
            let price = (reserve_y as u128)
                .checked_mul(PRICE_SCALE)
                .ok_or(AmmError::Overflow)?
                / reserve_x as u128;
            return u64::try_from(price).map_err(|_| error!(AmmError::Overflow));
        }

        let ratio = reserve_y as f64 / reserve_x as f64;
        let price = ratio.powf(1.0 - self.exponent()) * PRICE_SCALE as f64;
        require!(
            price.is_finite() && price < u64::MAX as f64,
            AmmError::Overflow
        );

        Ok(price as u64)
    }

    /// Y coordinates of the curve through invariant `k` at each of `xs`
    ///
    /// `None` marks points where the curve is undefined, e.g. `x > k` for
    /// positive `q`.
    pub fn curve_y(&self, k: f64, xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().map(|&x| self.solve_y(k, x)).collect()
    }

    /// Sample the curve passing through the reserves `(reserve_x, reserve_y)`
    pub fn trading_curve(
        &self,
        reserve_x: u64,
        reserve_y: u64,
        xs: &[f64],
    ) -> Result<Vec<Option<f64>>> {
        let k = self.invariant(reserve_x, reserve_y)?;
        Ok(self.curve_y(k, xs))
    }

    fn solve_y(&self, k: f64, x: f64) -> Option<f64> {
        if !(x > 0.0) {
            return None;
        }

        let y = if self.is_constant_product() {
            k / x
        } else {
            let q = self.exponent();
            let remainder = k.powf(q) - x.powf(q);
            if remainder < 0.0 {
                return None;
            }
            remainder.powf(1.0 / q)
        };

        y.is_finite().then_some(y)
    }
}

pub(crate) fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    numerator / denominator + (numerator % denominator != 0) as u128
}

/// Integer square root using Newton's method
///
/// Computes floor(√x)
pub fn sqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }

    // ceil(x / 2) without overflowing at u128::MAX
    let mut z = x / 2 + x % 2;
    let mut y = x;

    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }

    y
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    fn curve(q: f64) -> AdaptiveCurve {
        AdaptiveCurve::new((q * Q_SCALE as f64) as i64).unwrap()
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(0), 0);
        assert_eq!(sqrt(1), 1);
        assert_eq!(sqrt(10), 3);
        assert_eq!(sqrt(1_000_000), 1000);
        assert_eq!(sqrt(2), 1);
        assert_eq!(sqrt(u64::MAX as u128 * u64::MAX as u128), u64::MAX as u128);
        assert_eq!(sqrt(u128::MAX), u64::MAX as u128);
    }

    #[test]
    fn test_q_out_of_range_rejected() {
        assert_eq!(
            AdaptiveCurve::new(Q_MAX + 1).unwrap_err(),
            Error::from(AmmError::InvalidCurvature)
        );
        assert!(AdaptiveCurve::new(Q_MIN - 1).is_err());
        assert!(AdaptiveCurve::new(Q_MIN).is_ok());
        assert!(AdaptiveCurve::new(Q_MAX).is_ok());
    }

    #[test]
    fn test_small_q_snaps_to_constant_product() {
        assert!(AdaptiveCurve::new(999).unwrap().is_constant_product());
        assert!(AdaptiveCurve::new(-999).unwrap().is_constant_product());
        assert_eq!(AdaptiveCurve::new(1_000).unwrap().q_ppm(), 1_000);
    }

    #[test]
    fn test_invariant() {
        assert_eq!(curve(0.0).invariant(100, 100).unwrap(), 10_000.0);
        assert_eq!(curve(1.0).invariant(300, 700).unwrap(), 1000.0);

        // (2 / 5000)^-1 = 2500
        let k = curve(-1.0).invariant(5000, 5000).unwrap();
        assert!((k - 2500.0).abs() < 1e-6);

        assert_eq!(
            curve(0.5).invariant(0, 100).unwrap_err(),
            Error::from(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn test_constant_product_swap() {
        // 1_000_000 / 1100 = 909.09.. -> pool keeps 910
        let out = curve(0.0).amount_out(1000, 1000, 100).unwrap();
        assert_eq!(out, 90);
    }

    #[test]
    fn test_power_curve_swaps() {
        // new_y = (2·√1000 − √1100)² ≈ 904.76
        assert_eq!(curve(0.5).amount_out(1000, 1000, 100).unwrap(), 95);
        // new_y = (2/√1000 − 1/√1100)^-2 ≈ 913.04
        assert_eq!(curve(-0.5).amount_out(1000, 1000, 100).unwrap(), 86);
        // Constant sum trades one for one
        assert_eq!(curve(1.0).amount_out(1000, 1000, 500).unwrap(), 500);
    }

    #[test]
    fn test_more_convex_curve_gives_less() {
        let mut last = u64::MAX;
        for q in [1.0, 0.5, 0.0, -0.5, -1.0] {
            let out = curve(q).amount_out(1_000_000, 1_000_000, 50_000).unwrap();
            assert!(out < last, "q = {q} gave {out}, previous {last}");
            last = out;
        }
    }

    #[test]
    fn test_swap_never_decreases_invariant() {
        for q in [-1.0, -0.5, 0.25, 0.5, 0.9] {
            let c = curve(q);
            let (x, y) = (1_000_000_000u64, 2_000_000_000u64);
            let k_before = c.invariant(x, y).unwrap();

            let dx = 10_000_000u64;
            let dy = c.amount_out(x, y, dx).unwrap();
            let k_after = c.invariant(x + dx, y - dy).unwrap();

            assert!(k_after >= k_before * (1.0 - 1e-12), "q = {q}");
        }
    }

    #[test]
    fn test_large_reserves_never_overpay() {
        // 1e18 + 63 is not representable in f64; a naive power difference
        // pays out the rounding error
        let (x, y) = (1_000_000_000_000_000_000u64, 1_000_000_000_000_000_063u64);
        for q in [-1.0, -0.5, 0.0, 0.25, 0.5, 0.9, 1.0] {
            for dx in [1u64, 1_000, 1_000_000] {
                let dy = curve(q).amount_out(x, y, dx).unwrap();
                assert!(dy <= dx, "q = {q}, sold {dx}, got {dy}");
            }
        }

        assert_eq!(curve(1.0).amount_out(x, y, 1).unwrap(), 1);
        assert!(curve(0.5).amount_out(x, y, 1).unwrap() <= 1);
    }

    #[test]
    fn test_large_reserves_stay_on_curve() {
        // Balanced pool near the top of the u64 range: price is 1, so the
        // output of a small trade can never exceed its input
        let r = u64::MAX / 4;
        for q in [-0.75, -0.25, 0.3, 0.7] {
            let dy = curve(q).amount_out(r, r, 1_000_000_000).unwrap();
            assert!(dy <= 1_000_000_000, "q = {q}");
            assert!(dy >= 999_000_000, "q = {q} gave {dy}");
        }
    }

    #[test]
    fn test_positive_q_runs_out_of_curve() {
        // x + y = 2000: selling 1000 more X leaves no Y on the curve
        assert_eq!(
            curve(1.0).amount_out(1000, 1000, 1000).unwrap_err(),
            Error::from(AmmError::InsufficientLiquidity)
        );
        assert_eq!(curve(1.0).amount_out(1000, 1000, 999).unwrap(), 999);

        // k^0.5 = 2·√1000: past 3000 the input alone exceeds k
        assert_eq!(
            curve(0.5).amount_out(1000, 1000, 3001).unwrap_err(),
            Error::from(AmmError::InsufficientLiquidity)
        );
        assert_eq!(curve(0.5).amount_out(1000, 1000, 2999).unwrap(), 999);
    }

    #[test]
    fn test_negative_q_never_drains() {
        let out = curve(-1.0).amount_out(1000, 1000, u64::MAX / 2).unwrap();
        assert!(out < 1000);
        // Asymptote is k = 500 on the Y side
        assert!(out <= 500);
    }

    #[test]
    fn test_zero_input_rejected() {
        assert_eq!(
            curve(0.0).amount_out(1000, 1000, 0).unwrap_err(),
            Error::from(AmmError::ZeroAmount)
        );
    }

    #[test]
    fn test_reserve_overflow_rejected() {
        assert_eq!(
            curve(0.5).amount_out(u64::MAX, 1000, 1).unwrap_err(),
            Error::from(AmmError::Overflow)
        );
    }

    #[test]
    fn test_balanced_spot_price_is_one() {
        for q in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            assert_eq!(
                curve(q).spot_price(5000, 5000).unwrap(),
                PRICE_SCALE as u64,
                "q = {q}"
            );
        }
    }

    #[test]
    fn test_spot_price_skewed() {
        // y / x = 2
        assert_eq!(curve(0.0).spot_price(1000, 2000).unwrap(), 2 * PRICE_SCALE as u64);
        // Constant sum: always 1
        assert_eq!(curve(1.0).spot_price(1000, 2000).unwrap(), PRICE_SCALE as u64);
        // q = -1: (y/x)^2 = 4
        let p = curve(-1.0).spot_price(1000, 2000).unwrap();
        assert!((p as f64 / PRICE_SCALE as f64 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_curve_sampling() {
        let ys = curve(0.0).curve_y(10_000.0, &[100.0, 200.0, 0.0]);
        assert_eq!(ys, vec![Some(100.0), Some(50.0), None]);

        // k = 2500 for q = -1; x below k has no partner
        let ys = curve(-1.0).trading_curve(5000, 5000, &[2000.0, 5000.0]).unwrap();
        assert_eq!(ys[0], None);
        assert!((ys[1].unwrap() - 5000.0).abs() < 1e-6);

        // k = 20000 for q = 0.5; x beyond k has no partner
        let ys = curve(0.5).trading_curve(5000, 5000, &[5000.0, 25_000.0]).unwrap();
        assert!((ys[0].unwrap() - 5000.0).abs() < 1e-6);
        assert_eq!(ys[1], None);
    }
}
