//! Global Protocol Configuration
//!
//! This account stores protocol-wide settings that apply to all pools.

use anchor_lang::prelude::*;

use crate::amm::AdaptiveCurve;
use crate::instructions::CreatePoolError;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol administrator with special privileges
    pub admin: Pubkey,

    /// Authority allowed to adapt the curvature of every pool
    /// This could be:
    /// - A Chainlink Automation (keeper) forwarder
    /// - A multisig
    /// - An off-chain volatility model's wallet
    pub keeper: Pubkey,

    /// Swap fee given to new pools, in basis points
    pub default_fee_bps: u16,

    /// Minimum amount of each token required to fund a pool
    pub min_liquidity: u64,

    /// Total pools created (used as incrementing ID)
    pub pool_count: u64,

    /// PDA bump seed
    pub bump: u8,

    /// Whether the protocol is paused
    pub paused: bool,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";

    pub fn is_keeper(&self, signer: &Pubkey) -> bool {
        self.keeper == *signer
    }

    /// Reserve the next pool id for a `mint_x` / `mint_y` pool with curvature `q_ppm`
    ///
    /// Returns the id and the validated curve; the pool counter moves on.
    pub fn register_pool(
        &mut self,
        mint_x: &Pubkey,
        mint_y: &Pubkey,
        q_ppm: i64,
    ) -> Result<(u64, AdaptiveCurve)> {
        require!(!self.paused, CreatePoolError::ProtocolPaused);
        require_keys_neq!(*mint_x, *mint_y, CreatePoolError::IdenticalMints);

        let curve = AdaptiveCurve::new(q_ppm)?;
        let pool_id = self.pool_count;
        self.pool_count = pool_id.checked_add(1).ok_or(CreatePoolError::Overflow)?;

        Ok((pool_id, curve))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::AmmError;
    use anchor_lang::error::Error;

    fn config() -> Config {
        Config {
            admin: Pubkey::new_unique(),
            keeper: Pubkey::new_unique(),
            default_fee_bps: 30,
            min_liquidity: 1_000,
            pool_count: 0,
            bump: 255,
            paused: false,
        }
    }

    #[test]
    fn test_only_keeper_matches() {
        let c = config();
        assert!(c.is_keeper(&c.keeper));
        assert!(!c.is_keeper(&c.admin));
        assert!(!c.is_keeper(&Pubkey::new_unique()));
    }

    #[test]
    fn test_register_pool_assigns_sequential_ids() {
        let mut c = config();
        let (x, y) = (Pubkey::new_unique(), Pubkey::new_unique());

        let (id, curve) = c.register_pool(&x, &y, -500_000).unwrap();
        assert_eq!((id, curve.q_ppm()), (0, -500_000));

        let (id, curve) = c.register_pool(&y, &x, 500).unwrap();
        assert_eq!(id, 1);
        assert!(curve.is_constant_product());
        assert_eq!(c.pool_count, 2);
    }

    #[test]
    fn test_register_pool_rejections_keep_counter() {
        let mut c = config();
        let (x, y) = (Pubkey::new_unique(), Pubkey::new_unique());

        assert_eq!(
            c.register_pool(&x, &x, 0).unwrap_err(),
            Error::from(CreatePoolError::IdenticalMints)
        );
        assert_eq!(
            c.register_pool(&x, &y, 2_000_000).unwrap_err(),
            Error::from(AmmError::InvalidCurvature)
        );

        c.paused = true;
        assert_eq!(
            c.register_pool(&x, &y, 0).unwrap_err(),
            Error::from(CreatePoolError::ProtocolPaused)
        );
        assert_eq!(c.pool_count, 0);
    }
}
