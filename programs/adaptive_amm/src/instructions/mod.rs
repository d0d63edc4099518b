//! Instruction handlers for the adaptive market maker
//!
//! Each instruction represents an action users can take:
//! - `initialize` - Set up the protocol (admin only, once)
//! - `create_pool` - Create and fund a new pool (permissionless, 4 steps)
//! - `add_liquidity` / `remove_liquidity` - Provide or withdraw liquidity
//! - `swap` - Trade X for Y or Y for X along the curve
//! - `update_curve` - Adapt a pool's curvature (keeper only)
//! - `admin` - Keeper rotation, pool fees, pause switch

pub mod add_liquidity;
pub mod admin;
pub mod create_pool;
pub mod initialize;
pub mod remove_liquidity;
pub mod swap;
pub mod update_curve;

pub use add_liquidity::*;
pub use admin::*;
pub use create_pool::*;
pub use initialize::*;
pub use remove_liquidity::*;
pub use swap::*;
pub use update_curve::*;
