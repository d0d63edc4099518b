//! # Automated Market Maker (AMM) Module
//!
//! Pricing for the adaptive pool: a power-mean trading curve whose
//! curvature `q` is tuned by a keeper, plus the LP share and fee math.
//!
//! ```text
//!            x^q + y^q = k^q
//!
//!   ┌────────────────────────────────────────┐
//!   │             Reserve Space              │
//!   │                                         │
//!   │     Y ▲                                │
//!   │       │╲        q = -1 (steep)         │
//!   │       │ ╲╲                              │
//!   │       │  ╲ ╲_   q = 0  (x·y = k)       │
//!   │       │   ╲  ╲__                        │
//!   │       │    ╲    ╲___ q = 1 (x + y = k) │
//!   │       └──────────────────▶ X           │
//!   │                                         │
//!   │  All curves pass through the current   │
//!   │  reserves when the keeper changes q    │
//!   └────────────────────────────────────────┘
//! ```

pub mod adaptive_curve;
pub mod liquidity;

pub use adaptive_curve::*;
pub use liquidity::*;
