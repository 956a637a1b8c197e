//! Zap-in swap amount solver for Uniswap V3–style concentrated liquidity.
//!
//! Before depositing into a price range, an imbalanced holding has to be
//! partly swapped so the remaining balances match the ratio the range
//! demands at the *post-swap* price. Because the swap itself moves the price,
//! the amount is found by repeatedly quoting hypothetical swaps.
//!
//! This crate exposes:
//! - Price and ratio math (`math::*`) for ticks, sqrt prices and ranges.
//! - Two solving strategies (`solver::*`): ratio matching and price matching.
//! - `PositionContext` resolution for explicit ranges, percentage bands and
//!   existing positions, and the `Zapper` entry points on top of it.
//! - A deterministic in-memory pool (`pool::*`) that quotes with exact
//!   on-chain integer math, useful offline and in tests.
//! - Optional `onchain` readers backed by alloy contract bindings.
//!
//! # Examples
//!
//! ```no_run
//! use clmm_zap_math::{
//!     Direction, Readers, SimulatedChain, SolverConfig, Strategy, V3Pool, Zapper, U256,
//!     math::tick_math::get_sqrt_ratio_at_tick,
//! };
//! # let pool_address = clmm_zap_math::Address::repeat_byte(0x10);
//! # let token0 = clmm_zap_math::Address::repeat_byte(0x01);
//! # let token1 = clmm_zap_math::Address::repeat_byte(0x02);
//!
//! let mut pool = V3Pool::new(pool_address, token0, token1, 3000);
//! pool.slot0.sqrt_price_x96 = get_sqrt_ratio_at_tick(-123000).unwrap();
//! pool.slot0.tick = -123000;
//! pool.liquidity = 100_000_000_000_000_000u128;
//! pool.tick_spacing = 200;
//!
//! let mut chain = SimulatedChain::default();
//! chain.add_token(token0, 18);
//! chain.add_token(token1, 18);
//! chain.add_pool(pool);
//!
//! let zapper = Zapper::new(Readers::uniform(&chain), Strategy::RatioMatching, SolverConfig::default());
//! let plan = zapper
//!     .swap_for_range(
//!         pool_address,
//!         -124800,
//!         -122600,
//!         U256::from(1_000_000_000_000_000_000u128),
//!         Direction::ZeroForOne,
//!     )
//!     .unwrap();
//! println!("swap {} ({:?})", plan.amount_in, plan.direction);
//! ```

pub use alloy_primitives::{Address, U256};

pub mod error;
mod hash;
pub mod math;
#[cfg(feature = "onchain")]
pub mod onchain;
pub mod pool;
pub mod position;
pub mod reader;
pub mod solver;
pub mod zapper;

pub use error::{ConvergenceFailure, ZapError};
pub use hash::FastMap;
pub use pool::chain::SimulatedChain;
pub use pool::v3_pool::V3Pool;
pub use position::{BalanceSource, PositionContext};
pub use reader::{PoolState, Quote, Readers, TokenInfo};
pub use solver::{Direction, SolverConfig, Strategy, SwapStrategy, Termination, ZapPlan};
pub use zapper::Zapper;

const U256_1: U256 = U256::from_limbs([1, 0, 0, 0]);

const U160_MAX: U256 = U256::from_limbs([0, 0, 4294967296, 0]);
const U256_E6: U256 = U256::from_limbs([1000000, 0, 0, 0]);

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
