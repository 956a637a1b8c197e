//! Floating-point views of on-chain prices and amounts.
//!
//! The solvers compare and combine prices in `f64`; everything that crosses
//! from raw Q64.96 / raw token units into that space goes through here so the
//! decimal shift is applied in one place.

use crate::Q96;
use crate::error::ZapError;
use crate::math::tick_math::get_sqrt_ratio_at_tick;
use alloy_primitives::U256;

const TWO_POW_64: f64 = 18446744073709551616.0;

/// Lossy conversion of a 256-bit integer to the nearest `f64`.
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * TWO_POW_64 + *limb as f64)
}

/// Converts a non-negative finite `f64` amount to raw units, truncating the
/// fractional part. Values above `u128::MAX` saturate.
pub fn f64_to_u256(value: f64) -> Result<U256, ZapError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ZapError::NumericDomain("amount must be finite and non-negative"));
    }
    Ok(U256::from(value as u128))
}

/// Square root that refuses to silently produce `NaN`.
pub fn checked_sqrt(value: f64) -> Result<f64, ZapError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ZapError::NumericDomain("square root of a negative or non-finite value"));
    }
    Ok(value.sqrt())
}

/// `sqrt_price_x96 / 2^96`: the sqrt of the raw price.
pub fn sqrt_price_x96_to_sqrt_price(sqrt_price_x96: U256) -> f64 {
    u256_to_f64(sqrt_price_x96) / u256_to_f64(Q96)
}

/// Raw price (token1 raw units per token0 raw unit) from a Q64.96 sqrt price.
pub fn sqrt_price_x96_to_price(sqrt_price_x96: U256) -> f64 {
    let sqrt_price = sqrt_price_x96_to_sqrt_price(sqrt_price_x96);
    sqrt_price * sqrt_price
}

/// Q64.96 sqrt price at `tick`, exactly as the pool computes it.
pub fn tick_to_sqrt_price_x96(tick: i32) -> Result<U256, ZapError> {
    Ok(get_sqrt_ratio_at_tick(tick)?)
}

/// Conversion between raw on-chain prices and human-comparable prices for a
/// token pair, `10^(decimals0 - decimals1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecimalShift {
    factor: f64,
}

impl DecimalShift {
    pub fn new(decimals0: u8, decimals1: u8) -> Self {
        let exponent = decimals0 as i32 - decimals1 as i32;
        Self {
            factor: 10f64.powi(exponent),
        }
    }

    /// The multiplier applied to raw prices.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Raw price to human price (token1 per token0).
    pub fn to_human(&self, raw_price: f64) -> f64 {
        raw_price * self.factor
    }

    /// Human price for a Q64.96 sqrt price.
    pub fn price_at(&self, sqrt_price_x96: U256) -> f64 {
        self.to_human(sqrt_price_x96_to_price(sqrt_price_x96))
    }

    /// Human price at a tick.
    pub fn price_at_tick(&self, tick: i32) -> Result<f64, ZapError> {
        Ok(self.price_at(tick_to_sqrt_price_x96(tick)?))
    }

    /// Ratio of two raw amounts, `token0 / token1`, in human units.
    pub fn amount_ratio_0_per_1(&self, amount0: f64, amount1: f64) -> f64 {
        amount0 / amount1 / self.factor
    }

    /// Ratio of two raw amounts, `token1 / token0`, in human units.
    pub fn amount_ratio_1_per_0(&self, amount1: f64, amount0: f64) -> f64 {
        amount1 / amount0 * self.factor
    }
}
