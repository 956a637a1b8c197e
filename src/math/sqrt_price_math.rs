use crate::math::math_helpers::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::{
    Q96, RESOLUTION, U160_MAX,
    error::{Error, MathError, StateError},
};
use alloy_primitives::U256;

/// Next sqrt price after adding `amount` of token0, rounded up so the pool
/// never gives away more token1 than the input pays for.
fn next_sqrt_price_from_amount_0_in(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256, Error> {
    if amount.is_zero() {
        return Ok(sqrt_p_x96);
    }

    let numerator1: U256 = U256::from(liquidity) << RESOLUTION;
    let (product, overflowed) = amount.overflowing_mul(sqrt_p_x96);

    if !overflowed {
        let (denominator, wrapped) = numerator1.overflowing_add(product);
        if !wrapped {
            return Ok(mul_div_rounding_up(numerator1, sqrt_p_x96, denominator)?);
        }
    }

    // L / (L / √P + amount), cheaper precision but never overflows
    let denominator = (numerator1 / sqrt_p_x96)
        .checked_add(amount)
        .ok_or(MathError::Overflow)?;
    Ok(div_rounding_up(numerator1, denominator))
}

/// Next sqrt price after adding `amount` of token1, rounded down.
fn next_sqrt_price_from_amount_1_in(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256, Error> {
    let liquidity = U256::from(liquidity);
    let quotient: U256 = if amount <= U160_MAX {
        (amount << RESOLUTION) / liquidity
    } else {
        mul_div(amount, Q96, liquidity)?
    };

    match sqrt_p_x96.checked_add(quotient) {
        Some(result) if result <= U160_MAX => Ok(result),
        _ => Err(MathError::Overflow.into()),
    }
}

/// Sqrt price reached by swapping `amount_in` into a single liquidity
/// range, before any fee is taken.
pub fn get_next_sqrt_price_from_input(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if sqrt_p_x96.is_zero() {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if liquidity == 0 {
        return Err(StateError::LiquidityIsZero.into());
    }

    if zero_for_one {
        next_sqrt_price_from_amount_0_in(sqrt_p_x96, liquidity, amount_in)
    } else {
        next_sqrt_price_from_amount_1_in(sqrt_p_x96, liquidity, amount_in)
    }
}

/// token0 held by `liquidity` between two sqrt prices.
pub fn get_amount_0_delta(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    if sqrt_ratio_a_x96.is_zero() {
        return Err(StateError::SqrtRatioIsZero.into());
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = sqrt_ratio_b_x96 - sqrt_ratio_a_x96;

    if round_up {
        Ok(div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_b_x96)?,
            sqrt_ratio_a_x96,
        ))
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_ratio_b_x96)? / sqrt_ratio_a_x96)
    }
}

/// token1 held by `liquidity` between two sqrt prices.
pub fn get_amount_1_delta(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };
    let liquidity = U256::from(liquidity);

    if round_up {
        mul_div_rounding_up(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    } else {
        mul_div(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    }
}
