use crate::U256_E6;
use crate::error::Error;
use crate::math::math_helpers::{mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{
    get_amount_0_delta, get_amount_1_delta, get_next_sqrt_price_from_input,
};
use alloy_primitives::U256;

/// Outcome of one exact-input swap step within a single liquidity range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next_x96: U256,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
}

/// Swaps `amount_remaining` in, stopping at `sqrt_price_target_x96` if the
/// range runs out first. `fee_pips` is in millionths.
///
/// Direction follows from the target: below the current price means
/// token0 in.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: U256,
    fee_pips: u32,
) -> Result<SwapStep, Error> {
    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let fee = U256::from(fee_pips);

    let amount_remaining_less_fee = mul_div(amount_remaining, U256_E6 - fee, U256_E6)?;

    let max_in = if zero_for_one {
        get_amount_0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)?
    } else {
        get_amount_1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)?
    };

    let reached_target = amount_remaining_less_fee >= max_in;
    let sqrt_price_next_x96 = if reached_target {
        sqrt_price_target_x96
    } else {
        get_next_sqrt_price_from_input(
            sqrt_price_current_x96,
            liquidity,
            amount_remaining_less_fee,
            zero_for_one,
        )?
    };

    let (amount_in, amount_out) = if zero_for_one {
        let amount_in = if reached_target {
            max_in
        } else {
            get_amount_0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, true)?
        };
        let amount_out =
            get_amount_1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)?;
        (amount_in, amount_out)
    } else {
        let amount_in = if reached_target {
            max_in
        } else {
            get_amount_1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, true)?
        };
        let amount_out =
            get_amount_0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)?;
        (amount_in, amount_out)
    };

    // short of the target, swap dust stays with the pool as fee
    let fee_amount = if sqrt_price_next_x96 != sqrt_price_target_x96 {
        amount_remaining - amount_in
    } else {
        mul_div_rounding_up(amount_in, fee, U256_E6 - fee)?
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}
