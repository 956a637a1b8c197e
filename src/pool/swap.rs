use crate::U256_1;
use crate::error::{Error, SwapError};
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};
use crate::pool::v3_pool::V3Pool;
use crate::reader::Quote;
use alloy_primitives::U256;

/// Exact-input swap outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    pub amount_in: U256,
    pub amount_out: U256,
    pub sqrt_price_after_x96: U256,
}

impl From<SwapResult> for Quote {
    fn from(result: SwapResult) -> Self {
        Quote {
            amount_out: result.amount_out,
            sqrt_price_after_x96: result.sqrt_price_after_x96,
        }
    }
}

impl V3Pool {
    /// Swaps `amount_in` against the active range with no price limit
    /// beyond the global sqrt ratio bounds.
    ///
    /// The pool holds a single range, so unlike a full tick walk the
    /// liquidity never changes mid-swap.
    pub fn swap_exact_input(&self, zero_for_one: bool, amount_in: U256) -> Result<SwapResult, Error> {
        if amount_in.is_zero() {
            return Err(Error::SwapError(SwapError::AmountSpecifiedIsZero));
        }
        if self.liquidity == 0 {
            return Err(Error::SwapError(SwapError::LiquidityIsZero));
        }

        let sqrt_price_limit_x96 = if zero_for_one {
            MIN_SQRT_RATIO + U256_1
        } else {
            MAX_SQRT_RATIO - U256_1
        };

        let step = compute_swap_step(
            self.slot0.sqrt_price_x96,
            sqrt_price_limit_x96,
            self.liquidity,
            amount_in,
            self.fee_pips,
        )?;

        Ok(SwapResult {
            amount_in: step.amount_in + step.fee_amount,
            amount_out: step.amount_out,
            sqrt_price_after_x96: step.sqrt_price_next_x96,
        })
    }

    /// [`V3Pool::swap_exact_input`] reduced to what a quoter reports.
    pub fn quote_exact_input(&self, zero_for_one: bool, amount_in: U256) -> Result<Quote, Error> {
        self.swap_exact_input(zero_for_one, amount_in).map(Quote::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;
    use crate::reader::Slot0;
    use alloy_primitives::address;
    use std::str::FromStr;

    fn make_basic_pool(tick: i32, liquidity: u128, fee_pips: u32) -> V3Pool {
        let pool_address = address!("0x1000000000000000000000000000000000000000");
        let token0 = address!("0x0000000000000000000000000000000000000001");
        let token1 = address!("0x0000000000000000000000000000000000000002");

        let mut pool = V3Pool::new(pool_address, token0, token1, fee_pips);
        pool.slot0 = Slot0 {
            sqrt_price_x96: get_sqrt_ratio_at_tick(tick).unwrap(),
            tick,
        };
        pool.liquidity = liquidity;
        pool.tick_spacing = 1;
        pool
    }

    #[test]
    fn swap_rejects_zero_amount() {
        let pool = make_basic_pool(0, 1_000_000u128, 3000);

        match pool.swap_exact_input(true, U256::ZERO).unwrap_err() {
            Error::SwapError(SwapError::AmountSpecifiedIsZero) => {}
            other => panic!("expected AmountSpecifiedIsZero, got: {:?}", other),
        }
    }

    #[test]
    fn swap_rejects_empty_pool() {
        let pool = make_basic_pool(0, 0, 3000);

        match pool.swap_exact_input(false, U256::from(1_000u64)).unwrap_err() {
            Error::SwapError(SwapError::LiquidityIsZero) => {}
            other => panic!("expected LiquidityIsZero, got: {:?}", other),
        }
    }

    #[test]
    fn fee_free_swap_matches_sqrt_price_math() {
        let pool = make_basic_pool(0, 1e18 as u128, 0);

        let result = pool
            .swap_exact_input(false, U256::from(100000000000000000u128))
            .unwrap();

        assert_eq!(
            result.sqrt_price_after_x96,
            U256::from_str("87150978765690771352898345369").unwrap()
        );
        assert_eq!(result.amount_in, U256::from(100000000000000000u128));
        assert_eq!(result.amount_out, U256::from(90909090909090909u128));
    }

    #[test]
    fn price_moves_with_direction() {
        let pool = make_basic_pool(-123000, 100_000_000_000_000_000u128, 3000);
        let start = pool.slot0.sqrt_price_x96;
        let amount = U256::from(1_000_000_000_000_000u128);

        let down = pool.quote_exact_input(true, amount).unwrap();
        assert!(down.sqrt_price_after_x96 < start);
        assert!(down.amount_out > U256::ZERO);

        let up = pool.quote_exact_input(false, amount).unwrap();
        assert!(up.sqrt_price_after_x96 > start);
        assert!(up.amount_out > U256::ZERO);
    }

    #[test]
    fn whole_input_is_spent_including_fee() {
        let pool = make_basic_pool(-123000, 100_000_000_000_000_000u128, 3000);
        let amount = U256::from(500_000_000_000_000_000u128);

        let result = pool.swap_exact_input(true, amount).unwrap();
        assert_eq!(result.amount_in, amount);

        let fee_free = make_basic_pool(-123000, 100_000_000_000_000_000u128, 0)
            .swap_exact_input(true, amount)
            .unwrap();
        assert!(result.amount_out < fee_free.amount_out);
        assert!(result.sqrt_price_after_x96 > fee_free.sqrt_price_after_x96);
    }

    #[test]
    fn larger_inputs_move_price_further() {
        let pool = make_basic_pool(-123000, 100_000_000_000_000_000u128, 3000);

        let mut previous = pool.slot0.sqrt_price_x96;
        for exp in [15u32, 16, 17, 18] {
            let quote = pool
                .quote_exact_input(true, U256::from(10u128.pow(exp)))
                .unwrap();
            assert!(quote.sqrt_price_after_x96 < previous);
            previous = quote.sqrt_price_after_x96;
        }
    }
}
