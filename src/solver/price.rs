//! Price matching: derive the post-swap price at which the holdings exactly
//! fill the range, then bisect the input amount until the pool lands there.

use crate::Q96;
use crate::error::ZapError;
use crate::math::price_math::{
    checked_sqrt, f64_to_u256, sqrt_price_x96_to_sqrt_price, u256_to_f64,
};
use crate::math::range_ratio::Direction;
use crate::position::PositionContext;
use crate::reader::QuoteOracle;
use crate::solver::bisect::{Step, bisect};
use crate::solver::{SolverConfig, SwapStrategy, Target, Termination, ZapPlan, quote_or_identity};
use alloy_primitives::U256;
use tracing::{debug, trace, warn};

#[derive(Copy, Clone, Debug, Default)]
pub struct PriceMatching;

/// Coefficients of `a·d² + b·d + c = 0` in the displacement `d = s - sc` of
/// the raw post-swap sqrt price `s` from the current one.
///
/// `c` is `sc` times the imbalance of the untouched holdings, taken straight
/// from the balances rather than from liquidity-sized terms.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    /// Balance condition for depositing everything into `[sl, su]` after a
    /// single-range swap with liquidity `L` from `sc`, fee taken from input.
    ///
    /// All quantities are raw: sqrt prices as `sqrtX96 / 2^96`, amounts and
    /// liquidity in base units. `f = 1 / (1 - fee)` scales the input side.
    pub fn for_swap(ctx: &PositionContext) -> Self {
        let liquidity = ctx.pool.liquidity as f64;
        let fee = ctx.pool.fee_ppm as f64 / 1e6;
        let f = 1.0 / (1.0 - fee);
        let fl = f * liquidity;

        let sc = sqrt_price_x96_to_sqrt_price(ctx.pool.sqrt_price_x96);
        let sl = sqrt_price_x96_to_sqrt_price(ctx.sqrt_price_lower_x96);
        let su = sqrt_price_x96_to_sqrt_price(ctx.sqrt_price_upper_x96);
        let amount0 = u256_to_f64(ctx.amount0);
        let amount1 = u256_to_f64(ctx.amount1);

        // a·s² + b·s + c over the sqrt price itself
        let (a, b) = match ctx.direction {
            Direction::OneForZero => (
                amount0 + liquidity / sc - fl / su,
                fl - liquidity - sl * amount0 - liquidity * sl / sc
                    + amount1 / su
                    + fl * sc / su,
            ),
            Direction::ZeroForOne => (
                amount0 + fl / sc - liquidity / su,
                -fl + liquidity - sl * amount0 - fl * sl / sc
                    + amount1 / su
                    + liquidity * sc / su,
            ),
        };

        Self {
            a,
            b: 2.0 * a * sc + b,
            c: sc * (amount0 * (sc - sl) - amount1 * (1.0 / sc - 1.0 / su)),
        }
    }

    /// The `(-b + √(b² - 4ac)) / 2a` root, evaluated without cancellation.
    pub fn root(&self) -> Result<f64, ZapError> {
        if self.a == 0.0 || !self.a.is_finite() {
            return Err(ZapError::NumericDomain("degenerate quadratic: a is zero"));
        }
        let discriminant = checked_sqrt(self.b * self.b - 4.0 * self.a * self.c)?;
        let root = if self.b > 0.0 {
            -2.0 * self.c / (self.b + discriminant)
        } else {
            (-self.b + discriminant) / (2.0 * self.a)
        };

        if !root.is_finite() {
            return Err(ZapError::NumericDomain("quadratic root is not finite"));
        }
        Ok(root)
    }
}

/// Raw sqrt price the pool should end at for a balanced deposit.
pub fn target_sqrt_price(ctx: &PositionContext) -> Result<f64, ZapError> {
    let quadratic = Quadratic::for_swap(ctx);
    trace!(target: "zap::price", ?quadratic, "target coefficients");

    let target = sqrt_price_x96_to_sqrt_price(ctx.pool.sqrt_price_x96) + quadratic.root()?;
    if !(target > 0.0) {
        return Err(ZapError::NumericDomain("target sqrt price is not positive"));
    }
    Ok(target)
}

/// The target as a Q64.96 value, offset from the exact current price.
fn target_sqrt_price_x96(ctx: &PositionContext, target: f64) -> Result<U256, ZapError> {
    let current = ctx.pool.sqrt_price_x96;
    let displacement = target - sqrt_price_x96_to_sqrt_price(current);
    let offset = f64_to_u256(displacement.abs() * u256_to_f64(Q96))?;

    if displacement < 0.0 {
        current
            .checked_sub(offset)
            .ok_or(ZapError::NumericDomain("target sqrt price is not positive"))
    } else {
        current
            .checked_add(offset)
            .ok_or(ZapError::NumericDomain("target sqrt price overflows"))
    }
}

impl SwapStrategy for PriceMatching {
    fn solve(
        &self,
        ctx: &PositionContext,
        oracle: &dyn QuoteOracle,
        config: &SolverConfig,
    ) -> Result<ZapPlan, ZapError> {
        let direction = ctx.direction;
        let total = ctx.held_in();
        let current = ctx.pool.sqrt_price_x96;

        if total.is_zero() {
            debug!(target: "zap::price", "nothing to swap");
            let current = sqrt_price_x96_to_sqrt_price(current);
            return Ok(ZapPlan::no_op(ctx, Target::SqrtPrice(current)));
        }

        let target = target_sqrt_price(ctx).inspect_err(|err| {
            warn!(target: "zap::price", %err, "no target price");
        })?;
        let target_x96 = target_sqrt_price_x96(ctx, target)?;
        // the tolerance is a share of the way the price still has to move
        let distance = u256_to_f64(target_x96.abs_diff(current));
        debug!(target: "zap::price", ?direction, %total, target, %target_x96, "solve start");

        let mut quote = ctx.identity_quote();

        let outcome = bisect(total, total >> 1, config, |amount| {
            quote = quote_or_identity(ctx, oracle, amount)?;
            let after = quote.sqrt_price_after_x96;
            let miss = u256_to_f64(after.abs_diff(target_x96));
            trace!(target: "zap::price", %amount, %after, miss, distance, "candidate");

            if after == target_x96 || miss <= config.relative_tolerance * distance {
                return Ok(Step::Converged(Termination::WithinTolerance));
            }

            let slack = price_slack(amount, current, after, miss);
            // selling token0 pushes the price down, selling token1 pushes it up
            let overshot = match direction {
                Direction::ZeroForOne => after < target_x96,
                Direction::OneForZero => after > target_x96,
            };
            Ok(if overshot {
                Step::Lower { slack }
            } else {
                Step::Raise { slack }
            })
        })?;

        debug!(
            target: "zap::price",
            amount = %outcome.amount,
            iterations = outcome.iterations,
            termination = ?outcome.termination,
            "solve done"
        );

        Ok(ZapPlan {
            amount_in: outcome.amount,
            direction,
            tick_lower: ctx.tick_lower,
            tick_upper: ctx.tick_upper,
            target: Target::SqrtPrice(target),
            quote,
            iterations: outcome.iterations,
            termination: outcome.termination,
        })
    }
}

/// Input units separating `amount` from the target, from the price move per
/// unit the quote shows. The average move is scaled by the price ratio so a
/// flattening curve is not overstated.
fn price_slack(amount: U256, current: U256, after: U256, miss: f64) -> f64 {
    if amount.is_zero() {
        // nothing swapped; an exhausted bracket here puts the target below one unit
        return 0.0;
    }
    let moved = u256_to_f64(after.abs_diff(current));
    let (current, after) = (u256_to_f64(current), u256_to_f64(after));
    let per_unit = moved / u256_to_f64(amount) * current.min(after) / current.max(after);

    // one Q96 step of rounding in the quote
    ((miss - 1.0) / per_unit).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;
    use crate::pool::chain::SimulatedChain;
    use crate::pool::v3_pool::V3Pool;
    use crate::reader::{Readers, Slot0};
    use alloy_primitives::{Address, address};
    use approx::assert_relative_eq;

    const POOL: Address = address!("0x1000000000000000000000000000000000000000");
    const TOKEN0: Address = address!("0x0000000000000000000000000000000000000001");
    const TOKEN1: Address = address!("0x0000000000000000000000000000000000000002");

    fn chain() -> SimulatedChain {
        let mut pool = V3Pool::new(POOL, TOKEN0, TOKEN1, 3000);
        pool.slot0 = Slot0 {
            sqrt_price_x96: get_sqrt_ratio_at_tick(-123000).unwrap(),
            tick: -123000,
        };
        pool.liquidity = 100_000_000_000_000_000u128;
        pool.tick_spacing = 200;

        let mut chain = SimulatedChain::default();
        chain.add_token(TOKEN0, 18);
        chain.add_token(TOKEN1, 18);
        chain.add_pool(pool);
        chain
    }

    fn ctx(chain: &SimulatedChain, amount: U256, direction: Direction) -> PositionContext {
        PositionContext::from_ticks(
            &Readers::uniform(chain),
            POOL,
            -124800,
            -122600,
            amount,
            direction,
        )
        .unwrap()
    }

    fn one_eth() -> U256 {
        U256::from(1_000_000_000_000_000_000u128)
    }

    #[test]
    fn target_lies_inside_range_and_below_current_for_zero_for_one() {
        let chain = chain();
        let ctx = ctx(&chain, one_eth(), Direction::ZeroForOne);

        let target = target_sqrt_price(&ctx).unwrap();
        let current = sqrt_price_x96_to_sqrt_price(ctx.pool.sqrt_price_x96);

        assert!(target < current);
        assert!(target > sqrt_price_x96_to_sqrt_price(ctx.sqrt_price_lower_x96));
        // about 1.43% below the current sqrt price
        assert_relative_eq!(target / current, 0.98573, max_relative = 1e-4);
    }

    #[test]
    fn target_lies_above_current_for_one_for_zero() {
        let chain = chain();
        let ctx = ctx(&chain, U256::from(10_000_000_000_000u128), Direction::OneForZero);

        let target = target_sqrt_price(&ctx).unwrap();
        let current = sqrt_price_x96_to_sqrt_price(ctx.pool.sqrt_price_x96);

        assert!(target > current);
        assert!(target < sqrt_price_x96_to_sqrt_price(ctx.sqrt_price_upper_x96));
    }

    #[test]
    fn converges_to_target_price() {
        let chain = chain();
        let ctx = ctx(&chain, one_eth(), Direction::ZeroForOne);
        let config = SolverConfig::default();

        let plan = PriceMatching.solve(&ctx, &chain, &config).unwrap();
        let Target::SqrtPrice(target) = plan.target else {
            panic!("price solver reports a price target");
        };
        let after = sqrt_price_x96_to_sqrt_price(plan.quote.sqrt_price_after_x96);

        assert!(matches!(
            plan.termination,
            Termination::WithinTolerance | Termination::Resolved
        ));
        assert_relative_eq!(after, target, max_relative = 1e-8);
        // ceil(log2(1e18))
        assert!(plan.iterations <= 60);
        // ~6.806e17 of the 1e18 is sold
        assert_relative_eq!(u256_to_f64(plan.amount_in), 6.806e17, max_relative = 1e-3);
    }

    #[test]
    fn small_and_large_holdings_end_balanced() {
        let chain = chain();
        let config = SolverConfig::default();

        for amount in [
            10_000_000_000u128,
            1_000_000_000_000,
            100_000_000_000_000,
            10_000_000_000_000_000,
            1_000_000_000_000_000_000,
        ] {
            let ctx = ctx(&chain, U256::from(amount), Direction::ZeroForOne);
            let plan = PriceMatching.solve(&ctx, &chain, &config).unwrap();

            let required = ctx
                .range_ratio_at(plan.quote.sqrt_price_after_x96)
                .unwrap()
                .for_direction(Direction::ZeroForOne);
            let actual = ctx.ratio_after(plan.amount_in, plan.quote.amount_out);
            // one unit of output is the finest the deposit can be balanced
            let granularity = 2.0 / u256_to_f64(plan.quote.amount_out);
            assert!(
                (actual / required - 1.0).abs() <= 1e-6 + granularity,
                "{amount}: actual {actual} required {required} after {} iterations",
                plan.iterations
            );
            assert!(plan.iterations as f64 <= (amount as f64).log2().ceil());
        }
    }

    #[test]
    fn shifted_root_matches_textbook_root() {
        let chain = chain();
        let ctx = ctx(&chain, one_eth(), Direction::ZeroForOne);
        let shifted = Quadratic::for_swap(&ctx);
        let sc = sqrt_price_x96_to_sqrt_price(ctx.pool.sqrt_price_x96);

        // back to a·s² + b·s + c over the sqrt price itself
        let (a, b) = (shifted.a, shifted.b - 2.0 * shifted.a * sc);
        let c = shifted.c - shifted.a * sc * sc - b * sc;
        let textbook = (-b + (b * b - 4.0 * a * c).sqrt()) / (2.0 * a);

        assert_relative_eq!(target_sqrt_price(&ctx).unwrap(), textbook, max_relative = 1e-9);
    }

    #[test]
    fn one_for_zero_converges() {
        let chain = chain();
        let ctx = ctx(&chain, U256::from(10_000_000_000_000u128), Direction::OneForZero);

        let plan = PriceMatching
            .solve(&ctx, &chain, &SolverConfig::default())
            .unwrap();

        assert_eq!(plan.direction, Direction::OneForZero);
        assert_relative_eq!(u256_to_f64(plan.amount_in), 1.30694e12, max_relative = 1e-3);
    }

    #[test]
    fn zero_holdings_is_a_no_op() {
        let chain = chain();
        let ctx = ctx(&chain, U256::ZERO, Direction::OneForZero);

        let plan = PriceMatching
            .solve(&ctx, &chain, &SolverConfig::default())
            .unwrap();
        assert_eq!(plan.termination, Termination::NoOp);
        assert_eq!(chain.quote_count(), 0);
    }

    #[test]
    fn degenerate_quadratic_is_rejected() {
        assert!(matches!(
            Quadratic { a: 0.0, b: 1.0, c: 1.0 }.root(),
            Err(ZapError::NumericDomain(_))
        ));
        // b² - 4ac < 0
        assert!(matches!(
            Quadratic { a: 1.0, b: 0.0, c: 1.0 }.root(),
            Err(ZapError::NumericDomain(_))
        ));
    }
}
