//! Ratio matching: swap until the holdings ratio equals the ratio the range
//! requires at the post-swap price.

use crate::error::ZapError;
use crate::math::price_math::{f64_to_u256, sqrt_price_x96_to_price, u256_to_f64};
use crate::math::range_ratio::Direction;
use crate::position::PositionContext;
use crate::reader::QuoteOracle;
use crate::solver::bisect::{Step, bisect};
use crate::solver::{SolverConfig, SwapStrategy, Target, Termination, ZapPlan, quote_or_identity};
use alloy_primitives::U256;
use tracing::{debug, trace};

#[derive(Copy, Clone, Debug, Default)]
pub struct RatioMatching;

impl SwapStrategy for RatioMatching {
    fn solve(
        &self,
        ctx: &PositionContext,
        oracle: &dyn QuoteOracle,
        config: &SolverConfig,
    ) -> Result<ZapPlan, ZapError> {
        let direction = ctx.direction;
        let total = ctx.held_in();
        let initial = ctx
            .range_ratio_at(ctx.pool.sqrt_price_x96)?
            .for_direction(direction);

        debug!(target: "zap::ratio", ?direction, %total, required = initial, "solve start");
        if total.is_zero() {
            debug!(target: "zap::ratio", "nothing to swap");
            return Ok(ZapPlan::no_op(ctx, Target::Ratio(initial)));
        }

        let start = initial_estimate(ctx, initial)?;

        let mut quote = ctx.identity_quote();
        let mut required = initial;
        let mut previous: Option<f64> = None;

        let outcome = bisect(total, start, config, |amount| {
            quote = quote_or_identity(ctx, oracle, amount)?;

            // past the bound the range holds only the input token: too much sold
            if !ctx.in_range(quote.sqrt_price_after_x96) {
                trace!(target: "zap::ratio", %amount, "price left the range");
                previous = None;
                return Ok(Step::Lower {
                    slack: f64::INFINITY,
                });
            }

            required = ctx
                .range_ratio_at(quote.sqrt_price_after_x96)?
                .for_direction(direction);
            let actual = ctx.ratio_after(amount, quote.amount_out);
            trace!(target: "zap::ratio", %amount, actual, required, "candidate");

            if (actual - required).abs() <= config.relative_tolerance * required {
                return Ok(Step::Converged(Termination::WithinTolerance));
            }
            let slack = ratio_slack(ctx, amount, quote.amount_out, actual, required);
            // a frozen target only ends the search once the holding balances to a unit
            if let Some(prev) = previous.replace(required) {
                if ((required - prev) / prev).abs() <= config.stall_tolerance && slack <= 1.0 {
                    return Ok(Step::Converged(Termination::Stalled));
                }
            }

            Ok(if actual < required {
                Step::Lower { slack }
            } else {
                Step::Raise { slack }
            })
        })?;

        debug!(
            target: "zap::ratio",
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
            target: Target::Ratio(required),
            quote,
            iterations: outcome.iterations,
            termination: outcome.termination,
        })
    }
}

/// Distance from the balanced amount, in input units, implied by a ratio
/// miss. The part a single unit of output or float rounding can account
/// for is discounted.
fn ratio_slack(
    ctx: &PositionContext,
    amount: U256,
    amount_out: U256,
    actual: f64,
    required: f64,
) -> f64 {
    if amount.is_zero() {
        // nothing swapped; an exhausted bracket here puts the target below one unit
        return 0.0;
    }
    let amount = u256_to_f64(amount);
    let kept = u256_to_f64(ctx.held_in()) - amount;
    let held = u256_to_f64(ctx.held_out()) + u256_to_f64(amount_out);
    let out = u256_to_f64(amount_out);

    // relative change of the actual ratio per unit of input
    let sensitivity = 1.0 / kept + out / (amount * held);
    let granularity = (1.0 / held + 4.0 * f64::EPSILON) / sensitivity;
    let miss = ((actual - required) / required).abs() / sensitivity;

    (miss - granularity).max(0.0)
}

/// First guess ignoring price impact and fee: solve
/// `(held_in - x) / (held_out + x·p) = r` in raw units.
pub fn initial_estimate(ctx: &PositionContext, required: f64) -> Result<U256, ZapError> {
    let held_in = u256_to_f64(ctx.held_in());
    let held_out = u256_to_f64(ctx.held_out());
    let raw_price = sqrt_price_x96_to_price(ctx.pool.sqrt_price_x96);
    let factor = ctx.shift().factor();

    // raw ratio of input kept per output held, raw output per unit input
    let (ratio, price) = match ctx.direction {
        Direction::ZeroForOne => (required * factor, raw_price),
        Direction::OneForZero => (required / factor, 1.0 / raw_price),
    };

    let estimate = (held_in - ratio * held_out) / (ratio * price + 1.0);
    if !estimate.is_finite() {
        return Ok(ctx.held_in() >> 1);
    }

    Ok(f64_to_u256(estimate.clamp(0.0, held_in))?.min(ctx.held_in()))
}
