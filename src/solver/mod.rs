//! Swap-amount solvers.
//!
//! Both strategies search `[0, held_in]` with the shared [`bisect`] loop and
//! differ only in what each step compares: the holdings ratio against the
//! range's required ratio (`ratio`), or the post-swap price against a target
//! price derived from the pool invariant (`price`).

pub mod bisect;
pub mod config;
pub mod price;
pub mod ratio;

pub use crate::math::range_ratio::Direction;
pub use config::SolverConfig;
pub use price::PriceMatching;
pub use ratio::RatioMatching;

use crate::error::ZapError;
use crate::position::PositionContext;
use crate::reader::{Quote, QuoteOracle};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// What a solve was aiming at when it stopped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Target {
    /// Required ratio of input token kept to output token held, human units.
    /// Re-derived at every candidate price.
    Ratio(f64),
    /// Post-swap sqrt price (raw, not Q96), fixed for the whole solve.
    SqrtPrice(f64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    WithinTolerance,
    /// The required ratio stopped moving between iterations.
    Stalled,
    /// The bracket ran out of candidates.
    Resolved,
    /// Nothing to swap.
    NoOp,
}

/// The answer to "how much should be swapped before depositing".
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZapPlan {
    pub amount_in: U256,
    pub direction: Direction,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub target: Target,
    /// Quote for `amount_in`; the current price with zero output when
    /// `amount_in` is zero.
    pub quote: Quote,
    pub iterations: u32,
    pub termination: Termination,
}

impl ZapPlan {
    pub(crate) fn no_op(ctx: &PositionContext, target: Target) -> Self {
        Self {
            amount_in: U256::ZERO,
            direction: ctx.direction,
            tick_lower: ctx.tick_lower,
            tick_upper: ctx.tick_upper,
            target,
            quote: ctx.identity_quote(),
            iterations: 0,
            termination: Termination::NoOp,
        }
    }
}

pub trait SwapStrategy {
    fn solve(
        &self,
        ctx: &PositionContext,
        oracle: &dyn QuoteOracle,
        config: &SolverConfig,
    ) -> Result<ZapPlan, ZapError>;
}

/// Selects a solver by name, e.g. from configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    RatioMatching,
    PriceMatching,
}

impl SwapStrategy for Strategy {
    fn solve(
        &self,
        ctx: &PositionContext,
        oracle: &dyn QuoteOracle,
        config: &SolverConfig,
    ) -> Result<ZapPlan, ZapError> {
        match self {
            Strategy::RatioMatching => RatioMatching.solve(ctx, oracle, config),
            Strategy::PriceMatching => PriceMatching.solve(ctx, oracle, config),
        }
    }
}

/// Candidate result shared by both strategies: the oracle's answer for `amount`,
/// or the current price when `amount` is zero.
pub(crate) fn quote_or_identity(
    ctx: &PositionContext,
    oracle: &dyn QuoteOracle,
    amount: U256,
) -> Result<Quote, ZapError> {
    if amount.is_zero() {
        return Ok(ctx.identity_quote());
    }

    let quote = oracle.quote_exact_input(ctx.token_in(), ctx.token_out(), ctx.pool.fee_ppm, amount)?;
    if quote.amount_out.is_zero() {
        return Err(ZapError::DegenerateQuote { amount_in: amount });
    }
    Ok(quote)
}
