use alloy_primitives::U256;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State error - sqrtPrice is 0")]
    SqrtPriceIsZero,
    #[error("State error - sqrtRatio is 0")]
    SqrtRatioIsZero,

    #[error("State error - tick out of bounds")]
    TickOutOfBounds,

    #[error("State error - liquidity is 0")]
    LiquidityIsZero,
}

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Swap error - amount specified is 0")]
    AmountSpecifiedIsZero,
    #[error("Swap error - no liquidity in range")]
    LiquidityIsZero,
    #[error("Swap error - unknown pool {0}")]
    UnknownPool(alloy_primitives::Address),
    #[error("Swap error - token pair does not match pool")]
    TokenMismatch,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    SwapError(#[from] crate::error::SwapError),
}

/// Reasons a bisection run stopped without reaching its target.
#[derive(Debug, Error)]
pub enum ConvergenceFailure {
    #[error("iteration cap of {0} reached")]
    IterationCap(u32),
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),
    #[error("bracket exhausted away from the target (low {low}, high {high})")]
    BracketInverted { low: U256, high: U256 },
    #[error("target lies outside [0, {total}]")]
    TargetOutsideBracket { total: U256 },
}

/// Caller-visible failures of a zap calculation.
///
/// A solve either returns a converged plan or one of these; an unconverged
/// candidate is never handed back.
#[derive(Debug, Error)]
pub enum ZapError {
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("invalid range [{tick_lower}, {tick_upper}]: {reason}")]
    InvalidRange {
        tick_lower: i32,
        tick_upper: i32,
        reason: &'static str,
    },

    #[error("oracle returned zero output for input {amount_in}")]
    DegenerateQuote { amount_in: U256 },

    #[error("solver did not converge: {0}")]
    ConvergenceFailure(#[from] ConvergenceFailure),

    #[error("numeric domain error: {0}")]
    NumericDomain(&'static str),

    #[error(transparent)]
    Math(#[from] Error),
}

impl From<MathError> for ZapError {
    fn from(err: MathError) -> Self {
        ZapError::Math(err.into())
    }
}

impl From<StateError> for ZapError {
    fn from(err: StateError) -> Self {
        ZapError::Math(err.into())
    }
}

impl From<SwapError> for ZapError {
    fn from(err: SwapError) -> Self {
        ZapError::Math(err.into())
    }
}
