//! Bracketed integer bisection over a swap amount.

use crate::error::{ConvergenceFailure, ZapError};
use crate::solver::Termination;
use crate::solver::config::SolverConfig;
use alloy_primitives::U256;
use std::time::Instant;
use tracing::{trace, warn};

/// Verdict on one candidate amount.
///
/// `slack` is the caller's estimate of how far the candidate is from the
/// target, in amount units, beyond what the oracle's own granularity can
/// resolve. It only matters once the bracket is exhausted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Step {
    Converged(Termination),
    /// The target needs a larger amount.
    Raise { slack: f64 },
    /// The target needs a smaller amount.
    Lower { slack: f64 },
}

/// Inclusive bounds on the amount still under consideration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bracket {
    pub low: U256,
    pub high: U256,
}

impl Bracket {
    pub fn new(total: U256) -> Self {
        Self {
            low: U256::ZERO,
            high: total,
        }
    }

    #[inline]
    pub fn midpoint(&self) -> U256 {
        self.low + ((self.high - self.low) >> 1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bisection {
    pub amount: U256,
    pub iterations: u32,
    pub termination: Termination,
}

/// Bisects `[0, total]`, starting from `start`, until `evaluate` reports
/// convergence or fewer than `amount_resolution` candidates remain.
///
/// `evaluate` is called exactly once per iteration. The bracket only ever
/// shrinks: `Raise` moves `low` past the candidate, `Lower` moves `high`
/// below it. An exhausted bracket is only accepted as
/// [`Termination::Resolved`] when the last candidate's slack is within the
/// resolution; a larger slack means the verdicts flipped across a jump and
/// is reported as [`ConvergenceFailure::BracketInverted`].
pub fn bisect<F>(
    total: U256,
    start: U256,
    config: &SolverConfig,
    mut evaluate: F,
) -> Result<Bisection, ZapError>
where
    F: FnMut(U256) -> Result<Step, ZapError>,
{
    let started = Instant::now();
    let deadline = config.max_duration();
    let resolution = config.amount_resolution.max(1);
    // fewer than `amount_resolution` untried candidates left
    let span = U256::from(resolution - 1);
    let max_slack = 2.0 * resolution as f64;

    let mut bracket = Bracket::new(total);
    let mut candidate = start.min(total);
    let mut iterations = 0u32;

    loop {
        if iterations >= config.max_iterations {
            warn!(target: "zap::bisect", iterations, %candidate, "iteration cap reached");
            return Err(ConvergenceFailure::IterationCap(config.max_iterations).into());
        }
        if started.elapsed() > deadline {
            warn!(target: "zap::bisect", iterations, ?deadline, "deadline exceeded");
            return Err(ConvergenceFailure::Timeout(deadline).into());
        }

        iterations += 1;
        let step = evaluate(candidate)?;
        trace!(
            target: "zap::bisect",
            iterations,
            %candidate,
            low = %bracket.low,
            high = %bracket.high,
            ?step,
            "candidate"
        );

        let slack = match step {
            Step::Converged(termination) => {
                return Ok(Bisection {
                    amount: candidate,
                    iterations,
                    termination,
                });
            }
            Step::Raise { slack } => {
                if candidate == total {
                    return Err(outside(total));
                }
                bracket.low = candidate + U256::ONE;
                slack
            }
            Step::Lower { slack } => {
                if candidate.is_zero() {
                    return Err(outside(total));
                }
                bracket.high = candidate - U256::ONE;
                slack
            }
        };

        // low > high: the target sits between two adjacent integers
        if bracket.high < bracket.low || bracket.high - bracket.low < span {
            if slack <= max_slack {
                return Ok(Bisection {
                    amount: candidate,
                    iterations,
                    termination: Termination::Resolved,
                });
            }
            warn!(
                target: "zap::bisect",
                low = %bracket.low,
                high = %bracket.high,
                %candidate,
                slack,
                "bracket exhausted away from the target"
            );
            return Err(ConvergenceFailure::BracketInverted {
                low: bracket.low,
                high: bracket.high,
            }
            .into());
        }

        candidate = bracket.midpoint();
    }
}

fn outside(total: U256) -> ZapError {
    ConvergenceFailure::TargetOutsideBracket { total }.into()
}
