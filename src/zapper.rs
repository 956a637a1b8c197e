use crate::error::ZapError;
use crate::position::{BalanceSource, PositionContext};
use crate::reader::Readers;
use crate::solver::{Direction, SolverConfig, SwapStrategy, Strategy, ZapPlan};
use alloy_primitives::{Address, U256};

/// Entry point bundling the readers, the chosen strategy and its limits.
///
/// Nothing is cached between calls: every method reads fresh pool state.
#[derive(Debug, Clone, Copy)]
pub struct Zapper<'a> {
    readers: Readers<'a>,
    strategy: Strategy,
    config: SolverConfig,
}

impl<'a> Zapper<'a> {
    pub fn new(readers: Readers<'a>, strategy: Strategy, config: SolverConfig) -> Self {
        Self {
            readers,
            strategy,
            config,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Swap amount for depositing `amount` of the input token into
    /// `[tick_lower, tick_upper]`, ticks aligned outward to the pool spacing.
    pub fn swap_for_range(
        &self,
        pool: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: U256,
        direction: Direction,
    ) -> Result<ZapPlan, ZapError> {
        let ctx =
            PositionContext::from_ticks(&self.readers, pool, tick_lower, tick_upper, amount, direction)?;
        self.solve(&ctx)
    }

    /// Same as [`Zapper::swap_for_range`] for a ±`band` price range around
    /// the current tick.
    pub fn swap_for_band(
        &self,
        pool: Address,
        band: f64,
        amount: U256,
        direction: Direction,
    ) -> Result<ZapPlan, ZapError> {
        let ctx = PositionContext::from_band(&self.readers, pool, band, amount, direction)?;
        self.solve(&ctx)
    }

    /// Adding `amount0` and `amount1` to an existing position.
    pub fn swap_for_position(
        &self,
        position_id: U256,
        amount0: U256,
        amount1: U256,
    ) -> Result<ZapPlan, ZapError> {
        let ctx = PositionContext::from_position(
            &self.readers,
            position_id,
            BalanceSource::Explicit { amount0, amount1 },
        )?;
        self.solve(&ctx)
    }

    /// Reinvesting whatever `holder` currently holds of the position's tokens.
    pub fn compound(&self, position_id: U256, holder: Address) -> Result<ZapPlan, ZapError> {
        let ctx =
            PositionContext::from_position(&self.readers, position_id, BalanceSource::Holder(holder))?;
        self.solve(&ctx)
    }

    pub fn solve(&self, ctx: &PositionContext) -> Result<ZapPlan, ZapError> {
        self.strategy.solve(ctx, self.readers.oracle, &self.config)
    }
}
