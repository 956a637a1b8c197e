//! Resolution of "where is the deposit going and what do we hold".

use crate::error::ZapError;
use crate::math::price_math::{DecimalShift, u256_to_f64};
use crate::math::range_ratio::{Direction, RangeRatio, choose_direction};
use crate::math::tick_math::{align_lower, align_upper, band_ticks, get_sqrt_ratio_at_tick};
use crate::reader::{PoolState, Quote, Readers, TokenInfo};
use alloy_primitives::{Address, U256};
use tracing::debug;

/// Where the balances for a position-based zap come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BalanceSource {
    Explicit { amount0: U256, amount1: U256 },
    /// Current `balanceOf` of both tokens for this address.
    Holder(Address),
}

/// Everything a solver needs about one zap: pool snapshot, aligned range,
/// token metadata, holdings and swap direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionContext {
    pub pool: PoolState,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub sqrt_price_lower_x96: U256,
    pub sqrt_price_upper_x96: U256,
    pub amount0: U256,
    pub amount1: U256,
    pub direction: Direction,
}

impl PositionContext {
    /// Explicit ticks, holding `amount` of the input token only.
    pub fn from_ticks(
        readers: &Readers<'_>,
        pool: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: U256,
        direction: Direction,
    ) -> Result<Self, ZapError> {
        let state = readers.pools.pool_state(pool)?;
        let (amount0, amount1) = single_sided(amount, direction);
        Self::resolve(readers, state, tick_lower, tick_upper, amount0, amount1, Some(direction))
    }

    /// Symmetric band of `band` (e.g. `0.05` for ±5%) around the current tick.
    pub fn from_band(
        readers: &Readers<'_>,
        pool: Address,
        band: f64,
        amount: U256,
        direction: Direction,
    ) -> Result<Self, ZapError> {
        let state = readers.pools.pool_state(pool)?;
        let (tick_lower, tick_upper) = band_ticks(state.tick, band, state.tick_spacing)?;
        debug!(target: "zap::position", band, tick_lower, tick_upper, "band resolved");

        let (amount0, amount1) = single_sided(amount, direction);
        Self::resolve(readers, state, tick_lower, tick_upper, amount0, amount1, Some(direction))
    }

    /// Range of an existing position; direction inferred from the balances.
    pub fn from_position(
        readers: &Readers<'_>,
        position_id: U256,
        balances: BalanceSource,
    ) -> Result<Self, ZapError> {
        let info = readers.positions.position(position_id)?;
        let pool = readers.locator.pool_for(info.token0, info.token1, info.fee_ppm)?;
        let state = readers.pools.pool_state(pool)?;

        let (amount0, amount1) = match balances {
            BalanceSource::Explicit { amount0, amount1 } => (amount0, amount1),
            BalanceSource::Holder(holder) => (
                readers.tokens.balance_of(state.token0, holder)?,
                readers.tokens.balance_of(state.token1, holder)?,
            ),
        };
        debug!(
            target: "zap::position",
            %position_id,
            %pool,
            tick_lower = info.tick_lower,
            tick_upper = info.tick_upper,
            %amount0,
            %amount1,
            "position loaded"
        );

        Self::resolve(readers, state, info.tick_lower, info.tick_upper, amount0, amount1, None)
    }

    fn resolve(
        readers: &Readers<'_>,
        pool: PoolState,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        amount1: U256,
        direction: Option<Direction>,
    ) -> Result<Self, ZapError> {
        let lower = align_lower(tick_lower, pool.tick_spacing)?;
        let upper = align_upper(tick_upper, pool.tick_spacing)?;
        let invalid = |reason| ZapError::InvalidRange {
            tick_lower: lower,
            tick_upper: upper,
            reason,
        };

        if lower >= upper {
            return Err(invalid("lower tick is not below upper tick"));
        }
        let sqrt_price_lower_x96 =
            get_sqrt_ratio_at_tick(lower).map_err(|_| invalid("tick outside the valid range"))?;
        let sqrt_price_upper_x96 =
            get_sqrt_ratio_at_tick(upper).map_err(|_| invalid("tick outside the valid range"))?;
        if !(sqrt_price_lower_x96 < pool.sqrt_price_x96 && pool.sqrt_price_x96 < sqrt_price_upper_x96)
        {
            return Err(invalid("current price is not strictly inside the range"));
        }

        let mut ctx = Self {
            token0: readers.tokens.token_info(pool.token0)?,
            token1: readers.tokens.token_info(pool.token1)?,
            pool,
            tick_lower: lower,
            tick_upper: upper,
            sqrt_price_lower_x96,
            sqrt_price_upper_x96,
            amount0,
            amount1,
            direction: Direction::OneForZero,
        };

        ctx.direction = match direction {
            Some(direction) => direction,
            None => {
                let required = ctx.range_ratio_at(pool.sqrt_price_x96)?.token0_per_token1();
                choose_direction(ctx.held_ratio(), required)
            }
        };

        debug!(
            target: "zap::position",
            pool = %pool.address,
            tick_lower = lower,
            tick_upper = upper,
            direction = ?ctx.direction,
            "range resolved"
        );
        Ok(ctx)
    }

    pub fn shift(&self) -> DecimalShift {
        DecimalShift::new(self.token0.decimals, self.token1.decimals)
    }

    pub fn token_in(&self) -> Address {
        match self.direction {
            Direction::ZeroForOne => self.token0.address,
            Direction::OneForZero => self.token1.address,
        }
    }

    pub fn token_out(&self) -> Address {
        match self.direction {
            Direction::ZeroForOne => self.token1.address,
            Direction::OneForZero => self.token0.address,
        }
    }

    /// Balance of the token being sold; the upper end of the search.
    pub fn held_in(&self) -> U256 {
        match self.direction {
            Direction::ZeroForOne => self.amount0,
            Direction::OneForZero => self.amount1,
        }
    }

    pub fn held_out(&self) -> U256 {
        match self.direction {
            Direction::ZeroForOne => self.amount1,
            Direction::OneForZero => self.amount0,
        }
    }

    /// Held token0 per token1 in human units; infinite with no token1.
    pub fn held_ratio(&self) -> f64 {
        self.shift()
            .amount_ratio_0_per_1(u256_to_f64(self.amount0), u256_to_f64(self.amount1))
    }

    /// Whether a sqrt price lies strictly inside the range.
    pub fn in_range(&self, sqrt_price_x96: U256) -> bool {
        self.sqrt_price_lower_x96 < sqrt_price_x96 && sqrt_price_x96 < self.sqrt_price_upper_x96
    }

    /// Range composition at an arbitrary price, in human units.
    pub fn range_ratio_at(&self, sqrt_price_x96: U256) -> Result<RangeRatio, ZapError> {
        let shift = self.shift();
        RangeRatio::new(
            shift.price_at(sqrt_price_x96),
            shift.price_at(self.sqrt_price_lower_x96),
            shift.price_at(self.sqrt_price_upper_x96),
        )
    }

    /// Input kept per output held after swapping `amount_in` for
    /// `amount_out`, in the units of [`RangeRatio::for_direction`].
    pub fn ratio_after(&self, amount_in: U256, amount_out: U256) -> f64 {
        let kept = u256_to_f64(self.held_in().saturating_sub(amount_in));
        let held = u256_to_f64(self.held_out()) + u256_to_f64(amount_out);
        let shift = self.shift();

        match self.direction {
            Direction::ZeroForOne => shift.amount_ratio_0_per_1(kept, held),
            Direction::OneForZero => shift.amount_ratio_1_per_0(kept, held),
        }
    }

    /// A "swap" of nothing: current price, no output.
    pub fn identity_quote(&self) -> Quote {
        Quote {
            amount_out: U256::ZERO,
            sqrt_price_after_x96: self.pool.sqrt_price_x96,
        }
    }
}

fn single_sided(amount: U256, direction: Direction) -> (U256, U256) {
    match direction {
        Direction::ZeroForOne => (amount, U256::ZERO),
        Direction::OneForZero => (U256::ZERO, amount),
    }
}
