use crate::error::ZapError;
use crate::math::price_math::checked_sqrt;
use serde::{Deserialize, Serialize};

/// Swap direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// token0 → token1; the pool price falls.
    ZeroForOne,
    /// token1 → token0; the pool price rises.
    OneForZero,
}

impl Direction {
    #[inline]
    pub fn zero_for_one(self) -> bool {
        matches!(self, Direction::ZeroForOne)
    }

    #[inline]
    pub fn from_zero_for_one(zero_for_one: bool) -> Self {
        if zero_for_one {
            Direction::ZeroForOne
        } else {
            Direction::OneForZero
        }
    }
}

/// Marginal composition of liquidity in `[Pl, Pu]` at price `Pc`.
///
/// With decimal-adjusted prices, per unit of liquidity the range holds
/// `a = √Pc − √Pl` of token1 and `b = 1/√Pc − 1/√Pu` of token0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeRatio {
    a: f64,
    b: f64,
    price: f64,
}

impl RangeRatio {
    /// Builds the ratio for a price strictly inside the range.
    ///
    /// Outside the range the formula yields a negative or inverted ratio, so
    /// `Pl < Pc < Pu` is enforced here.
    pub fn new(price: f64, price_lower: f64, price_upper: f64) -> Result<Self, ZapError> {
        if !(price_lower < price && price < price_upper) {
            return Err(ZapError::NumericDomain(
                "current price must lie strictly inside the range",
            ));
        }

        let sqrt_price = checked_sqrt(price)?;
        let a = sqrt_price - checked_sqrt(price_lower)?;
        let b = 1.0 / sqrt_price - 1.0 / checked_sqrt(price_upper)?;

        Ok(Self { a, b, price })
    }

    /// Required token0 per token1 (`b / a`).
    #[inline]
    pub fn token0_per_token1(&self) -> f64 {
        self.b / self.a
    }

    /// Required token1 per token0 (`a / b`).
    #[inline]
    pub fn token1_per_token0(&self) -> f64 {
        self.a / self.b
    }

    /// Required ratio of "input kept" to "output held" for a swap direction:
    /// `b / a` when selling token0, `a / b` when selling token1.
    #[inline]
    pub fn for_direction(&self, direction: Direction) -> f64 {
        match direction {
            Direction::ZeroForOne => self.token0_per_token1(),
            Direction::OneForZero => self.token1_per_token0(),
        }
    }

    /// Value of the token0 leg over the value of the token1 leg. Unlike the
    /// amount ratios this does not change when all three prices are scaled by
    /// a common factor.
    #[inline]
    pub fn value_ratio(&self) -> f64 {
        self.token0_per_token1() * self.price
    }
}

/// Picks the token to sell from held and required token0:token1 ratios.
///
/// Holding more token0 than the range wants (`held > required`) means token0
/// is sold. Ties and everything else sell token1; at an exact tie the solver
/// settles on a zero or near-zero amount.
pub fn choose_direction(held_ratio: f64, required_ratio: f64) -> Direction {
    if held_ratio > required_ratio {
        Direction::ZeroForOne
    } else {
        Direction::OneForZero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ratio_matches_closed_form() {
        let ratio = RangeRatio::new(4.0, 1.0, 16.0).unwrap();

        // a = 2 - 1, b = 1/2 - 1/4
        assert_relative_eq!(ratio.token0_per_token1(), 0.25);
        assert_relative_eq!(ratio.token1_per_token0(), 4.0);
        assert_relative_eq!(ratio.for_direction(Direction::ZeroForOne), 0.25);
        assert_relative_eq!(ratio.for_direction(Direction::OneForZero), 4.0);
    }

    #[test]
    fn value_ratio_is_scale_invariant() {
        let base = RangeRatio::new(4.0, 1.0, 16.0).unwrap();

        for k in [1e-12, 0.37, 3.0, 2.5e9] {
            let scaled = RangeRatio::new(4.0 * k, k, 16.0 * k).unwrap();
            assert_relative_eq!(scaled.value_ratio(), base.value_ratio(), max_relative = 1e-12);
            // the amount ratio moves inversely with the price level
            assert_relative_eq!(
                scaled.token0_per_token1(),
                base.token0_per_token1() / k,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn price_outside_range_is_rejected() {
        assert!(RangeRatio::new(0.5, 1.0, 16.0).is_err());
        assert!(RangeRatio::new(16.0, 1.0, 16.0).is_err());
        assert!(RangeRatio::new(1.0, 1.0, 16.0).is_err());
        assert!(RangeRatio::new(4.0, 16.0, 1.0).is_err());
    }

    #[test]
    fn negative_bound_hits_numeric_domain() {
        let err = RangeRatio::new(4.0, -1.0, 16.0).unwrap_err();
        assert!(matches!(err, ZapError::NumericDomain(_)));
    }

    #[test]
    fn choose_direction_sells_the_excess_token() {
        assert_eq!(choose_direction(2.0, 1.0), Direction::ZeroForOne);
        assert_eq!(choose_direction(0.5, 1.0), Direction::OneForZero);
        assert_eq!(choose_direction(1.0, 1.0), Direction::OneForZero);
        assert_eq!(choose_direction(f64::INFINITY, 1.0), Direction::ZeroForOne);
    }

    #[test]
    fn direction_flag_round_trips() {
        assert!(Direction::ZeroForOne.zero_for_one());
        assert_eq!(Direction::from_zero_for_one(false), Direction::OneForZero);
    }
}
