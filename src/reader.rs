//! Read-only views of the outside world that the solvers depend on.
//!
//! Every call may fail with [`ZapError::OracleUnavailable`]; implementations
//! are expected to surface transport failures rather than retry.

use crate::error::ZapError;
use alloy_primitives::{Address, U256};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Snapshot of the pool fields a solve needs, read once up front.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub tick_spacing: i32,
    pub liquidity: u128,
    pub fee_ppm: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    pub decimals: u8,
}

/// Result of a hypothetical exact-input swap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub amount_out: U256,
    pub sqrt_price_after_x96: U256,
}

/// The fields of a liquidity position record that locate its pool and range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PositionInfo {
    pub token0: Address,
    pub token1: Address,
    pub fee_ppm: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

pub trait PoolReader {
    fn slot0(&self, pool: Address) -> Result<Slot0, ZapError>;
    fn tick_spacing(&self, pool: Address) -> Result<i32, ZapError>;
    fn liquidity(&self, pool: Address) -> Result<u128, ZapError>;
    fn fee_ppm(&self, pool: Address) -> Result<u32, ZapError>;
    fn token0(&self, pool: Address) -> Result<Address, ZapError>;
    fn token1(&self, pool: Address) -> Result<Address, ZapError>;

    /// Reads every field of [`PoolState`] in one go.
    fn pool_state(&self, pool: Address) -> Result<PoolState, ZapError> {
        let slot0 = self.slot0(pool)?;
        Ok(PoolState {
            address: pool,
            token0: self.token0(pool)?,
            token1: self.token1(pool)?,
            sqrt_price_x96: slot0.sqrt_price_x96,
            tick: slot0.tick,
            tick_spacing: self.tick_spacing(pool)?,
            liquidity: self.liquidity(pool)?,
            fee_ppm: self.fee_ppm(pool)?,
        })
    }
}

pub trait TokenReader {
    fn decimals(&self, token: Address) -> Result<u8, ZapError>;
    fn balance_of(&self, token: Address, holder: Address) -> Result<U256, ZapError>;

    fn token_info(&self, token: Address) -> Result<TokenInfo, ZapError> {
        Ok(TokenInfo {
            address: token,
            decimals: self.decimals(token)?,
        })
    }
}

/// Exact-input swap quotes without a price limit.
pub trait QuoteOracle {
    fn quote_exact_input(
        &self,
        token_in: Address,
        token_out: Address,
        fee_ppm: u32,
        amount_in: U256,
    ) -> Result<Quote, ZapError>;
}

pub trait PositionReader {
    fn position(&self, id: U256) -> Result<PositionInfo, ZapError>;
}

pub trait PoolLocator {
    fn pool_for(&self, token0: Address, token1: Address, fee_ppm: u32) -> Result<Address, ZapError>;
}

/// The set of collaborators a [`crate::Zapper`] reads from.
#[derive(Copy, Clone)]
pub struct Readers<'a> {
    pub pools: &'a dyn PoolReader,
    pub tokens: &'a dyn TokenReader,
    pub oracle: &'a dyn QuoteOracle,
    pub positions: &'a dyn PositionReader,
    pub locator: &'a dyn PoolLocator,
}

impl<'a> Readers<'a> {
    /// All readers backed by the same source.
    pub fn uniform<T>(source: &'a T) -> Self
    where
        T: PoolReader + TokenReader + QuoteOracle + PositionReader + PoolLocator,
    {
        Self {
            pools: source,
            tokens: source,
            oracle: source,
            positions: source,
            locator: source,
        }
    }
}

impl std::fmt::Debug for Readers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Readers").finish_non_exhaustive()
    }
}
