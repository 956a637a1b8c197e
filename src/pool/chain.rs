use crate::FastMap;
use crate::error::{SwapError, ZapError};
use crate::pool::v3_pool::{V3Pool, sort_tokens};
use crate::reader::{
    PoolLocator, PoolReader, PoolState, PositionInfo, PositionReader, Quote, QuoteOracle, Slot0,
    TokenReader,
};
use alloy_primitives::{Address, U256};
use std::cell::Cell;

/// Deterministic stand-in for a chain: pools, token metadata, balances and
/// position records, all answering the reader traits from memory.
#[derive(Debug, Default)]
pub struct SimulatedChain {
    pools: FastMap<Address, V3Pool>,
    decimals: FastMap<Address, u8>,
    balances: FastMap<(Address, Address), U256>,
    positions: FastMap<U256, PositionInfo>,
    quotes: Cell<usize>,
}

impl SimulatedChain {
    pub fn add_token(&mut self, token: Address, decimals: u8) {
        self.decimals.insert(token, decimals);
    }

    pub fn add_pool(&mut self, pool: V3Pool) {
        self.pools.insert(pool.pool_address, pool);
    }

    pub fn set_balance(&mut self, token: Address, holder: Address, amount: U256) {
        self.balances.insert((token, holder), amount);
    }

    pub fn add_position(&mut self, id: U256, position: PositionInfo) {
        self.positions.insert(id, position);
    }

    pub fn pool(&self, pool: Address) -> Result<&V3Pool, ZapError> {
        self.pools
            .get(&pool)
            .ok_or_else(|| SwapError::UnknownPool(pool).into())
    }

    /// Number of oracle quotes served so far.
    pub fn quote_count(&self) -> usize {
        self.quotes.get()
    }

    fn find_pool(&self, token_a: Address, token_b: Address, fee_ppm: u32) -> Option<&V3Pool> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        self.pools
            .values()
            .find(|pool| pool.token0 == token0 && pool.token1 == token1 && pool.fee_pips == fee_ppm)
    }
}

impl PoolReader for SimulatedChain {
    fn slot0(&self, pool: Address) -> Result<Slot0, ZapError> {
        Ok(self.pool(pool)?.slot0)
    }

    fn tick_spacing(&self, pool: Address) -> Result<i32, ZapError> {
        Ok(self.pool(pool)?.tick_spacing)
    }

    fn liquidity(&self, pool: Address) -> Result<u128, ZapError> {
        Ok(self.pool(pool)?.liquidity)
    }

    fn fee_ppm(&self, pool: Address) -> Result<u32, ZapError> {
        Ok(self.pool(pool)?.fee_pips)
    }

    fn token0(&self, pool: Address) -> Result<Address, ZapError> {
        Ok(self.pool(pool)?.token0)
    }

    fn token1(&self, pool: Address) -> Result<Address, ZapError> {
        Ok(self.pool(pool)?.token1)
    }

    fn pool_state(&self, pool: Address) -> Result<PoolState, ZapError> {
        Ok(self.pool(pool)?.state())
    }
}

impl TokenReader for SimulatedChain {
    fn decimals(&self, token: Address) -> Result<u8, ZapError> {
        self.decimals
            .get(&token)
            .copied()
            .ok_or_else(|| ZapError::OracleUnavailable(format!("no metadata for token {token}")))
    }

    fn balance_of(&self, token: Address, holder: Address) -> Result<U256, ZapError> {
        Ok(self
            .balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default())
    }
}

impl QuoteOracle for SimulatedChain {
    fn quote_exact_input(
        &self,
        token_in: Address,
        token_out: Address,
        fee_ppm: u32,
        amount_in: U256,
    ) -> Result<Quote, ZapError> {
        self.quotes.set(self.quotes.get() + 1);

        let pool = self
            .find_pool(token_in, token_out, fee_ppm)
            .ok_or(SwapError::TokenMismatch)?;
        let zero_for_one = pool
            .direction_for(token_in, token_out)
            .ok_or(SwapError::TokenMismatch)?;

        Ok(pool.quote_exact_input(zero_for_one, amount_in)?)
    }
}

impl PositionReader for SimulatedChain {
    fn position(&self, id: U256) -> Result<PositionInfo, ZapError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or_else(|| ZapError::OracleUnavailable(format!("no position {id}")))
    }
}

impl PoolLocator for SimulatedChain {
    fn pool_for(&self, token0: Address, token1: Address, fee_ppm: u32) -> Result<Address, ZapError> {
        self.find_pool(token0, token1, fee_ppm)
            .map(|pool| pool.pool_address)
            .ok_or_else(|| SwapError::TokenMismatch.into())
    }
}
