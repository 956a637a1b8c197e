use crate::reader::{PoolState, Slot0};
use alloy_primitives::Address;

/// Pool token order. Byte order of an address is its numeric order.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// In-memory snapshot of a Uniswap V3 pool with all liquidity in the active
/// range.
///
/// Fill in `slot0`, `liquidity` and `tick_spacing` after [`V3Pool::new`];
/// quotes then follow the pool's own integer math (see `quote_exact_input`).
#[derive(Clone, Debug)]
pub struct V3Pool {
    pub pool_address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee_pips: u32,
    pub slot0: Slot0,
    pub liquidity: u128,
    pub tick_spacing: i32,
}

impl V3Pool {
    pub fn new(pool_address: Address, token0: Address, token1: Address, fee_pips: u32) -> Self {
        let (token0, token1) = sort_tokens(token0, token1);

        Self {
            pool_address,
            token0,
            token1,
            fee_pips,
            slot0: Slot0::default(),
            liquidity: 0u128,
            tick_spacing: 0i32,
        }
    }

    pub fn state(&self) -> PoolState {
        PoolState {
            address: self.pool_address,
            token0: self.token0,
            token1: self.token1,
            sqrt_price_x96: self.slot0.sqrt_price_x96,
            tick: self.slot0.tick,
            tick_spacing: self.tick_spacing,
            liquidity: self.liquidity,
            fee_ppm: self.fee_pips,
        }
    }

    /// Whether `(token_in, token_out)` trades this pool, and in which
    /// direction. `None` if the pair does not match.
    pub fn direction_for(&self, token_in: Address, token_out: Address) -> Option<bool> {
        if token_in == self.token0 && token_out == self.token1 {
            Some(true)
        } else if token_in == self.token1 && token_out == self.token0 {
            Some(false)
        } else {
            None
        }
    }
}
