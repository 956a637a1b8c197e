//! Reader implementations backed by live contracts over an alloy provider.
//!
//! Calls are issued on a private current-thread tokio runtime and block
//! until the node answers, so a solve stays a plain synchronous loop.
//! Do not use these readers from inside another tokio runtime.

use crate::error::ZapError;
use crate::reader::{
    PoolLocator, PoolReader, PoolState, PositionInfo, PositionReader, Quote, QuoteOracle, Slot0,
    TokenReader,
};
use alloy_primitives::aliases::{U24, U160};
use alloy_primitives::{Address, U256, address};
use alloy_provider::Provider;
use alloy_sol_macro::sol;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{trace, warn};

sol! {
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
        function tickSpacing() external view returns (int24);
        function liquidity() external view returns (uint128);
        function fee() external view returns (uint24);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    #[sol(rpc)]
    interface IQuoterV2 {
        struct QuoteExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint256 amountIn;
            uint24 fee;
            uint160 sqrtPriceLimitX96;
        }

        function quoteExactInputSingle(QuoteExactInputSingleParams memory params)
            external
            returns (
                uint256 amountOut,
                uint160 sqrtPriceX96After,
                uint32 initializedTicksCrossed,
                uint256 gasEstimate
            );
    }

    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
    }

    #[sol(rpc)]
    interface INonfungiblePositionManager {
        function positions(uint256 tokenId) external view returns (
            uint96 nonce,
            address operator,
            address token0,
            address token1,
            uint24 fee,
            int24 tickLower,
            int24 tickUpper,
            uint128 liquidity,
            uint256 feeGrowthInside0LastX128,
            uint256 feeGrowthInside1LastX128,
            uint128 tokensOwed0,
            uint128 tokensOwed1
        );
    }

    #[sol(rpc)]
    interface IUniswapV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }
}

/// Periphery contracts the readers talk to besides the pool itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub quoter: Address,
    pub position_manager: Address,
    pub factory: Address,
}

impl ContractAddresses {
    /// Uniswap V3 deployment on Ethereum mainnet.
    pub const fn mainnet() -> Self {
        Self {
            quoter: address!("0x61fFE014bA17989E743c5F6cB21bF9697530B21e"),
            position_manager: address!("0xC36442b4a4522E871399CD717aBDD847Ab11FE88"),
            factory: address!("0x1F98431c8aD98523631AE4a59f267346ea31F984"),
        }
    }
}

pub type OnchainProvider<P> = Arc<P>;

pub struct OnchainReaders<P> {
    provider: OnchainProvider<P>,
    addresses: ContractAddresses,
    runtime: Runtime,
}

fn unavailable(call: &'static str, err: impl std::fmt::Display) -> ZapError {
    warn!(target: "zap::onchain", call, error = %err, "rpc call failed");
    ZapError::OracleUnavailable(format!("{call}: {err}"))
}

impl<P> OnchainReaders<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(provider: OnchainProvider<P>, addresses: ContractAddresses) -> Result<Self, ZapError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| unavailable("runtime", e))?;

        Ok(Self {
            provider,
            addresses,
            runtime,
        })
    }

    pub fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn pool(&self, pool: Address) -> IUniswapV3Pool::IUniswapV3PoolInstance<OnchainProvider<P>> {
        IUniswapV3Pool::IUniswapV3PoolInstance::new(pool, self.provider.clone())
    }

    fn erc20(&self, token: Address) -> IERC20::IERC20Instance<OnchainProvider<P>> {
        IERC20::IERC20Instance::new(token, self.provider.clone())
    }
}

impl<P> PoolReader for OnchainReaders<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn slot0(&self, pool: Address) -> Result<Slot0, ZapError> {
        let contract = self.pool(pool);
        let slot0 = self
            .block_on(async { contract.slot0().call().await })
            .map_err(|e| unavailable("slot0", e))?;

        Ok(Slot0 {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
        })
    }

    fn tick_spacing(&self, pool: Address) -> Result<i32, ZapError> {
        let contract = self.pool(pool);
        let spacing = self
            .block_on(async { contract.tickSpacing().call().await })
            .map_err(|e| unavailable("tickSpacing", e))?;
        Ok(spacing.as_i32())
    }

    fn liquidity(&self, pool: Address) -> Result<u128, ZapError> {
        let contract = self.pool(pool);
        self.block_on(async { contract.liquidity().call().await })
            .map_err(|e| unavailable("liquidity", e))
    }

    fn fee_ppm(&self, pool: Address) -> Result<u32, ZapError> {
        let contract = self.pool(pool);
        let fee = self
            .block_on(async { contract.fee().call().await })
            .map_err(|e| unavailable("fee", e))?;
        Ok(fee.to::<u32>())
    }

    fn token0(&self, pool: Address) -> Result<Address, ZapError> {
        let contract = self.pool(pool);
        self.block_on(async { contract.token0().call().await })
            .map_err(|e| unavailable("token0", e))
    }

    fn token1(&self, pool: Address) -> Result<Address, ZapError> {
        let contract = self.pool(pool);
        self.block_on(async { contract.token1().call().await })
            .map_err(|e| unavailable("token1", e))
    }

    /// All pool fields in one round of concurrent calls.
    fn pool_state(&self, pool: Address) -> Result<PoolState, ZapError> {
        let contract = self.pool(pool);

        let (slot0, spacing, liquidity, fee, token0, token1) = self.block_on(async {
            futures::try_join!(
                async { contract.slot0().call().await.map_err(|e| unavailable("slot0", e)) },
                async {
                    contract
                        .tickSpacing()
                        .call()
                        .await
                        .map_err(|e| unavailable("tickSpacing", e))
                },
                async {
                    contract
                        .liquidity()
                        .call()
                        .await
                        .map_err(|e| unavailable("liquidity", e))
                },
                async { contract.fee().call().await.map_err(|e| unavailable("fee", e)) },
                async { contract.token0().call().await.map_err(|e| unavailable("token0", e)) },
                async { contract.token1().call().await.map_err(|e| unavailable("token1", e)) },
            )
        })?;
        trace!(target: "zap::onchain", %pool, tick = slot0.tick.as_i32(), liquidity, "pool state");

        Ok(PoolState {
            address: pool,
            token0,
            token1,
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
            tick_spacing: spacing.as_i32(),
            liquidity,
            fee_ppm: fee.to::<u32>(),
        })
    }
}

impl<P> TokenReader for OnchainReaders<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn decimals(&self, token: Address) -> Result<u8, ZapError> {
        let contract = self.erc20(token);
        self.block_on(async { contract.decimals().call().await })
            .map_err(|e| unavailable("decimals", e))
    }

    fn balance_of(&self, token: Address, holder: Address) -> Result<U256, ZapError> {
        let contract = self.erc20(token);
        self.block_on(async { contract.balanceOf(holder).call().await })
            .map_err(|e| unavailable("balanceOf", e))
    }
}

impl<P> QuoteOracle for OnchainReaders<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn quote_exact_input(
        &self,
        token_in: Address,
        token_out: Address,
        fee_ppm: u32,
        amount_in: U256,
    ) -> Result<Quote, ZapError> {
        let quoter = IQuoterV2::IQuoterV2Instance::new(self.addresses.quoter, self.provider.clone());
        let params = IQuoterV2::QuoteExactInputSingleParams {
            tokenIn: token_in,
            tokenOut: token_out,
            amountIn: amount_in,
            fee: U24::saturating_from(fee_ppm),
            sqrtPriceLimitX96: U160::ZERO,
        };

        let quote = self
            .block_on(async { quoter.quoteExactInputSingle(params).call().await })
            .map_err(|e| unavailable("quoteExactInputSingle", e))?;
        trace!(
            target: "zap::onchain",
            %amount_in,
            amount_out = %quote.amountOut,
            ticks_crossed = quote.initializedTicksCrossed,
            "quote"
        );

        Ok(Quote {
            amount_out: quote.amountOut,
            sqrt_price_after_x96: U256::from(quote.sqrtPriceX96After),
        })
    }
}

impl<P> PositionReader for OnchainReaders<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn position(&self, id: U256) -> Result<PositionInfo, ZapError> {
        let manager = INonfungiblePositionManager::INonfungiblePositionManagerInstance::new(
            self.addresses.position_manager,
            self.provider.clone(),
        );
        let position = self
            .block_on(async { manager.positions(id).call().await })
            .map_err(|e| unavailable("positions", e))?;

        Ok(PositionInfo {
            token0: position.token0,
            token1: position.token1,
            fee_ppm: position.fee.to::<u32>(),
            tick_lower: position.tickLower.as_i32(),
            tick_upper: position.tickUpper.as_i32(),
            liquidity: position.liquidity,
        })
    }
}

impl<P> PoolLocator for OnchainReaders<P>
where
    P: Provider + Send + Sync + 'static,
{
    fn pool_for(&self, token0: Address, token1: Address, fee_ppm: u32) -> Result<Address, ZapError> {
        let factory =
            IUniswapV3Factory::IUniswapV3FactoryInstance::new(self.addresses.factory, self.provider.clone());
        let pool = self
            .block_on(async {
                factory
                    .getPool(token0, token1, U24::saturating_from(fee_ppm))
                    .call()
                    .await
            })
            .map_err(|e| unavailable("getPool", e))?;

        if pool.is_zero() {
            return Err(ZapError::OracleUnavailable(format!(
                "no pool for {token0}/{token1} at fee {fee_ppm}"
            )));
        }
        Ok(pool)
    }
}
