//! Pool state and tick reads over JSON-RPC.

use super::{PoolState, PoolStateFetcher};
use crate::error::OnchainError;
use crate::math::tick_bitmap::{TickBitmap, initialized_ticks_in_word, word_range};
use crate::tick::{Tick, TickFetcher};
use alloy_primitives::aliases::I24;
use alloy_primitives::{Address, BlockNumber, Bytes, U256, address};
use alloy_provider::Provider;
use alloy_sol_macro::sol;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::debug;

sol! {
    #[sol(rpc)]
    interface IV3Pool {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function fee() external view returns (uint24);
        function tickSpacing() external view returns (int24);
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
        function liquidity() external view returns (uint128);
        function tickBitmap(int16 wordPosition) external view returns (uint256);
        function ticks(int24 tick) external view returns (
            uint128 liquidityGross,
            int128 liquidityNet,
            uint256 feeGrowthOutside0X128,
            uint256 feeGrowthOutside1X128,
            int56 tickCumulativeOutside,
            uint160 secondsPerLiquidityOutsideX128,
            uint32 secondsOutside,
            bool initialized
        );
    }
}

sol! {
    struct Call {
        address target;
        bytes callData;
    }

    #[sol(rpc)]
    interface IMulticall {
        function aggregate(Call[] calls)
            external
            view
            returns (uint256 blockNumber, bytes[] returnData);
    }
}

/// Multicall3, deployed at the same address on most EVM chains.
pub const MULTICALL3: Address = address!("0xcA11bde05977b3631167028862bE2a173976CA11");

/// Calls batched into one `aggregate`.
const MULTICALL_CHUNK: usize = 500;

/// Runs a pool view call at `block` (latest when `None`).
macro_rules! call_at {
    ($call:expr, $block:expr, $err:path) => {
        async {
            let mut call = $call;
            if let Some(bn) = $block {
                call = call.block(bn.into());
            }
            call.call().await.map_err(|e| $err(e.to_string()))
        }
    };
}

/// Reads pool state and initialized ticks from a node.
#[derive(Debug, Clone)]
pub struct RpcFetcher<P> {
    provider: Arc<P>,
    multicall: Address,
}

impl<P> RpcFetcher<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_multicall(provider, MULTICALL3)
    }

    pub fn with_multicall(provider: Arc<P>, multicall: Address) -> Self {
        Self {
            provider,
            multicall,
        }
    }

    pub fn multicall(&self) -> Address {
        self.multicall
    }

    async fn aggregate(
        &self,
        calls: Vec<Call>,
        block: Option<BlockNumber>,
    ) -> Result<Vec<Bytes>, OnchainError> {
        let multicall = IMulticall::new(self.multicall, self.provider.clone());
        let aggregated = call_at!(
            multicall.aggregate(calls),
            block,
            OnchainError::FailedToCallMulticall
        )
        .await?;
        Ok(aggregated.returnData)
    }

    /// Fetches the given bitmap words, keeping the non-zero ones.
    pub async fn fetch_bitmaps(
        &self,
        pool: Address,
        word_positions: &[i16],
        block: Option<BlockNumber>,
    ) -> Result<TickBitmap, OnchainError> {
        let contract = IV3Pool::new(pool, self.provider.clone());

        let batches = word_positions.chunks(MULTICALL_CHUNK).map(|chunk| {
            let calls = chunk
                .iter()
                .map(|&wp| Call {
                    target: pool,
                    callData: contract.tickBitmap(wp).calldata().to_owned(),
                })
                .collect();
            self.aggregate(calls, block)
        });
        let return_data = try_join_all(batches).await?;

        let mut bitmaps = TickBitmap::default();
        for (&wp, raw) in word_positions.iter().zip(return_data.into_iter().flatten()) {
            let word = contract
                .tickBitmap(wp)
                .decode_output(raw)
                .map_err(|e| OnchainError::FailedToDecodeBitmap(e.to_string()))?;
            let word = U256::from(word);
            if !word.is_zero() {
                bitmaps.insert(wp, word);
            }
        }

        Ok(bitmaps)
    }

    /// Fetches the liquidity of the given ticks, dropping any that are no
    /// longer initialized.
    pub async fn fetch_ticks(
        &self,
        pool: Address,
        indices: &[i32],
        block: Option<BlockNumber>,
    ) -> Result<Vec<Tick>, OnchainError> {
        if indices.is_empty() {
            return Ok(Vec::new());
        }
        let contract = IV3Pool::new(pool, self.provider.clone());
        let ticks24 = indices
            .iter()
            .map(|&index| I24::try_from(index).map_err(|_| OnchainError::InvalidTick(index)))
            .collect::<Result<Vec<_>, _>>()?;

        let batches = ticks24.chunks(MULTICALL_CHUNK).map(|chunk| {
            let calls = chunk
                .iter()
                .map(|&tick| Call {
                    target: pool,
                    callData: contract.ticks(tick).calldata().to_owned(),
                })
                .collect();
            self.aggregate(calls, block)
        });
        let return_data = try_join_all(batches).await?;

        let mut ticks = Vec::with_capacity(indices.len());
        for ((&index, &tick), raw) in indices
            .iter()
            .zip(&ticks24)
            .zip(return_data.into_iter().flatten())
        {
            let decoded = contract
                .ticks(tick)
                .decode_output(raw)
                .map_err(|e| OnchainError::FailedToDecodeTick(e.to_string()))?;
            if decoded.liquidityGross != 0 {
                ticks.push(Tick {
                    index,
                    liquidity_gross: decoded.liquidityGross,
                    liquidity_net: decoded.liquidityNet,
                });
            }
        }

        Ok(ticks)
    }
}

#[async_trait]
impl<P> PoolStateFetcher for RpcFetcher<P>
where
    P: Provider + Send + Sync + 'static,
{
    type Error = OnchainError;

    async fn fetch_pool_state(
        &self,
        pool: Address,
        block: Option<BlockNumber>,
    ) -> Result<PoolState, OnchainError> {
        let contract = IV3Pool::new(pool, self.provider.clone());

        let (slot0, liquidity, fee, tick_spacing, token0, token1) = futures::try_join!(
            call_at!(contract.slot0(), block, OnchainError::FailedToGetSlot0),
            call_at!(contract.liquidity(), block, OnchainError::FailedToGetLiquidity),
            call_at!(contract.fee(), block, OnchainError::FailedToGetFee),
            call_at!(contract.tickSpacing(), block, OnchainError::FailedToGetTickSpacing),
            call_at!(contract.token0(), block, OnchainError::FailedToGetTokens),
            call_at!(contract.token1(), block, OnchainError::FailedToGetTokens),
        )?;

        Ok(PoolState {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
            liquidity,
            fee: fee.to::<u32>(),
            tick_spacing: tick_spacing.as_i32(),
            token0,
            token1,
        })
    }
}

#[async_trait]
impl<P> TickFetcher for RpcFetcher<P>
where
    P: Provider + Send + Sync + 'static,
{
    type Error = OnchainError;

    async fn fetch_ticks_in_range(
        &self,
        pool: Address,
        tick_lower: i32,
        tick_upper: i32,
        block: Option<BlockNumber>,
    ) -> Result<Vec<Tick>, OnchainError> {
        let contract = IV3Pool::new(pool, self.provider.clone());
        let tick_spacing = call_at!(
            contract.tickSpacing(),
            block,
            OnchainError::FailedToGetTickSpacing
        )
        .await?
        .as_i32();
        if tick_spacing <= 0 {
            return Err(OnchainError::FailedToGetTickSpacing(format!(
                "non-positive tick spacing {tick_spacing}"
            )));
        }

        let words: Vec<i16> = word_range(tick_lower, tick_upper, tick_spacing).collect();
        let bitmaps = self.fetch_bitmaps(pool, &words, block).await?;

        let mut indices: Vec<i32> = bitmaps
            .iter()
            .flat_map(|(&wp, &word)| initialized_ticks_in_word(wp, word, tick_spacing))
            .filter(|tick| (tick_lower..=tick_upper).contains(tick))
            .collect();
        indices.sort_unstable();
        debug!(pool = %pool, words = words.len(), ticks = indices.len(), "scanned tick bitmap");

        self.fetch_ticks(pool, &indices, block).await
    }
}
