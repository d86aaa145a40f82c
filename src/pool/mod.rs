//! Pool snapshot, the swap driver and the interfaces used to load pool
//! state from an external source.

#[cfg(feature = "onchain")]
pub mod onchain;
pub mod swap;

use crate::error::{Error, ProviderError, StateError};
use crate::math::swap_math::MAX_FEE_PIPS;
use crate::math::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use crate::tick::{LazyTickDataProvider, TickDataProvider, TickFetcher};
use alloy_primitives::{Address, BlockNumber, U256};
use async_trait::async_trait;
use tracing::debug;

/// Pool state as read from the pool contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
    pub fee: u32,
    pub tick_spacing: i32,
    pub token0: Address,
    pub token1: Address,
}

/// Reads the current state of a pool from some external source.
#[async_trait]
pub trait PoolStateFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_pool_state(
        &self,
        pool: Address,
        block: Option<BlockNumber>,
    ) -> Result<PoolState, Self::Error>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Returns the token pair sorted by address, the order pools store them in.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// An immutable snapshot of a pool. Swaps never mutate it; they return the
/// end state instead.
#[derive(Clone, Debug)]
pub struct Pool<P> {
    pub pool_address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee_pips: u32,
    pub tick_spacing: i32,
    pub slot0: Slot0,
    pub liquidity: u128,
    pub tick_data_provider: P,
}

fn check_config(fee_pips: u32, tick_spacing: i32) -> Result<(), StateError> {
    if fee_pips >= MAX_FEE_PIPS {
        return Err(StateError::InvalidFee);
    }
    if tick_spacing <= 0 {
        return Err(StateError::TickSpacing);
    }
    Ok(())
}

impl<P> Pool<P> {
    /// Constructs a pool at `sqrt_price_x96`, deriving the current tick from
    /// the price.
    pub fn new(
        token_a: Address,
        token_b: Address,
        fee_pips: u32,
        tick_spacing: i32,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick_data_provider: P,
    ) -> Result<Self, Error> {
        check_config(fee_pips, tick_spacing)?;
        let tick = get_tick_at_sqrt_ratio(sqrt_price_x96)?;
        let (token0, token1) = sort_tokens(token_a, token_b);

        Ok(Self {
            pool_address: Address::ZERO,
            token0,
            token1,
            fee_pips,
            tick_spacing,
            slot0: Slot0 {
                sqrt_price_x96,
                tick,
            },
            liquidity,
            tick_data_provider,
        })
    }

    /// Constructs a pool from fetched state. The reported tick must be
    /// consistent with the price.
    pub fn from_state(
        pool_address: Address,
        state: PoolState,
        tick_data_provider: P,
    ) -> Result<Self, Error> {
        check_config(state.fee, state.tick_spacing)?;

        let lower = get_sqrt_ratio_at_tick(state.tick)?;
        let upper = get_sqrt_ratio_at_tick(state.tick + 1)?;
        if state.sqrt_price_x96 < lower || state.sqrt_price_x96 > upper {
            return Err(StateError::PriceBounds.into());
        }

        let (token0, token1) = sort_tokens(state.token0, state.token1);
        Ok(Self {
            pool_address,
            token0,
            token1,
            fee_pips: state.fee,
            tick_spacing: state.tick_spacing,
            slot0: Slot0 {
                sqrt_price_x96: state.sqrt_price_x96,
                tick: state.tick,
            },
            liquidity: state.liquidity,
            tick_data_provider,
        })
    }

    pub fn involves_token(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }

    /// The same snapshot reading ticks through a reference to this pool's
    /// provider.
    pub fn by_ref(&self) -> Pool<&P> {
        Pool {
            pool_address: self.pool_address,
            token0: self.token0,
            token1: self.token1,
            fee_pips: self.fee_pips,
            tick_spacing: self.tick_spacing,
            slot0: self.slot0,
            liquidity: self.liquidity,
            tick_data_provider: &self.tick_data_provider,
        }
    }
}

impl<F> Pool<LazyTickDataProvider<F>>
where
    F: PoolStateFetcher + TickFetcher,
{
    /// Reads the pool state now and defers fetching ticks until a swap
    /// first needs them.
    pub async fn load(
        fetcher: F,
        pool_address: Address,
        block: Option<BlockNumber>,
    ) -> Result<Self, Error> {
        let state = fetcher
            .fetch_pool_state(pool_address, block)
            .await
            .map_err(ProviderError::fetch)?;
        debug!(pool = %pool_address, tick = state.tick, liquidity = state.liquidity, "loaded pool state");

        let tick_spacing = state.tick_spacing;
        Self::from_state(
            pool_address,
            state,
            LazyTickDataProvider::new(fetcher, pool_address, tick_spacing, block),
        )
    }
}

impl<P: TickDataProvider> Pool<P> {
    /// Liquidity net of an initialized tick.
    pub async fn liquidity_net(&self, tick: i32) -> Result<i128, Error> {
        Ok(self.tick_data_provider.get_tick(tick).await?.liquidity_net)
    }
}
