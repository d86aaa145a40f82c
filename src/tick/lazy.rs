use super::{Tick, TickDataProvider, TickList};
use crate::error::{Error, ProviderError, TickListError};
use crate::math::tick_math::{max_usable_tick, min_usable_tick};
use alloy_primitives::{Address, BlockNumber};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Reads initialized ticks of a pool from some external source.
#[async_trait]
pub trait TickFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All initialized ticks with `tick_lower <= index <= tick_upper`.
    /// `block` of `None` reads the latest state.
    async fn fetch_ticks_in_range(
        &self,
        pool: Address,
        tick_lower: i32,
        tick_upper: i32,
        block: Option<BlockNumber>,
    ) -> Result<Vec<Tick>, Self::Error>;
}

/// Tick data that is fetched on first use and served from memory after.
///
/// The whole usable tick range is loaded in one fetch. Concurrent first
/// accesses wait on the same fetch. A failed fetch is not cached.
#[derive(Debug)]
pub struct LazyTickDataProvider<F> {
    fetcher: F,
    pool: Address,
    tick_spacing: i32,
    block: Option<BlockNumber>,
    ticks: OnceCell<TickList>,
}

impl<F: TickFetcher> LazyTickDataProvider<F> {
    pub fn new(fetcher: F, pool: Address, tick_spacing: i32, block: Option<BlockNumber>) -> Self {
        Self {
            fetcher,
            pool,
            tick_spacing,
            block,
            ticks: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.ticks.initialized()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The cached snapshot, fetching it first if needed.
    pub async fn tick_list(&self) -> Result<&TickList, Error> {
        self.ticks.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<TickList, Error> {
        if self.tick_spacing <= 0 {
            return Err(TickListError::TickSpacingNonzero.into());
        }
        let tick_lower = min_usable_tick(self.tick_spacing)?;
        let tick_upper = max_usable_tick(self.tick_spacing)?;
        debug!(pool = %self.pool, tick_lower, tick_upper, block = ?self.block, "fetching ticks");

        let ticks = self
            .fetcher
            .fetch_ticks_in_range(self.pool, tick_lower, tick_upper, self.block)
            .await
            .map_err(|err| {
                warn!(pool = %self.pool, error = %err, "tick fetch failed");
                ProviderError::fetch(err)
            })?;

        debug!(pool = %self.pool, count = ticks.len(), "fetched ticks");
        Ok(TickList::new(ticks, self.tick_spacing)?)
    }
}

#[async_trait]
impl<F: TickFetcher> TickDataProvider for LazyTickDataProvider<F> {
    async fn get_tick(&self, index: i32) -> Result<Tick, Error> {
        Ok(*self.tick_list().await?.get_tick(index)?)
    }

    async fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        Ok(self
            .tick_list()
            .await?
            .next_initialized_tick_within_one_word(tick, lte, tick_spacing)?)
    }
}
