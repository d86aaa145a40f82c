use super::{Tick, TickList};
use crate::error::{Error, ProviderError};
use async_trait::async_trait;

/// Source of tick data for the swap driver.
///
/// Only the lazy provider ever suspends; in-memory sources answer
/// immediately.
#[async_trait]
pub trait TickDataProvider: Send + Sync {
    /// The tick at `index`, failing if it is not initialized.
    async fn get_tick(&self, index: i32) -> Result<Tick, Error>;

    /// The next initialized tick within the current bitmap word, or the
    /// word boundary with `false`.
    async fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error>;
}

#[async_trait]
impl<T> TickDataProvider for &T
where
    T: TickDataProvider + ?Sized,
{
    async fn get_tick(&self, index: i32) -> Result<Tick, Error> {
        (**self).get_tick(index).await
    }

    async fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        (**self)
            .next_initialized_tick_within_one_word(tick, lte, tick_spacing)
            .await
    }
}

#[async_trait]
impl TickDataProvider for TickList {
    async fn get_tick(&self, index: i32) -> Result<Tick, Error> {
        Ok(*TickList::get_tick(self, index)?)
    }

    async fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        Ok(TickList::next_initialized_tick_within_one_word(
            self,
            tick,
            lte,
            tick_spacing,
        )?)
    }
}

/// Placeholder for pools constructed without tick data. Every query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoTickDataProvider;

#[async_trait]
impl TickDataProvider for NoTickDataProvider {
    async fn get_tick(&self, _index: i32) -> Result<Tick, Error> {
        Err(ProviderError::NoTickDataProvider.into())
    }

    async fn next_initialized_tick_within_one_word(
        &self,
        _tick: i32,
        _lte: bool,
        _tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        Err(ProviderError::NoTickDataProvider.into())
    }
}
