//! Concentrated-liquidity AMM math and swap simulation in pure Rust.
//!
//! Reproduces the fixed-point arithmetic of Uniswap V3 style pools bit for
//! bit, so a swap can be quoted off-chain with the exact amounts, price and
//! liquidity the contract would produce.
//!
//! This crate exposes:
//! - Low‑level math primitives (`math::*`) for ticks, prices, bitmaps,
//!   swap steps and liquidity amounts.
//! - Tick data (`tick::*`): a validated in‑memory `TickList` and providers
//!   that fetch ticks lazily.
//! - An immutable `Pool` snapshot with an async swap driver.
//! - Position sizing and fee accounting (`position`), exact fractions and
//!   slippage helpers (`fraction`).
//! - Optional `onchain` helpers that load pools from a node.
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use clmm_swap_sim::{math::tick_math, RESOLUTION, U256};
//!
//! let sqrt_price = tick_math::get_sqrt_ratio_at_tick(0).unwrap();
//! assert!(sqrt_price > U256::ZERO);
//! assert_eq!(tick_math::get_tick_at_sqrt_ratio(sqrt_price).unwrap(), 0);
//! assert_eq!(RESOLUTION, 96);
//! ```
//!
//! ## Simulating a swap against an in‑memory tick list
//! ```no_run
//! use clmm_swap_sim::{
//!     math::tick_math::get_sqrt_ratio_at_tick,
//!     Address, Pool, Tick, TickList, U256,
//! };
//!
//! # async fn quote() -> Result<(), clmm_swap_sim::Error> {
//! let ticks = TickList::new(
//!     vec![
//!         Tick { index: -600, liquidity_gross: 10u128.pow(18), liquidity_net: 10i128.pow(18) },
//!         Tick { index: 600, liquidity_gross: 10u128.pow(18), liquidity_net: -10i128.pow(18) },
//!     ],
//!     60,
//! )?;
//! # let token_a = Address::ZERO;
//! # let token_b = Address::repeat_byte(1);
//! let pool = Pool::new(
//!     token_a,
//!     token_b,
//!     3000,
//!     60,
//!     get_sqrt_ratio_at_tick(0)?,
//!     10u128.pow(18),
//!     ticks,
//! )?;
//!
//! // sell 0.001 token0
//! let outcome = pool
//!     .simulate_swap(U256::from(10u64.pow(15)), true, true)
//!     .await?;
//! println!("out: {}, end tick: {}", outcome.amount_out, outcome.end_tick);
//! # Ok(())
//! # }
//! ```

pub use alloy_primitives::{Address, BlockNumber, I256, U256, U512};

pub mod error;
pub mod fraction;
mod hash;
pub mod math;
pub mod pool;
pub mod position;
pub mod tick;

pub use error::Error;
pub use hash::FastMap;
pub use math::tick_math::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
pub use pool::{Pool, PoolState, PoolStateFetcher};
pub use tick::{
    LazyTickDataProvider, NoTickDataProvider, Tick, TickDataProvider, TickFetcher, TickList,
};

/// The largest value a `uint160` holds.
const U160_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, 4294967295, 0]);

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
pub const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_constants() {
        assert_eq!(Q96, U256::ONE << RESOLUTION);
        assert_eq!(Q128, U256::ONE << 128);
        assert_eq!(U160_MAX, (U256::ONE << 160) - U256::ONE);
    }
}
