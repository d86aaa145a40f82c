mod lazy;
mod provider;
mod tick_list;

pub use lazy::{LazyTickDataProvider, TickFetcher};
pub use provider::{NoTickDataProvider, TickDataProvider};
pub use tick_list::TickList;

use crate::error::StateError;
use crate::math::math_helpers::sub_in_256;
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use alloy_primitives::U256;

/// An initialized tick: liquidity referencing it and the delta applied to
/// active liquidity when the price crosses it moving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tick {
    pub index: i32,
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
}

impl Tick {
    pub fn new(index: i32, liquidity_gross: u128, liquidity_net: i128) -> Result<Self, StateError> {
        if !(MIN_TICK..=MAX_TICK).contains(&index) {
            return Err(StateError::TickOutOfBounds);
        }
        Ok(Self {
            index,
            liquidity_gross,
            liquidity_net,
        })
    }
}

/// Fee growth per unit of liquidity on the other side of a tick from the
/// current price, as Q128.128 accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeGrowthOutside {
    pub fee_growth_outside_0_x128: U256,
    pub fee_growth_outside_1_x128: U256,
}

/// Fee growth inside `[tick_lower, tick_upper)` for both tokens.
///
/// Every subtraction wraps modulo 2^256 like the accumulators on chain.
pub fn get_fee_growth_inside(
    lower: &FeeGrowthOutside,
    upper: &FeeGrowthOutside,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let (below_0, below_1) = if tick_current >= tick_lower {
        (lower.fee_growth_outside_0_x128, lower.fee_growth_outside_1_x128)
    } else {
        (
            sub_in_256(fee_growth_global_0_x128, lower.fee_growth_outside_0_x128),
            sub_in_256(fee_growth_global_1_x128, lower.fee_growth_outside_1_x128),
        )
    };

    let (above_0, above_1) = if tick_current < tick_upper {
        (upper.fee_growth_outside_0_x128, upper.fee_growth_outside_1_x128)
    } else {
        (
            sub_in_256(fee_growth_global_0_x128, upper.fee_growth_outside_0_x128),
            sub_in_256(fee_growth_global_1_x128, upper.fee_growth_outside_1_x128),
        )
    };

    (
        sub_in_256(sub_in_256(fee_growth_global_0_x128, below_0), above_0),
        sub_in_256(sub_in_256(fee_growth_global_1_x128, below_1), above_1),
    )
}
