//! Liquidity positions: token amounts, sizing from amounts and fees owed.

use crate::Q128;
use crate::error::{Error, MathError, StateError};
use crate::math::liquidity_amounts::max_liquidity_for_amounts;
use crate::math::math_helpers::{mul_div, sub_in_256};
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use crate::math::tick_math::{MAX_TICK, MIN_TICK, get_sqrt_ratio_at_tick};
use crate::pool::Pool;
use alloy_primitives::U256;

/// Fees owed to a position since its last snapshot of fee growth inside its
/// range, as `(owed0, owed1)`.
///
/// Growth deltas wrap modulo 2^256.
pub fn get_tokens_owed(
    fee_growth_inside_0_last_x128: U256,
    fee_growth_inside_1_last_x128: U256,
    liquidity: u128,
    fee_growth_inside_0_x128: U256,
    fee_growth_inside_1_x128: U256,
) -> Result<(U256, U256), MathError> {
    let liquidity = U256::from(liquidity);
    let owed0 = mul_div(
        sub_in_256(fee_growth_inside_0_x128, fee_growth_inside_0_last_x128),
        liquidity,
        Q128,
    )?;
    let owed1 = mul_div(
        sub_in_256(fee_growth_inside_1_x128, fee_growth_inside_1_last_x128),
        liquidity,
        Q128,
    )?;
    Ok((owed0, owed1))
}

/// Liquidity over `[tick_lower, tick_upper)` in a pool.
#[derive(Clone, Copy, Debug)]
pub struct Position<'a, P> {
    pub pool: &'a Pool<P>,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

impl<'a, P> Position<'a, P> {
    pub fn new(
        pool: &'a Pool<P>,
        liquidity: u128,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<Self, StateError> {
        if pool.tick_spacing <= 0 {
            return Err(StateError::TickSpacing);
        }
        if tick_lower >= tick_upper {
            return Err(StateError::TickOrder);
        }
        if tick_lower < MIN_TICK || tick_lower % pool.tick_spacing != 0 {
            return Err(StateError::TickLower);
        }
        if tick_upper > MAX_TICK || tick_upper % pool.tick_spacing != 0 {
            return Err(StateError::TickUpper);
        }
        Ok(Self {
            pool,
            tick_lower,
            tick_upper,
            liquidity,
        })
    }

    fn sqrt_ratios(&self) -> Result<(U256, U256), StateError> {
        Ok((
            get_sqrt_ratio_at_tick(self.tick_lower)?,
            get_sqrt_ratio_at_tick(self.tick_upper)?,
        ))
    }

    fn amounts(&self, round_up: bool) -> Result<(U256, U256), Error> {
        let (sqrt_ratio_lower, sqrt_ratio_upper) = self.sqrt_ratios()?;
        let tick_current = self.pool.slot0.tick;
        let sqrt_price = self.pool.slot0.sqrt_price_x96;

        if tick_current < self.tick_lower {
            Ok((
                get_amount_0_delta(sqrt_ratio_lower, sqrt_ratio_upper, self.liquidity, round_up)?,
                U256::ZERO,
            ))
        } else if tick_current < self.tick_upper {
            Ok((
                get_amount_0_delta(sqrt_price, sqrt_ratio_upper, self.liquidity, round_up)?,
                get_amount_1_delta(sqrt_ratio_lower, sqrt_price, self.liquidity, round_up)?,
            ))
        } else {
            Ok((
                U256::ZERO,
                get_amount_1_delta(sqrt_ratio_lower, sqrt_ratio_upper, self.liquidity, round_up)?,
            ))
        }
    }

    /// Token0 the position holds at the pool's price, rounded down.
    pub fn amount0(&self) -> Result<U256, Error> {
        Ok(self.amounts(false)?.0)
    }

    /// Token1 the position holds at the pool's price, rounded down.
    pub fn amount1(&self) -> Result<U256, Error> {
        Ok(self.amounts(false)?.1)
    }

    /// Amounts required to mint the position, rounded up.
    pub fn mint_amounts(&self) -> Result<(U256, U256), Error> {
        self.amounts(true)
    }

    /// The largest position the given amounts can back at the pool's price.
    ///
    /// `use_full_precision` selects the token0 formula, see
    /// [`max_liquidity_for_amounts`].
    pub fn from_amounts(
        pool: &'a Pool<P>,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        amount1: U256,
        use_full_precision: bool,
    ) -> Result<Self, Error> {
        let sqrt_ratio_lower = get_sqrt_ratio_at_tick(tick_lower)?;
        let sqrt_ratio_upper = get_sqrt_ratio_at_tick(tick_upper)?;
        let liquidity = max_liquidity_for_amounts(
            pool.slot0.sqrt_price_x96,
            sqrt_ratio_lower,
            sqrt_ratio_upper,
            amount0,
            amount1,
            use_full_precision,
        )?;
        let liquidity = u128::try_from(liquidity).map_err(|_| MathError::Overflow)?;
        Ok(Self::new(pool, liquidity, tick_lower, tick_upper)?)
    }

    /// The largest position `amount0` can back, with token1 unbounded.
    pub fn from_amount0(
        pool: &'a Pool<P>,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        use_full_precision: bool,
    ) -> Result<Self, Error> {
        Self::from_amounts(
            pool,
            tick_lower,
            tick_upper,
            amount0,
            U256::MAX,
            use_full_precision,
        )
    }

    /// The largest position `amount1` can back, with token0 unbounded.
    pub fn from_amount1(
        pool: &'a Pool<P>,
        tick_lower: i32,
        tick_upper: i32,
        amount1: U256,
    ) -> Result<Self, Error> {
        // precision only matters for the token0 bound
        Self::from_amounts(pool, tick_lower, tick_upper, U256::MAX, amount1, true)
    }
}
