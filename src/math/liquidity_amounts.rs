//! Conversions between liquidity and token amounts for a price range.
//!
//! The `get_*` functions reproduce the periphery `LiquidityAmounts` library
//! (results bounded to `u128`). The `max_liquidity_*` functions follow the
//! SDK, which sizes positions with unbounded integers; here they run in a
//! 768‑bit intermediate and return a `U512`.

use crate::Q96;
use crate::error::{Error, MathError};
use crate::math::math_helpers::mul_div;
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use alloy_primitives::{U256, U512, Uint};

type U768 = Uint<768, 12>;

#[inline]
fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b { (b, a) } else { (a, b) }
}

#[inline]
fn to_u128(value: U256) -> Result<u128, MathError> {
    u128::try_from(value).map_err(|_| MathError::Overflow)
}

/// Liquidity received for `amount0` of token0 over `[sqrt_ratio_a, sqrt_ratio_b]`.
pub fn get_liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> Result<u128, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let intermediate = mul_div(a, b, Q96)?;
    to_u128(mul_div(amount0, intermediate, b - a)?)
}

/// Liquidity received for `amount1` of token1 over `[sqrt_ratio_a, sqrt_ratio_b]`.
pub fn get_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    to_u128(mul_div(amount1, Q96, b - a)?)
}

/// Maximum liquidity that `amount0` and `amount1` can back at the current price.
pub fn get_liquidity_for_amounts(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= a {
        get_liquidity_for_amount0(a, b, amount0)
    } else if sqrt_ratio_x96 < b {
        let liquidity0 = get_liquidity_for_amount0(sqrt_ratio_x96, b, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(a, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount1(a, b, amount1)
    }
}

/// Token amounts represented by `liquidity` at the current price, rounded down.
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
) -> Result<(U256, U256), Error> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= a {
        Ok((get_amount_0_delta(a, b, liquidity, false)?, U256::ZERO))
    } else if sqrt_ratio_x96 < b {
        Ok((
            get_amount_0_delta(sqrt_ratio_x96, b, liquidity, false)?,
            get_amount_1_delta(a, sqrt_ratio_x96, liquidity, false)?,
        ))
    } else {
        Ok((U256::ZERO, get_amount_1_delta(a, b, liquidity, false)?))
    }
}

/// `amount0 * (sqrt_a * sqrt_b / Q96) / (sqrt_b - sqrt_a)`, dividing by
/// `Q96` early the way older routers did.
fn max_liquidity_for_amount0_imprecise(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> Result<U768, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let intermediate = U768::from(a) * U768::from(b) / U768::from(Q96);
    (U768::from(amount0) * intermediate)
        .checked_div(U768::from(b - a))
        .ok_or(MathError::DivisionByZero)
}

/// `amount0 * sqrt_a * sqrt_b / (Q96 * (sqrt_b - sqrt_a))` with a single
/// final division.
fn max_liquidity_for_amount0_precise(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> Result<U768, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let numerator = U768::from(amount0) * U768::from(a) * U768::from(b);
    let denominator = U768::from(Q96) * U768::from(b - a);
    numerator
        .checked_div(denominator)
        .ok_or(MathError::DivisionByZero)
}

fn max_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> Result<U768, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    (U768::from(amount1) << 96usize)
        .checked_div(U768::from(b - a))
        .ok_or(MathError::DivisionByZero)
}

/// Computes the maximum liquidity received for the given token amounts,
/// the current price and the price range bounds.
///
/// `use_full_precision` picks the token0 formula: `false` reproduces the
/// legacy router rounding, `true` defers the division by `Q96`.
pub fn max_liquidity_for_amounts(
    sqrt_ratio_current_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
    use_full_precision: bool,
) -> Result<U512, MathError> {
    let (a, b) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    let for_amount0 = if use_full_precision {
        max_liquidity_for_amount0_precise
    } else {
        max_liquidity_for_amount0_imprecise
    };

    let liquidity = if sqrt_ratio_current_x96 <= a {
        for_amount0(a, b, amount0)?
    } else if sqrt_ratio_current_x96 < b {
        let liquidity0 = for_amount0(sqrt_ratio_current_x96, b, amount0)?;
        let liquidity1 = max_liquidity_for_amount1(a, sqrt_ratio_current_x96, amount1)?;
        liquidity0.min(liquidity1)
    } else {
        max_liquidity_for_amount1(a, b, amount1)?
    };

    U512::checked_from_limbs_slice(liquidity.as_limbs()).ok_or(MathError::Overflow)
}
