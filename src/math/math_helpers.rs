use crate::error::MathError;
use alloy_primitives::{U256, U512, Uint};

const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Computes `floor(a * b / denominator)` with a full 512‑bit intermediate
/// product, returning a `MathError` on overflow or division by zero.
///
/// This mirrors the Solidity `FullMath.mulDiv` behavior and underpins
/// many of the higher‑level swap and liquidity calculations.
#[inline]
pub fn mul_div(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    // 512-bit product split as prod1 * 2^256 + prod0
    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);

    let (mut prod1, borrow1) = mm.overflowing_sub(prod0);
    if borrow1 {
        prod1 = prod1.wrapping_sub(U256::ONE);
    }

    if prod1.is_zero() {
        return Ok(prod0.wrapping_div(denominator));
    }

    if denominator <= prod1 {
        return Err(MathError::Overflow);
    }

    let remainder = a.mul_mod(b, denominator);
    let (prod0_new, borrow2) = prod0.overflowing_sub(remainder);
    prod0 = prod0_new;
    if borrow2 {
        prod1 = prod1.wrapping_sub(U256::ONE);
    }

    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_adj = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256::ONE);
    prod0 |= prod1.wrapping_mul(twos_adj);

    // Newton-Raphson inverse of the odd denominator mod 2^256, correct to
    // 4 bits from the seed and doubling each round.
    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;
    for _ in 0..6 {
        inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)));
    }

    Ok(prod0.wrapping_mul(inv))
}

/// Like [`mul_div`], but rounds the result up when there is a
/// non‑zero remainder, returning an overflow error if the result
/// would exceed `U256::MAX`.
#[inline]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let result = mul_div(a, b, denominator)?;

    if a.mul_mod(b, denominator).is_zero() {
        return Ok(result);
    }
    result.checked_add(U256::ONE).ok_or(MathError::Overflow)
}

/// Divides `a` by `b`, rounding the result up to the next integer
/// when there is a non‑zero remainder.
///
/// This will panic on division by zero, mirroring primitive integer
/// division, so callers must ensure `b != 0`.
#[inline]
pub fn div_rounding_up(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::ONE
    }
}

/// `(x - y) mod 2^256`. Fee growth accumulators are allowed to wrap, so
/// their differences must wrap too.
#[inline]
pub fn sub_in_256(x: U256, y: U256) -> U256 {
    x.wrapping_sub(y)
}

/// Integer square root, `floor(sqrt(y))`, by the Babylonian method.
///
/// Works for any width; [`encode_sqrt_ratio_x96`] uses it on 512-bit values.
pub fn sqrt<const BITS: usize, const LIMBS: usize>(y: Uint<BITS, LIMBS>) -> Uint<BITS, LIMBS> {
    if y.is_zero() {
        return y;
    }
    // 1 <= y <= 3
    if (y >> 2usize).is_zero() {
        return Uint::ONE;
    }

    let mut z = y;
    let mut x = (y >> 1usize) + Uint::ONE;
    while x < z {
        z = x;
        x = (y / x + x) >> 1usize;
    }
    z
}

/// Returns the Q64.96 square root price for the ratio `amount1 / amount0`.
///
/// The ratio is formed in 512 bits so any pair of `U256` amounts is accepted.
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<U256, MathError> {
    if amount0.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let ratio_x192 = (U512::from(amount1) << 192usize) / U512::from(amount0);
    let root = sqrt(ratio_x192);

    // sqrt of a 512-bit value always fits in the low 256 bits
    Ok(U256::from_limbs_slice(&root.as_limbs()[..4]))
}
