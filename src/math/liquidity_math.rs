use crate::error::MathError;

/// Applies a signed liquidity delta to an unsigned liquidity value.
///
/// Mirrors `LiquidityMath.addDelta`: a negative `y` subtracts `|y|`, and
/// leaving the `u128` range in either direction is an error.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs()).ok_or(MathError::Underflow)
    } else {
        x.checked_add(y as u128).ok_or(MathError::Overflow)
    }
}
