//! Exact rational arithmetic for prices and slippage.

use crate::error::{ConfigError, Error, MathError, SwapError};
use crate::math::math_helpers::mul_div;
use alloy_primitives::{I256, U256, U512};
use std::cmp::Ordering;
use std::str::FromStr;

/// How `to_fixed` treats digits past the requested precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rounding {
    /// Truncate toward zero.
    #[default]
    RoundDown = 0,
    /// Nearest, ties away from zero.
    RoundHalfUp = 1,
    /// Away from zero.
    RoundUp = 2,
}

impl TryFrom<u8> for Rounding {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, ConfigError> {
        match value {
            0 => Ok(Self::RoundDown),
            1 => Ok(Self::RoundHalfUp),
            2 => Ok(Self::RoundUp),
            other => Err(ConfigError::UnknownRounding(other.to_string())),
        }
    }
}

impl FromStr for Rounding {
    type Err = ConfigError;

    /// Accepts `ROUND_DOWN`, `round_half_up`, `RoundUp` and similar spellings.
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "rounddown" => Ok(Self::RoundDown),
            "roundhalfup" => Ok(Self::RoundHalfUp),
            "roundup" => Ok(Self::RoundUp),
            _ => Err(ConfigError::UnknownRounding(s.to_owned())),
        }
    }
}

/// A signed ratio with a positive denominator.
#[derive(Debug, Clone, Copy)]
pub struct Fraction {
    numerator: I256,
    denominator: I256,
}

fn checked_mul(a: I256, b: I256) -> Result<I256, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

impl Fraction {
    pub fn new(numerator: I256, denominator: I256) -> Result<Self, MathError> {
        if denominator.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        if denominator.is_negative() {
            return Ok(Self {
                numerator: numerator.checked_neg().ok_or(MathError::Overflow)?,
                denominator: denominator.checked_neg().ok_or(MathError::Overflow)?,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn from_integer(value: I256) -> Self {
        Self {
            numerator: value,
            denominator: I256::ONE,
        }
    }

    pub fn numerator(&self) -> I256 {
        self.numerator
    }

    pub fn denominator(&self) -> I256 {
        self.denominator
    }

    /// Integer part, truncated toward zero.
    pub fn quotient(&self) -> I256 {
        self.numerator / self.denominator
    }

    /// What is left after removing the quotient, over the same denominator.
    pub fn remainder(&self) -> Self {
        Self {
            numerator: self.numerator % self.denominator,
            denominator: self.denominator,
        }
    }

    pub fn invert(&self) -> Result<Self, MathError> {
        Self::new(self.denominator, self.numerator)
    }

    pub fn add(&self, other: &Self) -> Result<Self, MathError> {
        if self.denominator == other.denominator {
            let numerator = self
                .numerator
                .checked_add(other.numerator)
                .ok_or(MathError::Overflow)?;
            return Self::new(numerator, self.denominator);
        }
        let numerator = checked_mul(self.numerator, other.denominator)?
            .checked_add(checked_mul(other.numerator, self.denominator)?)
            .ok_or(MathError::Overflow)?;
        Self::new(numerator, checked_mul(self.denominator, other.denominator)?)
    }

    pub fn subtract(&self, other: &Self) -> Result<Self, MathError> {
        let negated = Self {
            numerator: other.numerator.checked_neg().ok_or(MathError::Overflow)?,
            denominator: other.denominator,
        };
        self.add(&negated)
    }

    pub fn multiply(&self, other: &Self) -> Result<Self, MathError> {
        Self::new(
            checked_mul(self.numerator, other.numerator)?,
            checked_mul(self.denominator, other.denominator)?,
        )
    }

    pub fn divide(&self, other: &Self) -> Result<Self, MathError> {
        Self::new(
            checked_mul(self.numerator, other.denominator)?,
            checked_mul(self.denominator, other.numerator)?,
        )
    }

    /// Decimal representation with exactly `decimal_places` digits after the
    /// point.
    pub fn to_fixed(&self, decimal_places: u8, rounding: Rounding) -> Result<String, MathError> {
        let scale = U512::from(10u8)
            .checked_pow(U512::from(decimal_places))
            .ok_or(MathError::Overflow)?;
        let scaled = U512::from(self.numerator.unsigned_abs())
            .checked_mul(scale)
            .ok_or(MathError::Overflow)?;
        let denominator = U512::from(self.denominator.unsigned_abs());

        let mut digits = scaled / denominator;
        let remainder = scaled % denominator;
        let round_away = match rounding {
            Rounding::RoundDown => false,
            Rounding::RoundHalfUp => remainder >= denominator - remainder,
            Rounding::RoundUp => !remainder.is_zero(),
        };
        if round_away {
            digits += U512::ONE;
        }

        let mut text = digits.to_string();
        let places = decimal_places as usize;
        if text.len() <= places {
            text = format!("{}{text}", "0".repeat(places + 1 - text.len()));
        }
        if places > 0 {
            text.insert(text.len() - places, '.');
        }
        if self.numerator.is_negative() && !digits.is_zero() {
            text.insert(0, '-');
        }
        Ok(text)
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let negative = self.numerator.is_negative();
        match (negative, other.numerator.is_negative()) {
            (false, true) => return Ordering::Greater,
            (true, false) => return Ordering::Less,
            _ => {}
        }

        // denominators are positive, so cross-multiplying keeps the order
        let lhs = U512::from(self.numerator.unsigned_abs())
            * U512::from(other.denominator.unsigned_abs());
        let rhs = U512::from(other.numerator.unsigned_abs())
            * U512::from(self.denominator.unsigned_abs());
        if negative { rhs.cmp(&lhs) } else { lhs.cmp(&rhs) }
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Equal in value, so `1/2 == 2/4`.
impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

/// A fraction displayed as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Fraction);

impl Percent {
    pub fn new(numerator: I256, denominator: I256) -> Result<Self, MathError> {
        Ok(Self(Fraction::new(numerator, denominator)?))
    }

    pub fn as_fraction(&self) -> &Fraction {
        &self.0
    }

    /// The percentage with `decimal_places` digits, `1/200` being `0.50`
    /// at two places.
    pub fn to_fixed(&self, decimal_places: u8, rounding: Rounding) -> Result<String, MathError> {
        let hundred = Fraction::from_integer(I256::from_raw(U256::from(100u8)));
        self.0.multiply(&hundred)?.to_fixed(decimal_places, rounding)
    }

    /// `(numerator, denominator)` as unsigned values, rejecting negative
    /// slippage.
    fn unsigned_parts(&self) -> Result<(U256, U256), Error> {
        if self.0.numerator.is_negative() {
            return Err(SwapError::SlippageTolerance.into());
        }
        Ok((
            self.0.numerator.unsigned_abs(),
            self.0.denominator.unsigned_abs(),
        ))
    }
}

/// Smallest output to accept for `amount_out` under `slippage`:
/// `floor(amount_out / (1 + slippage))`.
pub fn minimum_amount_out(slippage: &Percent, amount_out: U256) -> Result<U256, Error> {
    let (numerator, denominator) = slippage.unsigned_parts()?;
    let total = denominator
        .checked_add(numerator)
        .ok_or(MathError::Overflow)?;
    Ok(mul_div(amount_out, denominator, total)?)
}

/// Largest input to send for `amount_in` under `slippage`:
/// `floor(amount_in * (1 + slippage))`.
pub fn maximum_amount_in(slippage: &Percent, amount_in: U256) -> Result<U256, Error> {
    let (numerator, denominator) = slippage.unsigned_parts()?;
    let total = denominator
        .checked_add(numerator)
        .ok_or(MathError::Overflow)?;
    Ok(mul_div(amount_in, total, denominator)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(value: i64) -> I256 {
        I256::try_from(value).unwrap()
    }

    fn frac(numerator: i64, denominator: i64) -> Fraction {
        Fraction::new(i(numerator), i(denominator)).unwrap()
    }

    #[test]
    fn rounding_parses_from_discriminant_and_name() {
        assert_eq!(Rounding::try_from(0u8).unwrap(), Rounding::RoundDown);
        assert_eq!(Rounding::try_from(1u8).unwrap(), Rounding::RoundHalfUp);
        assert_eq!(Rounding::try_from(2u8).unwrap(), Rounding::RoundUp);
        assert_eq!(Rounding::try_from(3u8).unwrap_err().code(), "ROUNDING");

        assert_eq!("ROUND_HALF_UP".parse::<Rounding>().unwrap(), Rounding::RoundHalfUp);
        assert_eq!("round_down".parse::<Rounding>().unwrap(), Rounding::RoundDown);
        assert_eq!("RoundUp".parse::<Rounding>().unwrap(), Rounding::RoundUp);
        assert!(matches!(
            "bankers".parse::<Rounding>(),
            Err(ConfigError::UnknownRounding(s)) if s == "bankers"
        ));
    }

    #[test]
    fn new_normalizes_sign_and_rejects_zero_denominator() {
        let f = frac(1, -2);
        assert_eq!(f.numerator(), i(-1));
        assert_eq!(f.denominator(), i(2));
        assert!(matches!(
            Fraction::new(i(1), I256::ZERO),
            Err(MathError::DivisionByZero)
        ));
    }

    #[test]
    fn quotient_truncates_toward_zero() {
        assert_eq!(frac(8, 3).quotient(), i(2));
        assert_eq!(frac(12, 4).quotient(), i(3));
        assert_eq!(frac(16, 5).quotient(), i(3));
        assert_eq!(frac(-8, 3).quotient(), i(-2));
    }

    #[test]
    fn remainder_keeps_the_denominator() {
        assert_eq!(frac(8, 3).remainder(), frac(2, 3));
        assert_eq!(frac(12, 4).remainder(), frac(0, 4));
        assert_eq!(frac(16, 5).remainder().numerator(), i(1));
    }

    #[test]
    fn invert_swaps_parts() {
        let inverted = frac(5, 10).invert().unwrap();
        assert_eq!(inverted.numerator(), i(10));
        assert_eq!(inverted.denominator(), i(5));

        let inverted = frac(-3, 4).invert().unwrap();
        assert_eq!(inverted.numerator(), i(-4));
        assert_eq!(inverted.denominator(), i(3));

        assert!(matches!(
            frac(0, 4).invert(),
            Err(MathError::DivisionByZero)
        ));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(frac(1, 10).add(&frac(4, 12)).unwrap(), frac(52, 120));
        let same = frac(1, 5).add(&frac(2, 5)).unwrap();
        assert_eq!((same.numerator(), same.denominator()), (i(3), i(5)));

        assert_eq!(frac(1, 10).subtract(&frac(4, 12)).unwrap(), frac(-28, 120));
        assert_eq!(frac(1, 10).multiply(&frac(4, 12)).unwrap(), frac(4, 120));
        assert_eq!(frac(1, 10).divide(&frac(4, 12)).unwrap(), frac(12, 40));

        let big = Fraction::from_integer(I256::MAX);
        assert!(matches!(
            big.add(&Fraction::from_integer(I256::ONE)),
            Err(MathError::Overflow)
        ));
    }

    #[test]
    fn comparisons_are_by_value() {
        assert_eq!(frac(1, 2), frac(2, 4));
        assert!(frac(1, 10) < frac(4, 12));
        assert!(frac(4, 12) > frac(1, 10));
        assert!(frac(-1, 2) < frac(1, 3));
        assert!(frac(-1, 2) < frac(-1, 3));
        assert!(frac(0, 7) > frac(-1, 1000));
        assert_eq!(frac(0, 7), frac(0, 1));
    }

    #[test]
    fn to_fixed_rounds_per_mode() {
        assert_eq!(frac(1, 3).to_fixed(4, Rounding::RoundHalfUp).unwrap(), "0.3333");
        assert_eq!(frac(2, 3).to_fixed(4, Rounding::RoundHalfUp).unwrap(), "0.6667");
        assert_eq!(frac(2, 3).to_fixed(4, Rounding::RoundDown).unwrap(), "0.6666");
        assert_eq!(frac(1, 3).to_fixed(4, Rounding::RoundUp).unwrap(), "0.3334");
        assert_eq!(frac(-1, 3).to_fixed(4, Rounding::RoundHalfUp).unwrap(), "-0.3333");
        assert_eq!(frac(1, 2).to_fixed(0, Rounding::RoundHalfUp).unwrap(), "1");
        assert_eq!(frac(1, 2).to_fixed(0, Rounding::RoundDown).unwrap(), "0");
        assert_eq!(frac(1234, 10).to_fixed(2, Rounding::RoundDown).unwrap(), "123.40");
        assert_eq!(frac(-1, 1000).to_fixed(2, Rounding::RoundDown).unwrap(), "0.00");
    }

    #[test]
    fn percent_formats_as_percentage() {
        let p = Percent::new(i(1), i(200)).unwrap();
        assert_eq!(p.to_fixed(2, Rounding::RoundHalfUp).unwrap(), "0.50");
        let p = Percent::new(i(1), i(3)).unwrap();
        assert_eq!(p.to_fixed(2, Rounding::RoundHalfUp).unwrap(), "33.33");
    }

    #[test]
    fn slippage_adjusted_amounts() {
        let slippage = Percent::new(i(50), i(10_000)).unwrap();
        let amount = U256::from(1_000_000u64);
        assert_eq!(
            minimum_amount_out(&slippage, amount).unwrap(),
            U256::from(995_024u64)
        );
        assert_eq!(
            maximum_amount_in(&slippage, amount).unwrap(),
            U256::from(1_005_000u64)
        );

        let zero = Percent::new(I256::ZERO, i(1)).unwrap();
        assert_eq!(minimum_amount_out(&zero, amount).unwrap(), amount);
        assert_eq!(maximum_amount_in(&zero, amount).unwrap(), amount);
    }

    #[test]
    fn negative_slippage_is_rejected() {
        let slippage = Percent::new(i(-1), i(100)).unwrap();
        let err = minimum_amount_out(&slippage, U256::from(100u64)).unwrap_err();
        assert_eq!(err.code(), "SLIPPAGE_TOLERANCE");
        let err = maximum_amount_in(&slippage, U256::from(100u64)).unwrap_err();
        assert!(matches!(
            err,
            Error::SwapError(SwapError::SlippageTolerance)
        ));
    }
}
