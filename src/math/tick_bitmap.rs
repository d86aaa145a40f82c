//! The contract's packed tick bitmap: one bit per usable tick, 256 ticks
//! per word, words keyed by `compressed >> 8`.

use crate::FastMap;
use crate::error::{Error, TickListError};
use crate::math::bit_math::{least_significant_bit, most_significant_bit};
use alloy_primitives::U256;
use std::ops::RangeInclusive;

pub type TickBitmap = FastMap<i16, U256>;

/// `floor(tick / tick_spacing)`.
#[inline]
pub fn compress(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing)
}

/// Computes the bitmap word index and bit position for a compressed tick.
pub fn position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, (compressed & 0xFF) as u8)
}

/// Returns the bitmap word stored at `word`, or zero if absent.
pub fn get_word(bitmap: &TickBitmap, word: i16) -> U256 {
    bitmap.get(&word).copied().unwrap_or(U256::ZERO)
}

fn check_spacing(tick_spacing: i32) -> Result<(), TickListError> {
    if tick_spacing <= 0 {
        return Err(TickListError::TickSpacingNonzero);
    }
    Ok(())
}

/// Toggles (flips) the initialized status of a tick in the bitmap.
///
/// `tick` must be a multiple of `tick_spacing`. Words that become empty are
/// removed so the map only holds initialized words.
pub fn flip_tick(
    tick_bitmap: &mut TickBitmap,
    tick: i32,
    tick_spacing: i32,
) -> Result<(), TickListError> {
    check_spacing(tick_spacing)?;
    if tick % tick_spacing != 0 {
        return Err(TickListError::TickSpacing(tick));
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let word = get_word(tick_bitmap, word_pos) ^ (U256::ONE << bit_pos);
    if word.is_zero() {
        tick_bitmap.remove(&word_pos);
    } else {
        tick_bitmap.insert(word_pos, word);
    }
    Ok(())
}

/// Builds a bitmap with every tick in `ticks` initialized.
pub fn build_bitmap<I>(ticks: I, tick_spacing: i32) -> Result<TickBitmap, TickListError>
where
    I: IntoIterator<Item = i32>,
{
    check_spacing(tick_spacing)?;
    let mut bitmap = TickBitmap::default();
    for tick in ticks {
        if tick % tick_spacing != 0 {
            return Err(TickListError::TickSpacing(tick));
        }
        let (word_pos, bit_pos) = position(tick / tick_spacing);
        *bitmap.entry(word_pos).or_insert(U256::ZERO) |= U256::ONE << bit_pos;
    }
    Ok(bitmap)
}

/// Tick indices of the set bits of one bitmap word, ascending.
pub fn initialized_ticks_in_word(word_pos: i16, word: U256, tick_spacing: i32) -> Vec<i32> {
    let mut ticks = Vec::with_capacity(word.count_ones());
    let mut remaining = word;
    while !remaining.is_zero() {
        let bit = remaining.trailing_zeros() as i32;
        ticks.push(((word_pos as i32) * 256 + bit) * tick_spacing);
        // clear the lowest set bit
        remaining &= remaining - U256::ONE;
    }
    ticks
}

/// Inclusive range of bitmap words covering `[tick_lower, tick_upper]`.
pub fn word_range(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> RangeInclusive<i16> {
    let (min_word, _) = position(compress(tick_lower, tick_spacing));
    let (max_word, _) = position(compress(tick_upper, tick_spacing));
    min_word..=max_word
}

/// Searches a single 256‑bit bitmap word for the next initialized tick
/// to the left (`lte`, inclusive) or right (exclusive) of `tick`.
///
/// Returns the tick index of the next candidate and a flag indicating
/// whether that tick is actually initialized. When nothing is set the
/// candidate is the boundary of the word that was searched.
pub fn next_initialized_tick_within_one_word(
    bitmap: &TickBitmap,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> Result<(i32, bool), Error> {
    check_spacing(tick_spacing)?;
    let compressed = compress(tick, tick_spacing);

    if lte {
        let (word_pos, bit_pos) = position(compressed);

        // all the 1s at or to the right of the current bit_pos
        let mask: U256 = (U256::ONE << bit_pos) - U256::ONE + (U256::ONE << bit_pos);
        let masked: U256 = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();

        let next: i32 = if initialized {
            (compressed - (bit_pos - most_significant_bit(masked)?) as i32) * tick_spacing
        } else {
            (compressed - bit_pos as i32) * tick_spacing
        };
        Ok((next, initialized))
    } else {
        let (word_pos, bit_pos) = position(compressed + 1);

        // all the 1s at or to the left of the bit_pos
        let mask: U256 = !((U256::ONE << bit_pos) - U256::ONE);
        let masked: U256 = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();

        let next: i32 = if initialized {
            (compressed + 1 + (least_significant_bit(masked)? - bit_pos) as i32) * tick_spacing
        } else {
            (compressed + 1 + (255u8 - bit_pos) as i32) * tick_spacing
        };
        Ok((next, initialized))
    }
}
