use crate::error::StateError;
use alloy_primitives::U256;

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_ratio_at_tick(MIN_TICK)`
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
/// `get_sqrt_ratio_at_tick(MAX_TICK)`
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

// log_sqrt(1.0001)(2) as Q128.128
const SQRT_10001: U256 = U256::from_limbs([11745905768312294533, 13863, 0, 0]);
const TICK_LOW: U256 = U256::from_limbs([6552757943157144234, 184476617836266586, 0, 0]);
const TICK_HIGH: U256 = U256::from_limbs([4998474450511881007, 15793544031827761793, 0, 0]);

/// `1 / sqrt(1.0001)` as Q128.128, the starting ratio for odd ticks.
const ODD_TICK_RATIO: U256 =
    U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0]);

/// `1 / sqrt(1.0001)^(2^i)` as Q128.128 for `i = 1..=19`, applied for every
/// set bit of `|tick|` above bit 0.
const BIT_RATIOS: [(u32, U256); 19] = [
    (0x2, U256::from_limbs([6459403834229662010, 18444899583751176498, 0, 0])),
    (0x4, U256::from_limbs([17226890335427755468, 18443055278223354162, 0, 0])),
    (0x8, U256::from_limbs([2032852871939366096, 18439367220385604838, 0, 0])),
    (0x10, U256::from_limbs([14545316742740207172, 18431993317065449817, 0, 0])),
    (0x20, U256::from_limbs([5129152022828963008, 18417254355718160513, 0, 0])),
    (0x40, U256::from_limbs([4894419605888772193, 18387811781193591352, 0, 0])),
    (0x80, U256::from_limbs([1280255884321894483, 18329067761203520168, 0, 0])),
    (0x100, U256::from_limbs([15924666964335305636, 18212142134806087854, 0, 0])),
    (0x200, U256::from_limbs([8010504389359918676, 17980523815641551639, 0, 0])),
    (0x400, U256::from_limbs([10668036004952895731, 17526086738831147013, 0, 0])),
    (0x800, U256::from_limbs([4878133418470705625, 16651378430235024244, 0, 0])),
    (0x1000, U256::from_limbs([9537173718739605541, 15030750278693429944, 0, 0])),
    (0x2000, U256::from_limbs([9972618978014552549, 12247334978882834399, 0, 0])),
    (0x4000, U256::from_limbs([10428997489610666743, 8131365268884726200, 0, 0])),
    (0x8000, U256::from_limbs([9305304367709015974, 3584323654723342297, 0, 0])),
    (0x10000, U256::from_limbs([14301143598189091785, 696457651847595233, 0, 0])),
    (0x20000, U256::from_limbs([7393154844743099908, 26294789957452057, 0, 0])),
    (0x40000, U256::from_limbs([2209338891292245656, 37481735321082, 0, 0])),
    (0x80000, U256::from_limbs([10518117631919034274, 76158723, 0, 0])),
];

/// Returns `sqrt(1.0001^tick)` as a Q128.128 fixed‑point ratio, the value
/// the contract computes before rounding down to Q64.96.
pub fn get_sqrt_ratio_x128_at_tick(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(StateError::TickOutOfBounds);
    }

    let mut ratio = if abs_tick & 1 != 0 {
        ODD_TICK_RATIO
    } else {
        U256::ONE << 128
    };

    for (bit, multiplier) in BIT_RATIOS {
        if abs_tick & bit != 0 {
            // both factors are below 2^129, the product cannot wrap
            ratio = ratio.wrapping_mul(multiplier) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    Ok(ratio)
}

/// Returns the sqrt price (Q64.96 fixed‑point) at a given tick index,
/// or `StateError::TickOutOfBounds` if `|tick| > MAX_TICK`.
///
/// The Q128.128 ratio is shifted down by 32 bits and rounded up, so the
/// result is exactly what `TickMath.getSqrtRatioAtTick` returns.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, StateError> {
    let ratio = get_sqrt_ratio_x128_at_tick(tick)?;

    let lower_32_bits = ratio.as_limbs()[0] & 0xFFFF_FFFF;
    Ok((ratio >> 32) + U256::from((lower_32_bits != 0) as u8))
}

/// Computes the greatest tick whose sqrt price is less than or equal to
/// `sqrt_price_x96`.
///
/// The input must lie in `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`. The tick is
/// estimated from the bit length of the ratio plus 14 bits of binary
/// logarithm, which brackets it between two candidates; the exact forward
/// mapping then picks the right one.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, StateError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(StateError::SqrtPriceOutOfBounds);
    }

    let ratio: U256 = sqrt_price_x96 << 32usize;
    // ratio >= MIN_SQRT_RATIO << 32, never zero
    let msb = ratio.bit_len() - 1;

    let mut r: U256 = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // log2(ratio) as a signed Q64.64, kept as a two's complement word
    let mut log_2 = U256::from(msb).wrapping_sub(U256::from(128u8)) << 64usize;

    for shift in (50..64usize).rev() {
        r = r.wrapping_mul(r) >> 127usize;
        let f: U256 = r >> 128usize;
        log_2 |= f << shift;
        r >>= f.as_limbs()[0] as usize;
    }

    let log_sqrt10001 = log_2.wrapping_mul(SQRT_10001);

    let tick_low = low_i32(log_sqrt10001.wrapping_sub(TICK_LOW) >> 128);
    let tick_high = low_i32(log_sqrt10001.wrapping_add(TICK_HIGH) >> 128);

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    })
}

/// Reads the low 32 bits of a two's complement word as an `i32`. The
/// arithmetic and logical right shifts of a word agree on these bits.
#[inline]
fn low_i32(word: U256) -> i32 {
    word.as_limbs()[0] as u32 as i32
}

/// Rounds `tick` to the nearest multiple of `tick_spacing`, halves rounding
/// towards positive infinity, and keeps the result within
/// `[MIN_TICK, MAX_TICK]`.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32, StateError> {
    if tick_spacing <= 0 {
        return Err(StateError::TickSpacing);
    }
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(StateError::TickOutOfBounds);
    }

    let spacing = i64::from(tick_spacing);
    // floor(tick / spacing + 1/2)
    let rounded = (2 * i64::from(tick) + spacing).div_euclid(2 * spacing) * spacing;

    let usable = if rounded < i64::from(MIN_TICK) {
        rounded + spacing
    } else if rounded > i64::from(MAX_TICK) {
        rounded - spacing
    } else {
        rounded
    };
    Ok(usable as i32)
}

/// Smallest tick that is a multiple of `tick_spacing` and not below `MIN_TICK`.
pub fn min_usable_tick(tick_spacing: i32) -> Result<i32, StateError> {
    if tick_spacing <= 0 {
        return Err(StateError::TickSpacing);
    }
    Ok((MIN_TICK / tick_spacing) * tick_spacing)
}

/// Largest tick that is a multiple of `tick_spacing` and not above `MAX_TICK`.
pub fn max_usable_tick(tick_spacing: i32) -> Result<i32, StateError> {
    if tick_spacing <= 0 {
        return Err(StateError::TickSpacing);
    }
    Ok((MAX_TICK / tick_spacing) * tick_spacing)
}
