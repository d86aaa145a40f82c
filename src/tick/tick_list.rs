use super::Tick;
use crate::error::TickListError;
use crate::math::tick_bitmap::compress;
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use alloy_primitives::U256;

/// A validated snapshot of a pool's initialized ticks, sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickList {
    ticks: Vec<Tick>,
    tick_spacing: i32,
}

impl TickList {
    /// Sorts `ticks` by index and checks that they form a consistent pool
    /// state: within the tick domain, aligned to `tick_spacing`, unique, each referenced by some
    /// liquidity, and with net liquidity summing to zero.
    pub fn new(mut ticks: Vec<Tick>, tick_spacing: i32) -> Result<Self, TickListError> {
        if tick_spacing <= 0 {
            return Err(TickListError::TickSpacingNonzero);
        }

        ticks.sort_unstable_by_key(|tick| tick.index);

        let mut added = U256::ZERO;
        let mut removed = U256::ZERO;
        for (i, tick) in ticks.iter().enumerate() {
            if !(MIN_TICK..=MAX_TICK).contains(&tick.index) {
                return Err(TickListError::TickOutOfBounds(tick.index));
            }
            if tick.index % tick_spacing != 0 {
                return Err(TickListError::TickSpacing(tick.index));
            }
            if i > 0 && ticks[i - 1].index == tick.index {
                return Err(TickListError::Duplicate(tick.index));
            }
            if tick.liquidity_gross == 0 {
                return Err(TickListError::LiquidityGross(tick.index));
            }
            let delta = U256::from(tick.liquidity_net.unsigned_abs());
            if tick.liquidity_net >= 0 {
                added += delta;
            } else {
                removed += delta;
            }
        }

        if added != removed {
            return Err(TickListError::ZeroNet);
        }

        Ok(Self {
            ticks,
            tick_spacing,
        })
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Exact lookup by index.
    pub fn get_tick(&self, index: i32) -> Result<&Tick, TickListError> {
        self.ticks
            .binary_search_by_key(&index, |tick| tick.index)
            .map(|i| &self.ticks[i])
            .map_err(|_| TickListError::NotContained(index))
    }

    pub fn is_below_smallest(&self, tick: i32) -> Result<bool, TickListError> {
        let first = self.ticks.first().ok_or(TickListError::Length)?;
        Ok(tick < first.index)
    }

    pub fn is_at_or_above_largest(&self, tick: i32) -> Result<bool, TickListError> {
        let last = self.ticks.last().ok_or(TickListError::Length)?;
        Ok(tick >= last.index)
    }

    /// The nearest initialized tick at or below `tick` (`lte`) or strictly
    /// above it.
    pub fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<&Tick, TickListError> {
        // number of ticks at or below `tick`
        let at_or_below = self.ticks.partition_point(|t| t.index <= tick);

        if lte {
            if self.is_below_smallest(tick)? {
                return Err(TickListError::BelowSmallest);
            }
            Ok(&self.ticks[at_or_below - 1])
        } else {
            if self.is_at_or_above_largest(tick)? {
                return Err(TickListError::AtOrAboveLargest);
            }
            Ok(&self.ticks[at_or_below])
        }
    }

    /// Like [`next_initialized_tick`](Self::next_initialized_tick) but never
    /// leaves the 256 × `tick_spacing` word containing the search start.
    /// When no initialized tick lies in that word the word boundary is
    /// returned with `false`.
    pub fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), TickListError> {
        if tick_spacing <= 0 {
            return Err(TickListError::TickSpacingNonzero);
        }
        let compressed = compress(tick, tick_spacing);

        if lte {
            let word_pos = compressed >> 8;
            let minimum = (word_pos << 8) * tick_spacing;

            if self.is_below_smallest(tick)? {
                return Ok((minimum, false));
            }

            let index = self.next_initialized_tick(tick, lte)?.index;
            let next = minimum.max(index);
            Ok((next, next == index))
        } else {
            let word_pos = (compressed + 1) >> 8;
            let maximum = (((word_pos + 1) << 8) - 1) * tick_spacing;

            if self.is_at_or_above_largest(tick)? {
                return Ok((maximum, false));
            }

            let index = self.next_initialized_tick(tick, lte)?.index;
            let next = maximum.min(index);
            Ok((next, next == index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_bitmap::{build_bitmap, next_initialized_tick_within_one_word};
    use crate::math::tick_math::{MAX_TICK, MIN_TICK};

    fn tick(index: i32, liquidity_net: i128, liquidity_gross: u128) -> Tick {
        Tick {
            index,
            liquidity_gross,
            liquidity_net,
        }
    }

    /// -120 .. 120 in steps of 60, two nested positions.
    fn spaced_list() -> TickList {
        TickList::new(
            vec![
                tick(-120, 500_000_000_000_000_000, 500_000_000_000_000_000),
                tick(-60, 1_000_000_000_000_000_000, 1_000_000_000_000_000_000),
                tick(60, -1_000_000_000_000_000_000, 1_000_000_000_000_000_000),
                tick(120, -500_000_000_000_000_000, 500_000_000_000_000_000),
            ],
            60,
        )
        .unwrap()
    }

    fn wide_list() -> TickList {
        TickList::new(
            vec![
                tick(MIN_TICK + 1, 10, 10),
                tick(0, -5, 5),
                tick(MAX_TICK - 1, -5, 5),
            ],
            1,
        )
        .unwrap()
    }

    #[test]
    fn new_sorts_unsorted_input() {
        let list = TickList::new(
            vec![tick(60, -1, 1), tick(-120, 1, 2), tick(0, 0, 1)],
            60,
        )
        .unwrap();
        let indices: Vec<i32> = list.ticks().iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![-120, 0, 60]);
    }

    #[test]
    fn new_rejects_nonzero_net() {
        let err = TickList::new(vec![tick(-60, 10, 10), tick(60, -5, 5)], 60).unwrap_err();
        assert_eq!(err, TickListError::ZeroNet);
        assert_eq!(err.code(), "ZERO_NET");
    }

    #[test]
    fn new_rejects_misaligned_tick() {
        let err = TickList::new(vec![tick(-60, 10, 10), tick(61, -10, 10)], 60).unwrap_err();
        assert_eq!(err, TickListError::TickSpacing(61));
        assert_eq!(err.code(), "TICK_SPACING");
    }

    #[test]
    fn new_rejects_duplicates_and_empty_ticks() {
        let err = TickList::new(
            vec![tick(60, -5, 5), tick(-60, 10, 10), tick(60, -5, 5)],
            60,
        )
        .unwrap_err();
        assert_eq!(err, TickListError::Duplicate(60));

        let err = TickList::new(vec![tick(-60, 0, 0), tick(60, 0, 1)], 60).unwrap_err();
        assert_eq!(err, TickListError::LiquidityGross(-60));
    }

    #[test]
    fn new_rejects_non_positive_spacing() {
        assert_eq!(
            TickList::new(vec![], 0).unwrap_err(),
            TickListError::TickSpacingNonzero
        );
        assert_eq!(
            TickList::new(vec![], -10).unwrap_err().code(),
            "TICK_SPACING"
        );
    }

    #[test]
    fn new_rejects_ticks_outside_the_domain() {
        let err = TickList::new(vec![tick(900000, 1, 1), tick(900001, -1, 1)], 1).unwrap_err();
        assert_eq!(err, TickListError::TickOutOfBounds(900000));
        assert_eq!(err.code(), "TICK");

        let err = TickList::new(vec![tick(MIN_TICK - 1, 1, 1), tick(0, -1, 1)], 1).unwrap_err();
        assert_eq!(err, TickListError::TickOutOfBounds(MIN_TICK - 1));

        assert!(TickList::new(vec![tick(MIN_TICK, 1, 1), tick(MAX_TICK, -1, 1)], 1).is_ok());
    }

    #[test]
    fn net_sum_does_not_overflow_i128() {
        let list = TickList::new(
            vec![
                tick(-2, i128::MAX, u128::MAX),
                tick(-1, i128::MAX, u128::MAX),
                tick(1, i128::MIN, u128::MAX),
                tick(2, i128::MIN + 2, u128::MAX),
            ],
            1,
        );
        assert!(list.is_ok());
    }

    #[test]
    fn empty_list_boundary_checks_fail_with_length() {
        let list = TickList::new(vec![], 1).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.is_below_smallest(0).unwrap_err().code(), "LENGTH");
        assert_eq!(list.is_at_or_above_largest(0).unwrap_err(), TickListError::Length);
        assert_eq!(
            list.next_initialized_tick_within_one_word(0, true, 1).unwrap_err(),
            TickListError::Length
        );
    }

    #[test]
    fn get_tick_by_index() {
        let list = spaced_list();
        assert_eq!(list.get_tick(-60).unwrap().liquidity_net, 1_000_000_000_000_000_000);
        assert_eq!(list.len(), 4);
        let err = list.get_tick(0).unwrap_err();
        assert_eq!(err, TickListError::NotContained(0));
        assert_eq!(err.code(), "NOT_CONTAINED");
    }

    #[test]
    fn boundary_checks() {
        let list = wide_list();
        assert!(list.is_below_smallest(MIN_TICK).unwrap());
        assert!(!list.is_below_smallest(MIN_TICK + 1).unwrap());
        assert!(list.is_at_or_above_largest(MAX_TICK - 1).unwrap());
        assert!(!list.is_at_or_above_largest(MAX_TICK - 2).unwrap());
    }

    #[test]
    fn next_initialized_tick_searches_both_directions() {
        let list = wide_list();

        assert_eq!(
            list.next_initialized_tick(MIN_TICK, true).unwrap_err(),
            TickListError::BelowSmallest
        );
        assert_eq!(
            list.next_initialized_tick(MIN_TICK + 1, true).unwrap().index,
            MIN_TICK + 1
        );
        assert_eq!(list.next_initialized_tick(MIN_TICK + 2, true).unwrap().index, MIN_TICK + 1);
        assert_eq!(list.next_initialized_tick(0, true).unwrap().index, 0);
        assert_eq!(list.next_initialized_tick(1, true).unwrap().index, 0);
        assert_eq!(list.next_initialized_tick(MAX_TICK, true).unwrap().index, MAX_TICK - 1);

        assert_eq!(list.next_initialized_tick(MIN_TICK, false).unwrap().index, MIN_TICK + 1);
        assert_eq!(list.next_initialized_tick(MIN_TICK + 1, false).unwrap().index, 0);
        assert_eq!(list.next_initialized_tick(-1, false).unwrap().index, 0);
        assert_eq!(list.next_initialized_tick(0, false).unwrap().index, MAX_TICK - 1);
        let err = list.next_initialized_tick(MAX_TICK - 1, false).unwrap_err();
        assert_eq!(err, TickListError::AtOrAboveLargest);
        assert_eq!(err.code(), "AT_OR_ABOVE_LARGEST");
    }

    #[test]
    fn within_one_word_on_wide_list() {
        let list = wide_list();

        assert_eq!(list.next_initialized_tick_within_one_word(-257, true, 1).unwrap(), (-512, false));
        assert_eq!(list.next_initialized_tick_within_one_word(0, true, 1).unwrap(), (0, true));
        assert_eq!(list.next_initialized_tick_within_one_word(-1, true, 1).unwrap(), (-256, false));
        assert_eq!(list.next_initialized_tick_within_one_word(255, false, 1).unwrap(), (511, false));
        assert_eq!(list.next_initialized_tick_within_one_word(-2, false, 1).unwrap(), (-1, false));
        assert_eq!(
            list.next_initialized_tick_within_one_word(MAX_TICK - 1, false, 1).unwrap(),
            (887295, false)
        );
        assert_eq!(
            list.next_initialized_tick_within_one_word(MIN_TICK, true, 1).unwrap(),
            (-887296, false)
        );
    }

    #[test]
    fn within_one_word_with_spacing() {
        let list = spaced_list();

        assert_eq!(list.next_initialized_tick_within_one_word(0, true, 60).unwrap(), (0, false));
        assert_eq!(list.next_initialized_tick_within_one_word(-1, true, 60).unwrap(), (-60, true));
        assert_eq!(list.next_initialized_tick_within_one_word(0, false, 60).unwrap(), (60, true));
        assert_eq!(
            list.next_initialized_tick_within_one_word(-15361, true, 60).unwrap(),
            (-30720, false)
        );
        assert_eq!(
            list.next_initialized_tick_within_one_word(15360, false, 60).unwrap(),
            (30660, false)
        );
    }

    #[test]
    fn within_one_word_agrees_with_contract_bitmap() {
        for list in [spaced_list(), wide_list()] {
            let spacing = list.tick_spacing();
            let bitmap = build_bitmap(list.ticks().iter().map(|t| t.index), spacing).unwrap();
            let first = list.ticks()[0].index;
            let last = list.ticks()[list.len() - 1].index;

            let mut probes: Vec<i32> = vec![-30721, -15361, -15360, -257, -256, -2, -1, 0, 1, 59, 60, 255, 15359, 15360];
            for t in list.ticks() {
                probes.extend([t.index - 1, t.index, t.index + 1]);
            }

            for tick in probes {
                if !(MIN_TICK..=MAX_TICK).contains(&tick) {
                    continue;
                }
                // both searches agree while the list has ticks on the searched side
                if tick >= first {
                    assert_eq!(
                        list.next_initialized_tick_within_one_word(tick, true, spacing).unwrap(),
                        next_initialized_tick_within_one_word(&bitmap, tick, spacing, true).unwrap(),
                        "lte search from {tick}"
                    );
                }
                if tick < last {
                    assert_eq!(
                        list.next_initialized_tick_within_one_word(tick, false, spacing).unwrap(),
                        next_initialized_tick_within_one_word(&bitmap, tick, spacing, false).unwrap(),
                        "gt search from {tick}"
                    );
                }
            }
        }
    }
}
