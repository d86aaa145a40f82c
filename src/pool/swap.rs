use super::{Pool, Slot0};
use crate::error::{Error, MathError, SwapError};
use crate::math::liquidity_math::add_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
};
use crate::tick::TickDataProvider;
use alloy_primitives::{I256, Sign, U256};
use tracing::{debug, trace, warn};

/// End state of a swap driven through a pool snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapState {
    /// The amount remaining to be swapped in/out of the input/output asset.
    pub amount_specified_remaining: I256,
    /// The amount already swapped out/in of the output/input asset.
    pub amount_calculated: I256,
    pub sqrt_price_x96: U256,
    /// The tick associated with the current price.
    pub tick: i32,
    /// The liquidity in range.
    pub liquidity: u128,
    /// Total fee paid in the input token.
    pub fee_amount: U256,
}

/// Result of a fully filled swap in unsigned terms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    pub end_sqrt_price: U256,
    pub end_tick: i32,
    pub end_liquidity: u128,
}

#[derive(Default)]
struct StepComputations {
    // the price at the beginning of the step
    sqrt_price_start_x96: U256,
    // the next tick to swap to from the current tick in the swap direction
    tick_next: i32,
    // whether tick_next is initialized or not
    initialized: bool,
    // sqrt(price) for the next tick (1/0)
    sqrt_price_next_x96: U256,
    amount_in: U256,
    amount_out: U256,
    fee_amount: U256,
}

fn to_i256(value: U256) -> Result<I256, MathError> {
    I256::checked_from_sign_and_abs(Sign::Positive, value).ok_or(MathError::Overflow)
}

impl<P: TickDataProvider> Pool<P> {
    /// Simulates a swap the way the pool contract executes it.
    ///
    /// A positive `amount_specified` is an exact input, a negative one an
    /// exact output. The price never moves past `sqrt_price_limit_x96`,
    /// which defaults to the extreme allowed price in the swap direction.
    /// The snapshot is left untouched; the end state is returned.
    pub async fn swap(
        &self,
        zero_for_one: bool,
        amount_specified: I256,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<SwapState, Error> {
        if amount_specified.is_zero() {
            return Err(SwapError::AmountSpecifiedIsZero.into());
        }

        let sqrt_price_limit_x96 = sqrt_price_limit_x96.unwrap_or(if zero_for_one {
            MIN_SQRT_RATIO + U256::ONE
        } else {
            MAX_SQRT_RATIO - U256::ONE
        });

        if zero_for_one {
            if sqrt_price_limit_x96 <= MIN_SQRT_RATIO {
                return Err(SwapError::RatioMin.into());
            }
            if sqrt_price_limit_x96 >= self.slot0.sqrt_price_x96 {
                return Err(SwapError::RatioCurrent.into());
            }
        } else {
            if sqrt_price_limit_x96 >= MAX_SQRT_RATIO {
                return Err(SwapError::RatioMax.into());
            }
            if sqrt_price_limit_x96 <= self.slot0.sqrt_price_x96 {
                return Err(SwapError::RatioCurrent.into());
            }
        }

        let exact_input = !amount_specified.is_negative();

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            amount_calculated: I256::ZERO,
            sqrt_price_x96: self.slot0.sqrt_price_x96,
            tick: self.slot0.tick,
            liquidity: self.liquidity,
            fee_amount: U256::ZERO,
        };

        while !state.amount_specified_remaining.is_zero()
            && state.sqrt_price_x96 != sqrt_price_limit_x96
        {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                ..Default::default()
            };

            (step.tick_next, step.initialized) = self
                .tick_data_provider
                .next_initialized_tick_within_one_word(state.tick, zero_for_one, self.tick_spacing)
                .await?;

            // the tick search is unaware of the global bounds
            step.tick_next = step.tick_next.clamp(MIN_TICK, MAX_TICK);
            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            let sqrt_price_target_x96 = if zero_for_one {
                step.sqrt_price_next_x96.max(sqrt_price_limit_x96)
            } else {
                step.sqrt_price_next_x96.min(sqrt_price_limit_x96)
            };

            (
                state.sqrt_price_x96,
                step.amount_in,
                step.amount_out,
                step.fee_amount,
            ) = compute_swap_step(
                state.sqrt_price_x96,
                sqrt_price_target_x96,
                state.liquidity,
                state.amount_specified_remaining,
                self.fee_pips,
            )?;

            trace!(
                tick = state.tick,
                tick_next = step.tick_next,
                initialized = step.initialized,
                liquidity = state.liquidity,
                amount_in = %step.amount_in,
                amount_out = %step.amount_out,
                fee_amount = %step.fee_amount,
                "swap step"
            );

            let amount_in_with_fee = to_i256(
                step.amount_in
                    .checked_add(step.fee_amount)
                    .ok_or(MathError::Overflow)?,
            )?;
            let amount_out = to_i256(step.amount_out)?;

            if exact_input {
                state.amount_specified_remaining = state
                    .amount_specified_remaining
                    .checked_sub(amount_in_with_fee)
                    .ok_or(MathError::Underflow)?;
                state.amount_calculated = state
                    .amount_calculated
                    .checked_sub(amount_out)
                    .ok_or(MathError::Underflow)?;
            } else {
                state.amount_specified_remaining = state
                    .amount_specified_remaining
                    .checked_add(amount_out)
                    .ok_or(MathError::Overflow)?;
                state.amount_calculated = state
                    .amount_calculated
                    .checked_add(amount_in_with_fee)
                    .ok_or(MathError::Overflow)?;
            }

            state.fee_amount = state
                .fee_amount
                .checked_add(step.fee_amount)
                .ok_or(MathError::Overflow)?;

            if state.sqrt_price_x96 == step.sqrt_price_next_x96 {
                // crossed to the next tick
                if step.initialized {
                    let mut liquidity_net = self
                        .tick_data_provider
                        .get_tick(step.tick_next)
                        .await?
                        .liquidity_net;
                    // moving leftward, the delta is applied in reverse
                    if zero_for_one {
                        liquidity_net = liquidity_net.checked_neg().ok_or(MathError::Overflow)?;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                }
                state.tick = if zero_for_one {
                    step.tick_next - 1
                } else {
                    step.tick_next
                };
            } else if state.sqrt_price_x96 != step.sqrt_price_start_x96 {
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        debug!(
            zero_for_one,
            exact_input,
            tick = state.tick,
            liquidity = state.liquidity,
            remaining = %state.amount_specified_remaining,
            calculated = %state.amount_calculated,
            "swap finished"
        );

        Ok(state)
    }

    /// Swaps `amount` of the input (or for `amount` of the output when
    /// `exact_input` is false) across all available liquidity.
    ///
    /// Fails with [`SwapError::InsufficientLiquidity`] if the price bound is
    /// reached before the amount is filled.
    pub async fn simulate_swap(
        &self,
        amount: U256,
        exact_input: bool,
        zero_for_one: bool,
    ) -> Result<SwapOutcome, Error> {
        let amount_specified = if exact_input {
            to_i256(amount)?
        } else {
            -to_i256(amount)?
        };

        let state = self.swap(zero_for_one, amount_specified, None).await?;
        if !state.amount_specified_remaining.is_zero() {
            warn!(
                pool = %self.pool_address,
                remaining = %state.amount_specified_remaining,
                "liquidity exhausted before the swap was filled"
            );
            return Err(SwapError::InsufficientLiquidity.into());
        }

        let (amount_in, amount_out) = if exact_input {
            (amount, state.amount_calculated.unsigned_abs())
        } else {
            (state.amount_calculated.unsigned_abs(), amount)
        };

        Ok(SwapOutcome {
            amount_in,
            amount_out,
            fee_amount: state.fee_amount,
            end_sqrt_price: state.sqrt_price_x96,
            end_tick: state.tick,
            end_liquidity: state.liquidity,
        })
    }

    /// Output amount for an exact `input_amount`, with the pool as it would
    /// be after the swap.
    ///
    /// Without a price limit, a swap that cannot consume the whole input
    /// fails with [`SwapError::InsufficientLiquidity`]. With a limit, the
    /// swap may stop early and the output covers only the part filled.
    pub async fn get_output_amount(
        &self,
        input_amount: U256,
        zero_for_one: bool,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(U256, Pool<&P>), Error> {
        let state = self
            .swap(zero_for_one, to_i256(input_amount)?, sqrt_price_limit_x96)
            .await?;

        if sqrt_price_limit_x96.is_none() && !state.amount_specified_remaining.is_zero() {
            return Err(SwapError::InsufficientLiquidity.into());
        }

        Ok((state.amount_calculated.unsigned_abs(), self.after(&state)))
    }

    /// Input amount needed for an exact `output_amount`, with the pool as it
    /// would be after the swap.
    pub async fn get_input_amount(
        &self,
        output_amount: U256,
        zero_for_one: bool,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(U256, Pool<&P>), Error> {
        let state = self
            .swap(zero_for_one, -to_i256(output_amount)?, sqrt_price_limit_x96)
            .await?;

        if sqrt_price_limit_x96.is_none() && !state.amount_specified_remaining.is_zero() {
            return Err(SwapError::InsufficientLiquidity.into());
        }

        Ok((state.amount_calculated.unsigned_abs(), self.after(&state)))
    }

    fn after(&self, state: &SwapState) -> Pool<&P> {
        Pool {
            slot0: Slot0 {
                sqrt_price_x96: state.sqrt_price_x96,
                tick: state.tick,
            },
            liquidity: state.liquidity,
            ..self.by_ref()
        }
    }
}
