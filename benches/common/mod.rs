#![allow(dead_code)]

use clmm_swap_sim::math::bit_math::{least_significant_bit, most_significant_bit};
use clmm_swap_sim::math::liquidity_amounts::{get_amounts_for_liquidity, max_liquidity_for_amounts};
use clmm_swap_sim::math::math_helpers::{mul_div, mul_div_rounding_up, sqrt};
use clmm_swap_sim::math::sqrt_price_math::{
    get_amount_0_delta, get_amount_1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use clmm_swap_sim::math::swap_math::compute_swap_step;
use clmm_swap_sim::math::tick_bitmap::{build_bitmap, next_initialized_tick_within_one_word};
use clmm_swap_sim::math::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use clmm_swap_sim::{Address, I256, Pool, Tick, TickList, U256};
use criterion::Criterion;
use std::hint::black_box;

const E18: u128 = 1_000_000_000_000_000_000;

fn ticks(count: i32, tick_spacing: i32) -> Vec<Tick> {
    (1..=count)
        .flat_map(|i| {
            let offset = i * 10 * tick_spacing;
            [
                Tick {
                    index: -offset,
                    liquidity_gross: E18,
                    liquidity_net: E18 as i128,
                },
                Tick {
                    index: offset,
                    liquidity_gross: E18,
                    liquidity_net: -(E18 as i128),
                },
            ]
        })
        .collect()
}

fn pool(count: i32) -> Pool<TickList> {
    let tick_list = TickList::new(ticks(count, 60), 60).unwrap();
    Pool::new(
        Address::ZERO,
        Address::repeat_byte(1),
        3000,
        60,
        get_sqrt_ratio_at_tick(0).unwrap(),
        count as u128 * E18,
        tick_list,
    )
    .unwrap()
}

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");

    group.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| {
            for tick in [-887272, -50000, -1, 0, 1, 50000, 887272] {
                black_box(get_sqrt_ratio_at_tick(black_box(tick)).unwrap());
            }
        })
    });

    let prices: Vec<U256> = [-887272, -50000, -1, 0, 1, 50000, 887271]
        .into_iter()
        .map(|tick| get_sqrt_ratio_at_tick(tick).unwrap())
        .collect();
    group.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| {
            for price in &prices {
                black_box(get_tick_at_sqrt_ratio(black_box(*price)).unwrap());
            }
        })
    });

    group.finish();
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqrt_price_math");
    let price = get_sqrt_ratio_at_tick(0).unwrap();
    let upper = get_sqrt_ratio_at_tick(600).unwrap();
    let amount = U256::from(10u64.pow(15));

    group.bench_function("get_next_sqrt_price_from_input", |b| {
        b.iter(|| {
            black_box(
                get_next_sqrt_price_from_input(black_box(price), E18, black_box(amount), true)
                    .unwrap(),
            );
            black_box(
                get_next_sqrt_price_from_input(black_box(price), E18, black_box(amount), false)
                    .unwrap(),
            );
        })
    });

    group.bench_function("get_next_sqrt_price_from_output", |b| {
        b.iter(|| {
            black_box(
                get_next_sqrt_price_from_output(black_box(price), E18, black_box(amount), true)
                    .unwrap(),
            );
            black_box(
                get_next_sqrt_price_from_output(black_box(price), E18, black_box(amount), false)
                    .unwrap(),
            );
        })
    });

    group.bench_function("get_amount_deltas", |b| {
        b.iter(|| {
            black_box(get_amount_0_delta(black_box(price), black_box(upper), E18, true).unwrap());
            black_box(get_amount_1_delta(black_box(price), black_box(upper), E18, false).unwrap());
        })
    });

    group.finish();
}

pub fn bench_swap_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_math");
    let price = get_sqrt_ratio_at_tick(0).unwrap();
    let lower = get_sqrt_ratio_at_tick(-600).unwrap();
    let upper = get_sqrt_ratio_at_tick(600).unwrap();
    let exact_in = I256::try_from(10i64.pow(15)).unwrap();
    let exact_out = -exact_in;

    group.bench_function("compute_swap_step", |b| {
        b.iter(|| {
            black_box(compute_swap_step(price, lower, E18, black_box(exact_in), 3000).unwrap());
            black_box(compute_swap_step(price, upper, E18, black_box(exact_out), 3000).unwrap());
        })
    });

    group.finish();
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("math_helpers");
    let a = U256::MAX >> 1;
    let b = U256::from(E18);
    let d = U256::MAX >> 64;

    group.bench_function("mul_div", |bench| {
        bench.iter(|| black_box(mul_div(black_box(a), black_box(b), black_box(d)).unwrap()))
    });
    group.bench_function("mul_div_rounding_up", |bench| {
        bench.iter(|| {
            black_box(mul_div_rounding_up(black_box(a), black_box(b), black_box(d)).unwrap())
        })
    });
    group.bench_function("sqrt", |bench| bench.iter(|| black_box(sqrt(black_box(a)))));

    group.finish();
}

pub fn bench_liquidity_amounts(c: &mut Criterion) {
    let mut group = c.benchmark_group("liquidity_amounts");
    let price = get_sqrt_ratio_at_tick(0).unwrap();
    let lower = get_sqrt_ratio_at_tick(-600).unwrap();
    let upper = get_sqrt_ratio_at_tick(600).unwrap();
    let amount = U256::from(E18);

    group.bench_function("max_liquidity_for_amounts", |b| {
        b.iter(|| {
            black_box(
                max_liquidity_for_amounts(price, lower, upper, black_box(amount), amount, true)
                    .unwrap(),
            )
        })
    });
    group.bench_function("get_amounts_for_liquidity", |b| {
        b.iter(|| black_box(get_amounts_for_liquidity(price, lower, upper, black_box(E18)).unwrap()))
    });

    group.finish();
}

pub fn bench_tick_bitmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_bitmap");
    let indices: Vec<i32> = ticks(200, 60).iter().map(|tick| tick.index).collect();
    let bitmap = build_bitmap(indices.iter().copied(), 60).unwrap();

    group.bench_function("build_bitmap", |b| {
        b.iter(|| black_box(build_bitmap(black_box(indices.iter().copied()), 60).unwrap()))
    });
    group.bench_function("next_initialized_tick_within_one_word", |b| {
        b.iter(|| {
            for tick in [-70000, -601, 0, 599, 70000] {
                black_box(next_initialized_tick_within_one_word(&bitmap, tick, 60, true).unwrap());
                black_box(next_initialized_tick_within_one_word(&bitmap, tick, 60, false).unwrap());
            }
        })
    });

    group.finish();
}

pub fn bench_tick_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_list");
    let tick_list = TickList::new(ticks(200, 60), 60).unwrap();

    group.bench_function("new", |b| {
        b.iter(|| black_box(TickList::new(black_box(ticks(200, 60)), 60).unwrap()))
    });
    group.bench_function("next_initialized_tick_within_one_word", |b| {
        b.iter(|| {
            for tick in [-70000, -601, 0, 599, 70000] {
                black_box(tick_list.next_initialized_tick_within_one_word(tick, true, 60).unwrap());
                black_box(tick_list.next_initialized_tick_within_one_word(tick, false, 60).unwrap());
            }
        })
    });

    group.finish();
}

pub fn bench_bit_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_math");
    let values = [U256::ONE, U256::from(E18), U256::MAX >> 7, U256::MAX];

    group.bench_function("most_significant_bit", |b| {
        b.iter(|| {
            for value in values {
                black_box(most_significant_bit(black_box(value)).unwrap());
            }
        })
    });
    group.bench_function("least_significant_bit", |b| {
        b.iter(|| {
            for value in values {
                black_box(least_significant_bit(black_box(value)).unwrap());
            }
        })
    });

    group.finish();
}

pub fn bench_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap");
    let pool = pool(50);
    let amount = U256::from(10u64.pow(18));

    // in-memory tick lists never suspend
    group.bench_function("simulate_swap_exact_in", |b| {
        b.iter(|| {
            black_box(
                futures::executor::block_on(pool.simulate_swap(black_box(amount), true, true))
                    .unwrap(),
            )
        })
    });
    group.bench_function("simulate_swap_exact_out", |b| {
        b.iter(|| {
            black_box(
                futures::executor::block_on(pool.simulate_swap(black_box(amount), false, false))
                    .unwrap(),
            )
        })
    });

    group.finish();
}
