#![allow(dead_code)]

use clmm_zap_math::math::math_helpers::{mul_div, mul_div_rounding_up};
use clmm_zap_math::math::range_ratio::RangeRatio;
use clmm_zap_math::math::sqrt_price_math::{
    get_amount_0_delta, get_amount_1_delta, get_next_sqrt_price_from_input,
};
use clmm_zap_math::math::swap_math::compute_swap_step;
use clmm_zap_math::math::tick_math::{align_lower, align_upper, band_ticks, get_sqrt_ratio_at_tick};
use clmm_zap_math::pool::v3_pool::V3Pool;
use clmm_zap_math::reader::Slot0;
use clmm_zap_math::solver::{PriceMatching, RatioMatching};
use clmm_zap_math::{
    Address, Direction, PositionContext, Readers, SimulatedChain, SolverConfig, SwapStrategy, U256,
};
use alloy_primitives::address;
use criterion::{BatchSize, Criterion};
use std::hint::black_box;

pub const POOL: Address = address!("0x1000000000000000000000000000000000000000");
pub const TOKEN0: Address = address!("0x0000000000000000000000000000000000000001");
pub const TOKEN1: Address = address!("0x0000000000000000000000000000000000000002");

const TICK: i32 = -123000;
const TICK_LOWER: i32 = -124800;
const TICK_UPPER: i32 = -122600;
const LIQUIDITY: u128 = 100_000_000_000_000_000;

pub fn chain() -> SimulatedChain {
    let mut pool = V3Pool::new(POOL, TOKEN0, TOKEN1, 3000);
    pool.slot0 = Slot0 {
        sqrt_price_x96: get_sqrt_ratio_at_tick(TICK).unwrap(),
        tick: TICK,
    };
    pool.liquidity = LIQUIDITY;
    pool.tick_spacing = 200;

    let mut chain = SimulatedChain::default();
    chain.add_token(TOKEN0, 18);
    chain.add_token(TOKEN1, 6);
    chain.add_pool(pool);
    chain
}

fn context(chain: &SimulatedChain, amount: U256, direction: Direction) -> PositionContext {
    PositionContext::from_ticks(
        &Readers::uniform(chain),
        POOL,
        TICK_LOWER,
        TICK_UPPER,
        amount,
        direction,
    )
    .unwrap()
}

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");

    group.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| get_sqrt_ratio_at_tick(black_box(TICK)).unwrap())
    });
    group.bench_function("align", |b| {
        b.iter(|| {
            (
                align_lower(black_box(-124_801), 200).unwrap(),
                align_upper(black_box(-122_601), 200).unwrap(),
            )
        })
    });
    group.bench_function("band_ticks", |b| {
        b.iter(|| band_ticks(black_box(TICK), black_box(0.05), 200).unwrap())
    });

    group.finish();
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let lower = get_sqrt_ratio_at_tick(TICK_LOWER).unwrap();
    let current = get_sqrt_ratio_at_tick(TICK).unwrap();
    let amount = U256::from(1_000_000_000_000_000_000u128);

    let mut group = c.benchmark_group("sqrt_price_math");

    group.bench_function("next_sqrt_price_from_input", |b| {
        b.iter(|| {
            get_next_sqrt_price_from_input(black_box(current), LIQUIDITY, black_box(amount), true)
                .unwrap()
        })
    });
    group.bench_function("amount_deltas", |b| {
        b.iter(|| {
            (
                get_amount_0_delta(black_box(lower), black_box(current), LIQUIDITY, true).unwrap(),
                get_amount_1_delta(black_box(lower), black_box(current), LIQUIDITY, false).unwrap(),
            )
        })
    });

    group.finish();
}

pub fn bench_swap_math(c: &mut Criterion) {
    let current = get_sqrt_ratio_at_tick(TICK).unwrap();
    let limit = get_sqrt_ratio_at_tick(TICK_LOWER).unwrap();
    let amount = U256::from(1_000_000_000_000_000_000u128);

    c.bench_function("compute_swap_step", |b| {
        b.iter(|| {
            compute_swap_step(black_box(current), black_box(limit), LIQUIDITY, black_box(amount), 3000)
                .unwrap()
        })
    });
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let a = U256::from(u128::MAX);
    let b = U256::from(1_000_000_007u64);
    let denominator = U256::from(999_999_937u64);

    let mut group = c.benchmark_group("math_helpers");
    group.bench_function("mul_div", |bench| {
        bench.iter(|| mul_div(black_box(a), black_box(b), black_box(denominator)).unwrap())
    });
    group.bench_function("mul_div_rounding_up", |bench| {
        bench.iter(|| {
            mul_div_rounding_up(black_box(a), black_box(b), black_box(denominator)).unwrap()
        })
    });
    group.finish();
}

pub fn bench_range_ratio(c: &mut Criterion) {
    c.bench_function("range_ratio", |b| {
        b.iter(|| {
            RangeRatio::new(black_box(2.0e-6), black_box(1.5e-6), black_box(2.5e-6))
                .unwrap()
                .for_direction(Direction::ZeroForOne)
        })
    });
}

pub fn bench_ratio_solver(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("ratio_matching");

    for (name, amount, direction) in [
        ("zero_for_one", U256::from(1_000_000_000_000_000_000u128), Direction::ZeroForOne),
        ("one_for_zero", U256::from(10_000_000_000_000u128), Direction::OneForZero),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                chain,
                |chain| {
                    let ctx = context(&chain, amount, direction);
                    RatioMatching.solve(&ctx, &chain, &config).unwrap()
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

pub fn bench_price_solver(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("price_matching");

    for (name, amount, direction) in [
        ("zero_for_one", U256::from(1_000_000_000_000_000_000u128), Direction::ZeroForOne),
        ("one_for_zero", U256::from(10_000_000_000_000u128), Direction::OneForZero),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                chain,
                |chain| {
                    let ctx = context(&chain, amount, direction);
                    PriceMatching.solve(&ctx, &chain, &config).unwrap()
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
