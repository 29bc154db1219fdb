use std::ops::RangeInclusive;
use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

const RNG_SEED: u64 = 0x6A1D_2026;

/// Criterion runtime configuration, picked from a workload's operation count.
#[derive(Clone, Copy, Debug)]
pub enum Tier {
    Quick,
    Standard,
    Long,
}

pub fn tier_for_ops(ops: usize) -> Tier {
    if ops <= 2_048 {
        Tier::Quick
    } else if ops <= 8_192 {
        Tier::Standard
    } else {
        Tier::Long
    }
}

pub fn apply_tier<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, tier: Tier) {
    let (samples, warm_up_ms, measure_ms) = match tier {
        Tier::Quick => (20, 100, 250),
        Tier::Standard => (15, 400, 900),
        Tier::Long => (10, 800, 1_500),
    };
    group.sample_size(samples);
    group.warm_up_time(Duration::from_millis(warm_up_ms));
    group.measurement_time(Duration::from_millis(measure_ms));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Uniform inclusive sub-rectangle of a `rows x cols` domain.
pub fn random_rect<R: Rng + ?Sized>(
    rng: &mut R,
    rows: u32,
    cols: u32,
) -> (RangeInclusive<u32>, RangeInclusive<u32>) {
    let r1 = rng.random_range(0..rows);
    let r2 = rng.random_range(r1..rows);
    let c1 = rng.random_range(0..cols);
    let c2 = rng.random_range(c1..cols);
    (r1..=r2, c1..=c2)
}

/// Uniform cell of a `rows x cols` domain.
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, rows: u32, cols: u32) -> (u32, u32) {
    (rng.random_range(0..rows), rng.random_range(0..cols))
}
