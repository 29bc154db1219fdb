use std::hint::black_box;
use std::ops::RangeInclusive;

use bench::apply_tier;
use bench::default_rng;
use bench::random_cell;
use bench::random_rect;
use bench::tier_for_ops;
use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::measurement::Measurement;
use rand::Rng;
use rand::rngs::StdRng;
use range_grid::DenseGrid;
use range_grid::MinAssign;
use range_grid::QuadTreeGrid;
use range_grid::RangeGrid;
use range_grid::RegionAlgebra;
use range_grid::SumAdd;

const OP_COUNTS: [usize; 3] = [1_024, 4_096, 16_384];
const SPARSE_SIDE: u32 = 1 << 30;
const DENSE_SIDE: u32 = 256;
const DELTA_RANGE: RangeInclusive<i64> = -1_000..=1_000;

enum Op {
    Rect(RangeInclusive<u32>, RangeInclusive<u32>, i64),
    Point(u32, u32, i64),
    Query(RangeInclusive<u32>, RangeInclusive<u32>),
}

/// Mixed workload. Rectangle updates cost O(side) on a quadtree, so huge
/// sparse domains get point updates only; rectangle queries stay cheap
/// there because they stop at absent subtrees.
fn generate_ops(
    rng: &mut StdRng,
    rows: u32,
    cols: u32,
    count: usize,
    rect_updates: bool,
) -> Vec<Op> {
    let mut ops = Vec::with_capacity(count);
    for _ in 0..count {
        match rng.random_range(0..4) {
            0 if rect_updates => {
                let (rs, cs) = random_rect(rng, rows, cols);
                ops.push(Op::Rect(rs, cs, rng.random_range(DELTA_RANGE)));
            }
            0 | 1 => {
                let (r, c) = random_cell(rng, rows, cols);
                ops.push(Op::Point(r, c, rng.random_range(DELTA_RANGE)));
            }
            _ => {
                let (rs, cs) = random_rect(rng, rows, cols);
                ops.push(Op::Query(rs, cs));
            }
        }
    }
    ops
}

fn replay<G>(grid: &mut G, ops: &[Op]) -> i64
where
    G: RangeGrid<Value = i64, Delta = i64>,
{
    let mut acc = 0_i64;
    for op in ops {
        match op {
            Op::Rect(rs, cs, delta) => grid.update(rs.clone(), cs.clone(), *delta).unwrap(),
            Op::Point(r, c, delta) => grid.update_at(*r, *c, *delta).unwrap(),
            Op::Query(rs, cs) => acc ^= grid.query(rs.clone(), cs.clone()),
        }
    }
    acc
}

fn bench_quad_tree<M, P>(
    group: &mut BenchmarkGroup<'_, M>,
    name: &str,
    side: u32,
    count: usize,
    ops: &[Op],
) where
    M: Measurement,
    P: RegionAlgebra<Value = i64, Delta = i64>,
{
    group.bench_function(BenchmarkId::new(name, count), |bencher| {
        bencher.iter(|| {
            let mut grid = QuadTreeGrid::<P>::new(0, side, side);
            black_box(replay(&mut grid, black_box(ops)));
        })
    });
}

fn bench_sparse_domain(c: &mut Criterion) {
    let mut rng = default_rng();
    let mut group = c.benchmark_group("range_grid/sparse_domain");
    for &count in &OP_COUNTS {
        apply_tier(&mut group, tier_for_ops(count));
        let ops = generate_ops(&mut rng, SPARSE_SIDE, SPARSE_SIDE, count, false);
        bench_quad_tree::<_, MinAssign>(&mut group, "min_assign", SPARSE_SIDE, count, &ops);
        bench_quad_tree::<_, SumAdd>(&mut group, "sum_add", SPARSE_SIDE, count, &ops);
    }
    group.finish();
}

fn bench_dense_domain(c: &mut Criterion) {
    let mut rng = default_rng();
    let mut group = c.benchmark_group("range_grid/dense_domain");
    for &count in &OP_COUNTS {
        apply_tier(&mut group, tier_for_ops(count));
        let ops = generate_ops(&mut rng, DENSE_SIDE, DENSE_SIDE, count, true);
        bench_quad_tree::<_, SumAdd>(&mut group, "quad_tree", DENSE_SIDE, count, &ops);
        group.bench_function(BenchmarkId::new("dense", count), |bencher| {
            bencher.iter(|| {
                let mut grid = DenseGrid::<SumAdd>::new(0, DENSE_SIDE, DENSE_SIDE);
                black_box(replay(&mut grid, black_box(ops.as_slice())));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sparse_domain, bench_dense_domain);
criterion_main!(benches);
