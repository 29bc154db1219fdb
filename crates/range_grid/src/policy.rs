/// Region algebra driving a grid's query and update semantics.
///
/// Laws the grid implementations rely on:
/// - `combine` is associative and commutative.
/// - `compose_deltas` is associative; `compose_deltas(d1, d2)` means "apply
///   `d1`, then `d2`", and applying the composition once must equal applying
///   the two deltas in sequence.
/// - Scaling: `apply_delta(seed(v, n), d, n)` equals combining `n` unit
///   cells that each held `v` and each received `d`.
pub trait RegionAlgebra {
    type Value: Clone;
    type Delta: Clone;

    /// Aggregate of two disjoint sub-regions.
    fn combine(a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Aggregate of `area` cells all holding `value`.
    fn seed(value: &Self::Value, area: u64) -> Self::Value;

    /// Aggregate after `delta` hits every one of the region's `area` cells.
    fn apply_delta(value: &Self::Value, delta: &Self::Delta, area: u64) -> Self::Value;

    /// Single delta equivalent to applying `earlier`, then `later`.
    fn compose_deltas(earlier: &Self::Delta, later: &Self::Delta) -> Self::Delta;
}

/// Min query, overwrite update. The later of two overwrites wins.
pub struct MinAssign;

impl RegionAlgebra for MinAssign {
    type Value = i64;
    type Delta = i64;

    fn combine(a: &i64, b: &i64) -> i64 {
        *a.min(b)
    }

    fn seed(value: &i64, _area: u64) -> i64 {
        *value
    }

    fn apply_delta(_value: &i64, delta: &i64, _area: u64) -> i64 {
        *delta
    }

    fn compose_deltas(_earlier: &i64, later: &i64) -> i64 {
        *later
    }
}

/// Sum query, increment update.
pub struct SumAdd;

impl RegionAlgebra for SumAdd {
    type Value = i64;
    type Delta = i64;

    fn combine(a: &i64, b: &i64) -> i64 {
        a + b
    }

    fn seed(value: &i64, area: u64) -> i64 {
        value * area as i64
    }

    fn apply_delta(value: &i64, delta: &i64, area: u64) -> i64 {
        value + delta * area as i64
    }

    fn compose_deltas(earlier: &i64, later: &i64) -> i64 {
        earlier + later
    }
}

/// Min query, increment update.
pub struct MinAdd;

impl RegionAlgebra for MinAdd {
    type Value = i64;
    type Delta = i64;

    fn combine(a: &i64, b: &i64) -> i64 {
        *a.min(b)
    }

    fn seed(value: &i64, _area: u64) -> i64 {
        *value
    }

    fn apply_delta(value: &i64, delta: &i64, _area: u64) -> i64 {
        value + delta
    }

    fn compose_deltas(earlier: &i64, later: &i64) -> i64 {
        earlier + later
    }
}
