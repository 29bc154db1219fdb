use std::ops::RangeInclusive;

use crate::policy::RegionAlgebra;
use crate::traits::{CapacityError, RangeGrid};

/// Cell-per-slot grid, fully materialized up front. Every operation walks
/// the target rectangle, which is fine for small dense domains and makes it
/// the oracle for [`QuadTreeGrid`](crate::QuadTreeGrid) in randomized tests.
pub struct DenseGrid<P: RegionAlgebra> {
    cells: Vec<P::Value>,
    init: P::Value,
    rows: u32,
    cols: u32,
}

impl<P: RegionAlgebra> Clone for DenseGrid<P> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            init: self.init.clone(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<P: RegionAlgebra> DenseGrid<P> {
    /// Grid of `rows x cols` cells, every cell starting at `init`.
    pub fn new(init: P::Value, rows: u32, cols: u32) -> Self {
        debug_assert!(rows > 0 && cols > 0, "empty domain");
        let cells = vec![P::seed(&init, 1); rows as usize * cols as usize];
        Self {
            cells,
            init,
            rows,
            cols,
        }
    }

    fn index(&self, r: u32, c: u32) -> usize {
        r as usize * self.cols as usize + c as usize
    }

    fn check_target(&self, rows: &RangeInclusive<u32>, cols: &RangeInclusive<u32>) {
        debug_assert!(!rows.is_empty() && !cols.is_empty(), "empty target rectangle");
        debug_assert!(
            *rows.end() < self.rows && *cols.end() < self.cols,
            "target outside domain"
        );
    }
}

impl<P: RegionAlgebra> RangeGrid for DenseGrid<P> {
    type Value = P::Value;
    type Delta = P::Delta;

    fn rows(&self) -> u32 {
        self.rows
    }

    fn cols(&self) -> u32 {
        self.cols
    }

    fn update(
        &mut self,
        rows: RangeInclusive<u32>,
        cols: RangeInclusive<u32>,
        delta: Self::Delta,
    ) -> Result<(), CapacityError> {
        self.check_target(&rows, &cols);
        for r in rows {
            for c in cols.clone() {
                let i = self.index(r, c);
                self.cells[i] = P::apply_delta(&self.cells[i], &delta, 1);
            }
        }
        Ok(())
    }

    fn query(&self, rows: RangeInclusive<u32>, cols: RangeInclusive<u32>) -> Self::Value {
        self.check_target(&rows, &cols);
        let mut acc: Option<P::Value> = None;
        for r in rows {
            for c in cols.clone() {
                let value = &self.cells[self.index(r, c)];
                acc = Some(match acc {
                    Some(prev) => P::combine(&prev, value),
                    None => value.clone(),
                });
            }
        }
        acc.unwrap_or_else(|| P::seed(&self.init, 0))
    }
}
