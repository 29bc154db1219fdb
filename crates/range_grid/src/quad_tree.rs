use std::ops::RangeInclusive;

use crate::policy::RegionAlgebra;
use crate::traits::{CapacityError, RangeGrid};

const NIL: u32 = u32::MAX;

/// Inclusive rectangle of cells. Traversals re-derive each node's region on
/// the way down; nodes never store their own bounds.
#[derive(Clone, Copy)]
struct Region {
    r1: u32,
    c1: u32,
    r2: u32,
    c2: u32,
}

impl Region {
    fn area(&self) -> u64 {
        u64::from(self.r2 - self.r1 + 1) * u64::from(self.c2 - self.c1 + 1)
    }

    fn is_cell(&self) -> bool {
        self.r1 == self.r2 && self.c1 == self.c2
    }

    fn disjoint(&self, other: &Region) -> bool {
        self.r2 < other.r1 || other.r2 < self.r1 || self.c2 < other.c1 || other.c2 < self.c1
    }

    /// `self` lies fully within `other`.
    fn inside(&self, other: &Region) -> bool {
        other.r1 <= self.r1 && self.r2 <= other.r2 && other.c1 <= self.c1 && self.c2 <= other.c2
    }

    /// Area of the intersection. Caller guarantees the regions overlap.
    fn overlap_area(&self, other: &Region) -> u64 {
        let rows = u64::from(self.r2.min(other.r2) - self.r1.max(other.r1) + 1);
        let cols = u64::from(self.c2.min(other.c2) - self.c1.max(other.c1) + 1);
        rows * cols
    }

    /// Quadrant `i` of the row/column midpoint split, `None` when the region
    /// has collapsed to a single row or column on that side.
    fn quadrant(&self, i: usize) -> Option<Region> {
        let rmid = self.r1 + (self.r2 - self.r1) / 2;
        let cmid = self.c1 + (self.c2 - self.c1) / 2;
        let (r1, r2) = if i & 1 == 0 {
            (self.r1, rmid)
        } else {
            (rmid + 1, self.r2)
        };
        let (c1, c2) = if i & 2 == 0 {
            (self.c1, cmid)
        } else {
            (cmid + 1, self.c2)
        };
        (r1 <= r2 && c1 <= c2).then_some(Region { r1, c1, r2, c2 })
    }
}

struct Node<P: RegionAlgebra> {
    value: P::Value,
    pending: Option<P::Delta>,
    children: [u32; 4],
}

impl<P: RegionAlgebra> Clone for Node<P> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            pending: self.pending.clone(),
            children: self.children,
        }
    }
}

/// Sparse quadtree over a fixed `rows x cols` domain with deferred
/// rectangle updates.
///
/// Nodes are materialized only for regions an update has visited; an
/// untouched region behaves as if every cell held the initial value. Point
/// operations cost O(log max(rows, cols)). A rectangle update materializes
/// every region straddling the target's boundary, which is O(rows + cols)
/// in the worst case; rectangle queries skip absent subtrees and pay only
/// for the boundary regions updates have already materialized.
pub struct QuadTreeGrid<P: RegionAlgebra> {
    nodes: Vec<Node<P>>,
    root: u32,
    init: P::Value,
    rows: u32,
    cols: u32,
}

impl<P: RegionAlgebra> Clone for QuadTreeGrid<P> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            init: self.init.clone(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<P: RegionAlgebra> QuadTreeGrid<P> {
    /// Grid of `rows x cols` cells, every cell starting at `init`.
    pub fn new(init: P::Value, rows: u32, cols: u32) -> Self {
        debug_assert!(rows > 0 && cols > 0, "empty domain");
        Self {
            nodes: Vec::new(),
            root: NIL,
            init,
            rows,
            cols,
        }
    }

    /// Number of materialized nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn domain(&self) -> Region {
        Region {
            r1: 0,
            c1: 0,
            r2: self.rows - 1,
            c2: self.cols - 1,
        }
    }

    fn target(&self, rows: &RangeInclusive<u32>, cols: &RangeInclusive<u32>) -> Region {
        let target = Region {
            r1: *rows.start(),
            c1: *cols.start(),
            r2: *rows.end(),
            c2: *cols.end(),
        };
        debug_assert!(
            target.r1 <= target.r2 && target.c1 <= target.c2,
            "empty target rectangle"
        );
        debug_assert!(
            target.r2 < self.rows && target.c2 < self.cols,
            "target outside domain"
        );
        target
    }

    fn alloc(&mut self, value: P::Value) -> Result<u32, CapacityError> {
        if self.nodes.len() >= NIL as usize {
            return Err(CapacityError);
        }
        self.nodes.try_reserve(1).map_err(|_| CapacityError)?;
        let id = self.nodes.len() as u32;
        self.nodes.push(Node {
            value,
            pending: None,
            children: [NIL; 4],
        });
        Ok(id)
    }

    fn ensure_child(&mut self, id: u32, i: usize, quad: Region) -> Result<u32, CapacityError> {
        let child = self.nodes[id as usize].children[i];
        if child != NIL {
            return Ok(child);
        }
        let value = P::seed(&self.init, quad.area());
        let child = self.alloc(value)?;
        self.nodes[id as usize].children[i] = child;
        Ok(child)
    }

    /// Compose `delta` onto whatever `id` already has staged.
    fn stage(&mut self, id: u32, delta: &P::Delta) {
        let node = &mut self.nodes[id as usize];
        node.pending = Some(match node.pending.take() {
            Some(earlier) => P::compose_deltas(&earlier, delta),
            None => delta.clone(),
        });
    }

    /// Push `id`'s pending delta one level down: fold it into the node's own
    /// value and stage it on every child. Children are materialized before
    /// anything is mutated, so a failed allocation leaves the node untouched
    /// and still pending.
    fn flush(&mut self, id: u32, region: Region) -> Result<(), CapacityError> {
        if self.nodes[id as usize].pending.is_none() {
            return Ok(());
        }
        if !region.is_cell() {
            for i in 0..4 {
                if let Some(quad) = region.quadrant(i) {
                    self.ensure_child(id, i, quad)?;
                }
            }
        }
        let Some(delta) = self.nodes[id as usize].pending.take() else {
            return Ok(());
        };
        let node = &mut self.nodes[id as usize];
        node.value = P::apply_delta(&node.value, &delta, region.area());
        if region.is_cell() {
            return Ok(());
        }
        for i in 0..4 {
            if region.quadrant(i).is_some() {
                let child = self.nodes[id as usize].children[i];
                self.stage(child, &delta);
            }
        }
        Ok(())
    }

    /// `id`'s aggregate with any staged delta folded in, without flushing.
    fn settled_value(&self, id: u32, area: u64) -> P::Value {
        let node = &self.nodes[id as usize];
        match &node.pending {
            Some(delta) => P::apply_delta(&node.value, delta, area),
            None => node.value.clone(),
        }
    }

    fn contribute(acc: &mut Option<P::Value>, value: P::Value) {
        *acc = Some(match acc.take() {
            Some(prev) => P::combine(&prev, &value),
            None => value,
        });
    }

    /// Recompute `id`'s value from its children after a partial-overlap
    /// update. Children the update skipped may still hold a staged delta;
    /// absent children stand for untouched regions.
    fn refresh(&mut self, id: u32, region: Region) {
        let mut acc: Option<P::Value> = None;
        for i in 0..4 {
            let Some(quad) = region.quadrant(i) else {
                continue;
            };
            let value = match self.nodes[id as usize].children[i] {
                NIL => P::seed(&self.init, quad.area()),
                child => self.settled_value(child, quad.area()),
            };
            Self::contribute(&mut acc, value);
        }
        if let Some(value) = acc {
            self.nodes[id as usize].value = value;
        }
    }

    fn update_rec(
        &mut self,
        id: u32,
        region: Region,
        target: &Region,
        delta: &P::Delta,
    ) -> Result<(), CapacityError> {
        self.flush(id, region)?;
        if region.inside(target) {
            self.stage(id, delta);
            return self.flush(id, region);
        }
        for i in 0..4 {
            let Some(quad) = region.quadrant(i) else {
                continue;
            };
            if quad.disjoint(target) {
                continue;
            }
            let child = self.ensure_child(id, i, quad)?;
            self.update_rec(child, quad, target, delta)?;
        }
        self.refresh(id, region);
        Ok(())
    }

    fn query_rec(
        &self,
        id: u32,
        region: Region,
        target: &Region,
        overlay: Option<&P::Delta>,
        acc: &mut Option<P::Value>,
    ) {
        if region.disjoint(target) {
            return;
        }
        if id == NIL {
            let area = region.overlap_area(target);
            let mut value = P::seed(&self.init, area);
            if let Some(delta) = overlay {
                value = P::apply_delta(&value, delta, area);
            }
            Self::contribute(acc, value);
            return;
        }
        let node = &self.nodes[id as usize];
        // A delta staged lower in the tree predates anything inherited from
        // above, so the node's own delta composes first.
        let composed;
        let overlay = match (&node.pending, overlay) {
            (Some(own), Some(above)) => {
                composed = P::compose_deltas(own, above);
                Some(&composed)
            }
            (Some(own), None) => Some(own),
            (None, above) => above,
        };
        if region.inside(target) {
            let mut value = node.value.clone();
            if let Some(delta) = overlay {
                value = P::apply_delta(&value, delta, region.area());
            }
            Self::contribute(acc, value);
            return;
        }
        for i in 0..4 {
            if let Some(quad) = region.quadrant(i) {
                self.query_rec(node.children[i], quad, target, overlay, acc);
            }
        }
    }
}

impl<P: RegionAlgebra> RangeGrid for QuadTreeGrid<P> {
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
        let target = self.target(&rows, &cols);
        let domain = self.domain();
        if self.root == NIL {
            let value = P::seed(&self.init, domain.area());
            self.root = self.alloc(value)?;
        }
        self.update_rec(self.root, domain, &target, &delta)
    }

    fn query(&self, rows: RangeInclusive<u32>, cols: RangeInclusive<u32>) -> Self::Value {
        let target = self.target(&rows, &cols);
        let mut acc = None;
        self.query_rec(self.root, self.domain(), &target, None, &mut acc);
        acc.unwrap_or_else(|| P::seed(&self.init, target.area()))
    }
}
