//! Nearest-element search over the LUT element centres.
//!
//! The index is an implicit, balanced k-d tree: the points are permuted so
//! that for every subrange `[lo, hi)` the median `mid = lo + (hi - lo) / 2`
//! splits the range along `axes[mid]`, with smaller coordinates to the left
//! and larger or equal ones to the right. No node structs or pointers are
//! stored, and the tree is immutable once built, so a single index can be
//! shared across rayon workers by reference.

use crate::error::{LxePetError, Result};
use crate::types::event::{Position, squared_distance};
use crate::types::lut::LookupTable;

/// Ranges at or below this size are scanned linearly instead of split further
const LEAF_SIZE: usize = 8;

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// Element centres in tree order
    points: Vec<Position>,
    /// Original element index of each entry in `points`
    ids: Vec<u32>,
    /// Split axis of the node at each position; unused inside leaves
    axes: Vec<u8>,
}

impl SpatialIndex {
    /// Build the index from the element centres of a lookup table
    pub fn build(lut: &LookupTable) -> Result<Self> {
        Self::from_points(&lut.positions())
    }

    /// Build the index from an ordered point set; point `k` is element `k`
    pub fn from_points(points: &[Position]) -> Result<Self> {
        if points.is_empty() {
            return Err(LxePetError::EmptyLookupTable);
        }
        if u32::try_from(points.len()).is_err() {
            return Err(LxePetError::InvalidParameter(format!(
                "{} elements exceed the u32 element index range",
                points.len()
            )));
        }

        let mut order: Vec<u32> = (0..points.len() as u32).collect();
        let mut axes = vec![0u8; points.len()];
        build_range(points, &mut order, &mut axes, 0);

        let tree_points = order.iter().map(|&id| points[id as usize]).collect();

        Ok(Self {
            points: tree_points,
            ids: order,
            axes,
        })
    }

    /// Number of indexed elements
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Element index of the centre closest to `point`.
    ///
    /// Among equidistant centres the first one visited wins, which is fixed
    /// for a given build.
    pub fn nearest(&self, point: Position) -> u32 {
        let mut best = Nearest {
            squared_distance: f64::INFINITY,
            id: self.ids[0],
        };
        self.search(0, self.points.len(), &point, &mut best);
        best.id
    }

    /// Like [`nearest`](Self::nearest) but also returns the distance in mm
    pub fn nearest_with_distance(&self, point: Position) -> (u32, f64) {
        let mut best = Nearest {
            squared_distance: f64::INFINITY,
            id: self.ids[0],
        };
        self.search(0, self.points.len(), &point, &mut best);
        (best.id, best.squared_distance.sqrt())
    }

    fn search(&self, lo: usize, hi: usize, query: &Position, best: &mut Nearest) {
        if hi - lo <= LEAF_SIZE {
            for k in lo..hi {
                best.offer(squared_distance(&self.points[k], query), self.ids[k]);
            }
            return;
        }

        let mid = lo + (hi - lo) / 2;
        let node = &self.points[mid];
        best.offer(squared_distance(node, query), self.ids[mid]);

        let axis = self.axes[mid] as usize;
        let delta = query[axis] - node[axis];
        let (near, far) = if delta < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(near.0, near.1, query, best);
        if delta * delta < best.squared_distance {
            self.search(far.0, far.1, query, best);
        }
    }
}

struct Nearest {
    squared_distance: f64,
    id: u32,
}

impl Nearest {
    #[inline]
    fn offer(&mut self, squared_distance: f64, id: u32) {
        if squared_distance < self.squared_distance {
            self.squared_distance = squared_distance;
            self.id = id;
        }
    }
}

/// Recursively arrange `order` into implicit k-d tree layout
fn build_range(points: &[Position], order: &mut [u32], axes: &mut [u8], depth: usize) {
    let n = order.len();
    if n <= LEAF_SIZE {
        return;
    }

    let axis = widest_axis(points, order).unwrap_or(depth % 3);
    let mid = n / 2;
    order.select_nth_unstable_by(mid, |&a, &b| {
        points[a as usize][axis].total_cmp(&points[b as usize][axis])
    });
    axes[mid] = axis as u8;

    let (left, rest) = order.split_at_mut(mid);
    let (left_axes, rest_axes) = axes.split_at_mut(mid);
    build_range(points, left, left_axes, depth + 1);
    build_range(points, &mut rest[1..], &mut rest_axes[1..], depth + 1);
}

/// Axis along which the points referenced by `order` spread the most
fn widest_axis(points: &[Position], order: &[u32]) -> Option<usize> {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for &id in order {
        let p = &points[id as usize];
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (0..3)
        .map(|axis| (axis, max[axis] - min[axis]))
        .filter(|(_, spread)| spread.is_finite())
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(axis, _)| axis)
}
