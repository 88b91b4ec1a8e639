use std::cmp::Ordering;

use navgrid_core::Vec3;

use crate::traits::Graph;

/// Euclidean distance between two positions.
#[inline]
pub fn euclidean(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Total Euclidean length of a node path through `graph`.
///
/// Returns 0 for empty and single-node paths.
pub fn path_length<G: Graph>(graph: &G, nodes: &[usize]) -> f32 {
    nodes
        .windows(2)
        .map(|w| euclidean(graph.position(w[0]), graph.position(w[1])))
        .sum()
}

/// An `f32` path cost with a total order, usable as a queue priority.
///
/// Ordering follows [`f32::total_cmp`], so NaN sorts above +inf.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost(pub f32);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
