//! Occupancy-filtered adjacency and the [`SearchGraph`] the solver binds to.

use navgrid_core::Vec3;
use smallvec::SmallVec;

use crate::error::NavError;
use crate::graph::GridGraph;
use crate::occupancy::OccupancyMask;
use crate::traits::Graph;

/// Per-node neighbour lists. Lattice nodes have at most 8 neighbours, so
/// each list stays inline.
pub type Adjacency = Vec<SmallVec<[usize; 8]>>;

/// Derive an adjacency with every edge into an occupied node removed.
///
/// Nodes are kept: an occupied node still has its own list of unoccupied
/// neighbours, so it can serve as a search start. `graph` is not modified.
pub fn reduced_adjacency<G: Graph>(graph: &G, mask: &OccupancyMask) -> Adjacency {
    (0..graph.node_count())
        .map(|node| {
            graph
                .neighbors(node)
                .iter()
                .copied()
                .filter(|&n| !mask.is_occupied(n))
                .collect()
        })
        .collect()
}

/// Node positions paired with an adjacency: the input to
/// [`AstarSolver::set_graph`](crate::AstarSolver::set_graph).
///
/// Owns its data so a snapshot can be shared with (cloned into) several
/// solvers.
#[derive(Clone, Debug, Default)]
pub struct SearchGraph {
    points: Vec<Vec3>,
    adjacency: Adjacency,
}

impl SearchGraph {
    /// Pair `points` with `adjacency`, checking that both describe the same
    /// nodes and that every neighbour index is valid.
    pub fn new(points: Vec<Vec3>, adjacency: Adjacency) -> Result<Self, NavError> {
        if points.len() != adjacency.len() {
            return Err(NavError::GraphMismatch {
                points: points.len(),
                adjacency: adjacency.len(),
            });
        }
        let len = points.len();
        if let Some(&index) = adjacency.iter().flatten().find(|&&n| n >= len) {
            return Err(NavError::IndexOutOfRange { index, len });
        }
        Ok(Self { points, adjacency })
    }

    /// The lattice with its full adjacency.
    pub fn full(graph: &GridGraph) -> Self {
        Self {
            points: graph.positions().to_vec(),
            adjacency: graph.adjacency().clone(),
        }
    }

    /// The lattice with edges into occupied nodes removed.
    pub fn reduced(graph: &GridGraph, mask: &OccupancyMask) -> Self {
        Self {
            points: graph.positions().to_vec(),
            adjacency: reduced_adjacency(graph, mask),
        }
    }

    /// Node positions.
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Neighbour lists.
    #[inline]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }
}

impl Graph for SearchGraph {
    #[inline]
    fn node_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn position(&self, node: usize) -> Vec3 {
        self.points[node]
    }

    #[inline]
    fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }
}
