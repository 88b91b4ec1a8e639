//! The navigation lattice: node positions sampled over a terrain region and
//! the fixed 8-connected adjacency between them.
//!
//! Nodes are stored row-major with `index = x + z * width`. Positions and
//! indices are fixed for the lifetime of a `GridGraph`; building a new graph
//! (new region or resolution) invalidates every index handed out by the old
//! one.

use navgrid_core::{Coord, Region, Vec3};
use smallvec::SmallVec;

use crate::error::NavError;
use crate::reduced::Adjacency;
use crate::traits::Graph;

/// An undirected 8-connected grid graph embedded in 3D space.
#[derive(Clone, Debug)]
pub struct GridGraph {
    region: Region,
    width: usize,
    depth: usize,
    step_x: f32,
    step_z: f32,
    points: Vec<Vec3>,
    adjacency: Adjacency,
    edges: Vec<(usize, usize)>,
}

impl GridGraph {
    /// Build a `points_x` × `points_z` lattice over `region`.
    ///
    /// Each axis is split into `points` equal steps and nodes are placed at
    /// the step centres, so the first and last node sit half a step inside
    /// the region bounds and no node lies on the outer edge.
    pub fn build(region: Region, points_x: usize, points_z: usize) -> Result<Self, NavError> {
        if points_x < 2 || points_z < 2 {
            return Err(NavError::InvalidResolution { points_x, points_z });
        }
        if region.is_degenerate() {
            return Err(NavError::InvalidRegion(region));
        }

        let step_x = region.width() / points_x as f32;
        let step_z = region.depth() / points_z as f32;
        let xs = inset_axis(region.min_x, region.max_x, step_x, points_x);
        let zs = inset_axis(region.min_z, region.max_z, step_z, points_z);

        let mut points = Vec::with_capacity(points_x * points_z);
        for &z in &zs {
            for &x in &xs {
                points.push(Vec3::ground(x, z));
            }
        }

        let mut graph = Self {
            region,
            width: points_x,
            depth: points_z,
            step_x,
            step_z,
            points,
            adjacency: vec![SmallVec::new(); points_x * points_z],
            edges: Vec::new(),
        };
        graph.connect();

        log::debug!(
            "built {}x{} grid graph over {} ({} nodes, {} edges)",
            points_x,
            points_z,
            region,
            graph.node_count(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Build a lattice whose node spacing is at most `cell_size` on each
    /// axis.
    pub fn from_cell_size(region: Region, cell_size: f32) -> Result<Self, NavError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(NavError::InvalidCellSize(cell_size));
        }
        if region.is_degenerate() {
            return Err(NavError::InvalidRegion(region));
        }
        let (points_x, points_z) = Self::size_from_cell_size(region, cell_size);
        Self::build(region, points_x, points_z)
    }

    /// Lattice resolution giving a node spacing of at most `cell_size`.
    pub fn size_from_cell_size(region: Region, cell_size: f32) -> (usize, usize) {
        let count = |extent: f32| ((extent / cell_size).ceil() as usize).max(2);
        (count(region.width()), count(region.depth()))
    }

    /// Return the graph with every node raised to ground height `y`.
    pub fn with_ground_height(mut self, y: f32) -> Self {
        for p in &mut self.points {
            p.y = y;
        }
        self
    }

    // Horizontals, then verticals, then both diagonals of every cell; each
    // undirected edge is added once.
    fn connect(&mut self) {
        let (w, d) = (self.width, self.depth);
        for z in 0..d {
            for x in 0..w - 1 {
                self.add_edge(x + z * w, x + 1 + z * w);
            }
        }
        for z in 0..d - 1 {
            for x in 0..w {
                self.add_edge(x + z * w, x + (z + 1) * w);
            }
        }
        for z in 0..d - 1 {
            for x in 0..w - 1 {
                self.add_edge(x + z * w, x + 1 + (z + 1) * w);
                self.add_edge(x + 1 + z * w, x + (z + 1) * w);
            }
        }
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edges.push((a, b));
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The terrain region the lattice was built over.
    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    /// Number of nodes along X.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of nodes along Z.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Node spacing along X.
    #[inline]
    pub fn step_x(&self) -> f32 {
        self.step_x
    }

    /// Node spacing along Z.
    #[inline]
    pub fn step_z(&self) -> f32 {
        self.step_z
    }

    /// All node positions, indexed by node.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.points
    }

    /// The full adjacency, indexed by node.
    #[inline]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Every undirected edge, each listed once.
    #[inline]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Flat index of lattice coordinate (x, z), or `None` outside the grid.
    #[inline]
    pub fn point_index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.depth {
            return None;
        }
        Some(x as usize + z as usize * self.width)
    }

    /// Flat index of `c`, or `None` outside the grid.
    #[inline]
    pub fn coord_index(&self, c: Coord) -> Option<usize> {
        self.point_index(c.x, c.z)
    }

    /// Lattice coordinate of a flat index, or `None` if out of range.
    #[inline]
    pub fn index_to_coord(&self, index: usize) -> Option<Coord> {
        if index >= self.points.len() {
            return None;
        }
        Some(Coord::new(
            (index % self.width) as i32,
            (index / self.width) as i32,
        ))
    }

    /// Index of the lattice cell containing world point `p` (`y` ignored),
    /// or `None` if `p` is outside the region.
    pub fn index_of_point(&self, p: Vec3) -> Option<usize> {
        if !self.region.contains(p) {
            return None;
        }
        let fx = ((p.x - self.region.min_x) / self.step_x).floor() as usize;
        let fz = ((p.z - self.region.min_z) / self.step_z).floor() as usize;
        // Points on the max edge belong to the last cell.
        let x = fx.min(self.width - 1);
        let z = fz.min(self.depth - 1);
        Some(x + z * self.width)
    }
}

impl Graph for GridGraph {
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

/// Node coordinates along one axis: linear interpolation between the bounds
/// inset by half a step. Callers guarantee `n >= 2`.
fn inset_axis(min: f32, max: f32, step: f32, n: usize) -> Vec<f32> {
    let lo = min + step / 2.0;
    let hi = max - step / 2.0;
    let span = (n - 1) as f32;
    (0..n).map(|i| lo + (hi - lo) * (i as f32 / span)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn square(points: usize) -> GridGraph {
        GridGraph::build(Region::new(0.0, 0.0, 2.0, 2.0), points, points).unwrap()
    }

    #[test]
    fn node_count_matches_resolution() {
        for (w, d) in [(2, 2), (3, 5), (10, 4)] {
            let g = GridGraph::build(Region::new(0.0, 0.0, 5.0, 5.0), w, d).unwrap();
            assert_eq!(g.node_count(), w * d);
            assert_eq!(g.width(), w);
            assert_eq!(g.depth(), d);
        }
    }

    #[test]
    fn index_coord_round_trip() {
        let g = GridGraph::build(Region::new(0.0, 0.0, 4.0, 3.0), 7, 5).unwrap();
        for i in 0..g.node_count() {
            let c = g.index_to_coord(i).unwrap();
            assert_eq!(g.point_index(c.x, c.z), Some(i));
            assert_eq!(g.coord_index(c), Some(i));
        }
        assert_eq!(g.index_to_coord(g.node_count()), None);
        assert_eq!(g.point_index(-1, 0), None);
        assert_eq!(g.point_index(7, 0), None);
        assert_eq!(g.point_index(0, 5), None);
    }

    #[test]
    fn positions_are_inset_and_evenly_spaced() {
        let g = square(3);
        let third = 1.0 / 3.0;
        let expected = [third, 1.0, 5.0 * third];
        for z in 0..3 {
            for x in 0..3 {
                let p = g.position(g.point_index(x, z).unwrap());
                assert!((p.x - expected[x as usize]).abs() < EPS);
                assert!((p.z - expected[z as usize]).abs() < EPS);
                assert_eq!(p.y, 0.0);
            }
        }
        assert!((g.step_x() - 2.0 / 3.0).abs() < EPS);
        assert!((g.step_z() - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn no_node_on_outer_edge() {
        let r = Region::new(-3.0, -1.0, 3.0, 1.0);
        let g = GridGraph::build(r, 6, 4).unwrap();
        for p in g.positions() {
            assert!(p.x > r.min_x && p.x < r.max_x);
            assert!(p.z > r.min_z && p.z < r.max_z);
        }
    }

    #[test]
    fn resolution_below_two_is_rejected() {
        let r = Region::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            GridGraph::build(r, 1, 3).unwrap_err(),
            NavError::InvalidResolution {
                points_x: 1,
                points_z: 3
            }
        );
        assert!(GridGraph::build(r, 4, 0).is_err());
    }

    #[test]
    fn degenerate_region_is_rejected() {
        let r = Region::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            GridGraph::build(r, 3, 3).unwrap_err(),
            NavError::InvalidRegion(r)
        );
    }

    #[test]
    fn edges_are_symmetric_and_unique() {
        let g = GridGraph::build(Region::new(0.0, 0.0, 5.0, 4.0), 5, 4).unwrap();
        for a in 0..g.node_count() {
            for &b in g.neighbors(a) {
                assert!(g.neighbors(b).contains(&a), "{a} -> {b} not mirrored");
            }
        }
        let (w, d) = (5, 4);
        let expected = (w - 1) * d + w * (d - 1) + 2 * (w - 1) * (d - 1);
        assert_eq!(g.edges().len(), expected);
        let mut seen = std::collections::HashSet::new();
        for &(a, b) in g.edges() {
            assert!(seen.insert((a.min(b), a.max(b))), "duplicate edge {a}-{b}");
        }
    }

    #[test]
    fn neighbor_counts() {
        let g = square(3);
        // Corners have 3 neighbours, edges 5, the centre 8.
        assert_eq!(g.neighbors(0).len(), 3);
        assert_eq!(g.neighbors(1).len(), 5);
        assert_eq!(g.neighbors(4).len(), 8);
        for &n in g.neighbors(4) {
            let c = g.index_to_coord(n).unwrap();
            assert_eq!(c.chebyshev(Coord::new(1, 1)), 1);
        }
    }

    #[test]
    fn cell_size_constructor() {
        let r = Region::new(0.0, 0.0, 10.0, 4.0);
        let g = GridGraph::from_cell_size(r, 1.5).unwrap();
        assert_eq!((g.width(), g.depth()), (7, 3));
        assert!(g.step_x() <= 1.5);
        assert!(g.step_z() <= 1.5);
        // Tiny regions still get a valid lattice.
        assert_eq!(GridGraph::size_from_cell_size(r, 100.0), (2, 2));
        assert_eq!(
            GridGraph::from_cell_size(r, 0.0).unwrap_err(),
            NavError::InvalidCellSize(0.0)
        );
        assert!(GridGraph::from_cell_size(r, f32::NAN).is_err());
    }

    #[test]
    fn index_of_point_maps_cells() {
        let g = square(4); // step 0.5
        assert_eq!(g.index_of_point(Vec3::ground(0.0, 0.0)), Some(0));
        assert_eq!(g.index_of_point(Vec3::ground(0.6, 0.1)), Some(1));
        assert_eq!(g.index_of_point(Vec3::ground(0.1, 1.9)), Some(12));
        assert_eq!(g.index_of_point(Vec3::ground(2.0, 2.0)), Some(15));
        assert_eq!(g.index_of_point(Vec3::ground(2.01, 1.0)), None);
        assert_eq!(g.index_of_point(Vec3::ground(-0.01, 1.0)), None);
        // Every node position maps back to its own index.
        for i in 0..g.node_count() {
            assert_eq!(g.index_of_point(g.position(i)), Some(i));
        }
    }

    #[test]
    fn ground_height_is_applied() {
        let g = square(2).with_ground_height(1.5);
        assert!(g.positions().iter().all(|p| p.y == 1.5));
    }
}
