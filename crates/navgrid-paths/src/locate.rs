//! Breadth-first search for the nearest unoccupied node.
//!
//! Both searches walk the adjacency they are given (normally the full
//! lattice, not a reduced view) so they can step across occupied nodes to
//! reach free ones. "Nearest" is in hops, not world distance.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use navgrid_core::Vec3;

use crate::error::NavError;
use crate::occupancy::OccupancyMask;
use crate::traits::Graph;

/// Return the first unoccupied node in breadth-first order from `seed`.
///
/// The seed itself is tested first. Ties within a hop ring go to adjacency
/// order. Fails with [`NavError::NotFound`] when every node reachable from
/// `seed` is occupied.
pub fn nearest_unoccupied<G: Graph>(
    graph: &G,
    mask: &OccupancyMask,
    seed: usize,
) -> Result<usize, NavError> {
    check_seed(graph, seed)?;

    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut queue: VecDeque<usize> = VecDeque::new();
    visited.insert(seed);
    queue.push_back(seed);

    while let Some(node) = queue.pop_front() {
        if !mask.is_occupied(node) {
            return Ok(node);
        }
        for &n in graph.neighbors(node) {
            if !visited.put(n) {
                queue.push_back(n);
            }
        }
    }
    Err(NavError::NotFound)
}

/// Like [`nearest_unoccupied`], but among the unoccupied nodes of the
/// nearest hop ring, return the one whose position is closest to `toward`.
///
/// Used to snap a path endpoint onto free space on the side facing the
/// other endpoint. Equal distances go to the node discovered first.
pub fn nearest_unoccupied_toward<G: Graph>(
    graph: &G,
    mask: &OccupancyMask,
    seed: usize,
    toward: Vec3,
) -> Result<usize, NavError> {
    check_seed(graph, seed)?;

    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut frontier = vec![seed];
    let mut next = Vec::new();
    visited.insert(seed);

    while !frontier.is_empty() {
        let best = frontier
            .iter()
            .copied()
            .filter(|&n| !mask.is_occupied(n))
            .min_by(|&a, &b| {
                let da = graph.position(a).distance_squared(toward);
                let db = graph.position(b).distance_squared(toward);
                da.total_cmp(&db)
            });
        if let Some(node) = best {
            return Ok(node);
        }

        next.clear();
        for &node in &frontier {
            for &n in graph.neighbors(node) {
                if !visited.put(n) {
                    next.push(n);
                }
            }
        }
        std::mem::swap(&mut frontier, &mut next);
    }
    Err(NavError::NotFound)
}

fn check_seed<G: Graph>(graph: &G, seed: usize) -> Result<(), NavError> {
    if graph.contains(seed) {
        Ok(())
    } else {
        Err(NavError::IndexOutOfRange {
            index: seed,
            len: graph.node_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GridGraph;
    use crate::reduced::SearchGraph;
    use navgrid_core::{Coord, Region};
    use smallvec::smallvec;

    // 5x5 lattice over [0,5]^2; node (x, z) sits at (x + 0.5, z + 0.5).
    fn grid5() -> GridGraph {
        GridGraph::build(Region::new(0.0, 0.0, 5.0, 5.0), 5, 5).unwrap()
    }

    fn coord(g: &GridGraph, i: usize) -> Coord {
        g.index_to_coord(i).unwrap()
    }

    #[test]
    fn free_seed_is_returned() {
        let g = grid5();
        let mask = OccupancyMask::for_graph(&g);
        assert_eq!(nearest_unoccupied(&g, &mask, 12), Ok(12));
        assert_eq!(
            nearest_unoccupied_toward(&g, &mask, 12, Vec3::ground(5.0, 5.0)),
            Ok(12)
        );
    }

    #[test]
    fn occupied_seed_yields_adjacent_node() {
        let g = grid5();
        let mut mask = OccupancyMask::for_graph(&g);
        mask.mark(12).unwrap();
        let found = nearest_unoccupied(&g, &mask, 12).unwrap();
        assert!(!mask.is_occupied(found));
        assert_eq!(coord(&g, found).chebyshev(Coord::new(2, 2)), 1);
    }

    #[test]
    fn search_crosses_occupied_ring() {
        let g = grid5();
        let mut mask = OccupancyMask::for_graph(&g);
        mask.mark(12).unwrap();
        for &n in g.neighbors(12) {
            mask.mark(n).unwrap();
        }
        let found = nearest_unoccupied(&g, &mask, 12).unwrap();
        assert_eq!(coord(&g, found).chebyshev(Coord::new(2, 2)), 2);

        let toward = nearest_unoccupied_toward(&g, &mask, 12, Vec3::ground(0.5, 2.5)).unwrap();
        assert_eq!(coord(&g, toward), Coord::new(0, 2));
    }

    #[test]
    fn directional_snap_prefers_reference_side() {
        let g = grid5();
        let mut mask = OccupancyMask::for_graph(&g);
        mask.mark(12).unwrap();
        // Reference far to +x: the east neighbour wins within the first ring.
        let east = nearest_unoccupied_toward(&g, &mask, 12, Vec3::ground(4.5, 2.5)).unwrap();
        assert_eq!(coord(&g, east), Coord::new(3, 2));
        let north = nearest_unoccupied_toward(&g, &mask, 12, Vec3::ground(2.5, 4.5)).unwrap();
        assert_eq!(coord(&g, north), Coord::new(2, 3));
        // Hop distance still dominates world distance.
        let far = nearest_unoccupied_toward(&g, &mask, 12, Vec3::ground(100.0, 2.5)).unwrap();
        assert_eq!(coord(&g, far).chebyshev(Coord::new(2, 2)), 1);
    }

    #[test]
    fn fully_occupied_is_not_found() {
        let g = grid5();
        let mut mask = OccupancyMask::for_graph(&g);
        for i in 0..g.node_count() {
            mask.mark(i).unwrap();
        }
        assert_eq!(nearest_unoccupied(&g, &mask, 3), Err(NavError::NotFound));
        assert_eq!(
            nearest_unoccupied_toward(&g, &mask, 3, Vec3::ZERO),
            Err(NavError::NotFound)
        );
    }

    #[test]
    fn unreachable_free_nodes_are_not_found() {
        let sg = SearchGraph::new(
            vec![Vec3::ZERO, Vec3::ground(1.0, 0.0), Vec3::ground(5.0, 0.0)],
            vec![smallvec![1], smallvec![0], smallvec![]],
        )
        .unwrap();
        let mut mask = OccupancyMask::for_graph(&sg);
        mask.mark(0).unwrap();
        mask.mark(1).unwrap();
        assert_eq!(nearest_unoccupied(&sg, &mask, 0), Err(NavError::NotFound));
        assert_eq!(nearest_unoccupied(&sg, &mask, 2), Ok(2));
    }

    #[test]
    fn bad_seed_is_rejected() {
        let g = grid5();
        let mask = OccupancyMask::for_graph(&g);
        let err = NavError::IndexOutOfRange { index: 25, len: 25 };
        assert_eq!(nearest_unoccupied(&g, &mask, 25), Err(err.clone()));
        assert_eq!(
            nearest_unoccupied_toward(&g, &mask, 25, Vec3::ZERO),
            Err(err)
        );
    }
}
