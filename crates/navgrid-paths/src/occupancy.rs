//! Per-node occupancy, rebuilt from entity footprints every tick.
//!
//! The mask is never patched incrementally: [`OccupancyMask::mark_all`]
//! clears it and re-marks every footprint, so no bit survives from a
//! previous tick.

use fixedbitset::FixedBitSet;
use navgrid_core::Aabb;

use crate::error::NavError;
use crate::graph::GridGraph;
use crate::traits::Graph;

/// Anything with an axis-aligned footprint on the terrain.
pub trait Footprint {
    fn footprint(&self) -> Aabb;
}

impl Footprint for Aabb {
    #[inline]
    fn footprint(&self) -> Aabb {
        *self
    }
}

/// One bit per graph node; set bits block traversal into that node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyMask {
    bits: FixedBitSet,
}

impl OccupancyMask {
    /// An all-clear mask for `len` nodes.
    pub fn new(len: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(len),
        }
    }

    /// An all-clear mask sized to `graph`.
    pub fn for_graph<G: Graph>(graph: &G) -> Self {
        Self::new(graph.node_count())
    }

    /// Number of nodes covered (occupied or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the mask covers no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.len() == 0
    }

    /// Mark every node unoccupied.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Whether `node` is occupied. Out-of-range nodes read as unoccupied.
    #[inline]
    pub fn is_occupied(&self, node: usize) -> bool {
        self.bits.contains(node)
    }

    /// Mark a single node occupied.
    pub fn mark(&mut self, node: usize) -> Result<(), NavError> {
        self.set(node, true)
    }

    /// Set a single node's state.
    pub fn set(&mut self, node: usize, occupied: bool) -> Result<(), NavError> {
        if node >= self.bits.len() {
            return Err(NavError::IndexOutOfRange {
                index: node,
                len: self.bits.len(),
            });
        }
        self.bits.set(node, occupied);
        Ok(())
    }

    /// Number of occupied nodes.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Occupied node indices in ascending order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    /// Mark every node covered by `aabb` grown by `padding` (negative
    /// shrinks).
    ///
    /// Both padded corners are mapped to lattice cells and the inclusive
    /// coordinate range between them is marked. If either corner falls
    /// outside the grid the footprint is skipped and `false` is returned;
    /// a box shrunk past zero area marks nothing.
    pub fn mark_footprint(&mut self, graph: &GridGraph, aabb: &Aabb, padding: f32) -> bool {
        if self.len() != graph.node_count() {
            log::warn!(
                "occupancy mask covers {} nodes but graph has {}",
                self.len(),
                graph.node_count()
            );
            return false;
        }
        let bounds = aabb.padded(padding);
        if bounds.min.x > bounds.max.x || bounds.min.z > bounds.max.z {
            return false;
        }
        let corners = (
            graph.index_of_point(bounds.min).and_then(|i| graph.index_to_coord(i)),
            graph.index_of_point(bounds.max).and_then(|i| graph.index_to_coord(i)),
        );
        let (Some(lo), Some(hi)) = corners else {
            log::trace!(
                "footprint {} .. {} (padding {padding}) leaves the grid, skipped",
                bounds.min,
                bounds.max
            );
            return false;
        };
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                if let Some(i) = graph.point_index(x, z) {
                    self.bits.insert(i);
                }
            }
        }
        true
    }

    /// Clear the mask, then mark every entity's footprint padded by
    /// `padding_of(entity)`.
    ///
    /// Returns the number of footprints that were marked (skipped ones are
    /// not counted).
    pub fn mark_all<'a, E, I, F>(&mut self, graph: &GridGraph, entities: I, padding_of: F) -> usize
    where
        E: Footprint + 'a,
        I: IntoIterator<Item = &'a E>,
        F: Fn(&E) -> f32,
    {
        if self.len() != graph.node_count() {
            *self = Self::for_graph(graph);
        } else {
            self.clear();
        }
        let mut marked = 0;
        for entity in entities {
            if self.mark_footprint(graph, &entity.footprint(), padding_of(entity)) {
                marked += 1;
            }
        }
        marked
    }
}
