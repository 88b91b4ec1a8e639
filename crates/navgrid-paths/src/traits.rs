use navgrid_core::Vec3;

/// Minimal graph interface shared by the lattice and the solver's bound
/// search graph.
///
/// Nodes are dense indices `0..node_count()`.
pub trait Graph {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// World position of `node`. Panics if `node` is out of range.
    fn position(&self, node: usize) -> Vec3;

    /// Neighbours of `node`. Panics if `node` is out of range.
    fn neighbors(&self, node: usize) -> &[usize];

    /// Whether `node` is a valid index.
    #[inline]
    fn contains(&self, node: usize) -> bool {
        node < self.node_count()
    }
}
