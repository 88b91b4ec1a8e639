use crate::distance::Cost;
use crate::queue::IndexedPriorityQueue;
use crate::reduced::SearchGraph;
use crate::traits::Graph;

// ---------------------------------------------------------------------------
// Per-node search state
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) cost: f32,
    pub(crate) heuristic: f32,
    pub(crate) came_from: Option<usize>,
    pub(crate) explored: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            cost: f32::INFINITY,
            heuristic: 0.0,
            came_from: None,
            explored: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AstarSolver
// ---------------------------------------------------------------------------

/// A* search over a bound [`SearchGraph`].
///
/// The solver owns its per-node scratch state and open set so that repeated
/// solves against the same binding allocate nothing. The binding persists
/// until [`set_graph`](Self::set_graph) is called again; every
/// [`solve`](Self::solve) fully resets the scratch state first.
///
/// `solve` takes `&mut self`, so one solver runs one search at a time.
/// Planners that search in parallel each own a solver bound to a clone of
/// the same `SearchGraph`.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver {
    pub(crate) graph: SearchGraph,
    pub(crate) nodes: Vec<Node>,
    pub(crate) open: IndexedPriorityQueue<usize, Cost>,
}

impl AstarSolver {
    /// A solver bound to an empty graph. Every solve fails until
    /// [`set_graph`](Self::set_graph) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver bound to `graph`.
    pub fn with_graph(graph: SearchGraph) -> Self {
        let mut solver = Self::new();
        solver.set_graph(graph);
        solver
    }

    /// Bind a new graph, resizing scratch state to its node count.
    ///
    /// Existing allocations are reused when the new graph is no larger.
    pub fn set_graph(&mut self, graph: SearchGraph) {
        let len = graph.node_count();
        self.nodes.clear();
        self.nodes.resize(len, Node::default());
        self.open.clear();
        self.graph = graph;
    }

    /// The currently bound graph.
    #[inline]
    pub fn graph(&self) -> &SearchGraph {
        &self.graph
    }

    /// Node count of the bound graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Reset every node for a search from `start` towards `end`: costs to
    /// +inf (start to 0), heuristics to the straight-line distance to
    /// `end`, no predecessors, nothing explored, empty open set.
    pub(crate) fn reset(&mut self, start: usize, end: usize) {
        let goal = self.graph.position(end);
        for (node, p) in self.nodes.iter_mut().zip(self.graph.points()) {
            node.cost = f32::INFINITY;
            node.heuristic = p.distance(goal);
            node.came_from = None;
            node.explored = false;
        }
        self.nodes[start].cost = 0.0;
        self.open.clear();
    }
}
