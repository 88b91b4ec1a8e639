use crate::distance::Cost;
use crate::error::NavError;
use crate::solver::AstarSolver;
use crate::traits::Graph;

/// The outcome of one [`AstarSolver::solve`] call.
///
/// A search that cannot reach its goal still produces a value: the path to
/// the closest-approach node with `reached_goal == false`, or an empty path
/// if the start had no usable neighbours at all.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    /// Node indices from the start to the last node reached, inclusive.
    pub nodes: Vec<usize>,
    /// Sum of Euclidean edge lengths along `nodes`.
    pub cost: f32,
    /// Whether the last node is the requested end.
    pub reached_goal: bool,
}

impl PathResult {
    /// The "no node was ever improved" result.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes, including the start.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The last node of the path, if any.
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.nodes.last().copied()
    }
}

impl AstarSolver {
    /// Find a shortest path from `start` to `end` over the bound graph.
    ///
    /// Edge cost and heuristic are both Euclidean distance, so the first
    /// time `end` is dequeued its path is optimal. If the open set runs dry
    /// first, the result leads to the closest-approach node: of all nodes
    /// whose cost was ever improved, the one nearest `end` in a straight
    /// line (earliest wins ties). An empty result means no node was ever
    /// improved.
    ///
    /// Fails only for out-of-range indices, or with [`NavError::Queue`] if
    /// the open set bookkeeping is broken.
    pub fn solve(&mut self, start: usize, end: usize) -> Result<PathResult, NavError> {
        let len = self.graph.node_count();
        for index in [start, end] {
            if index >= len {
                return Err(NavError::IndexOutOfRange { index, len });
            }
        }

        self.reset(start, end);
        self.open.enqueue(start, Cost(self.nodes[start].heuristic))?;

        let mut closest: Option<(usize, f32)> = None;

        while !self.open.is_empty() {
            let current = self.open.dequeue()?;
            if current == end {
                let path = self.reconstruct(end, true);
                log::trace!(
                    "solve {start} -> {end}: {} nodes, cost {:.3}",
                    path.len(),
                    path.cost
                );
                return Ok(path);
            }

            self.nodes[current].explored = true;
            let current_cost = self.nodes[current].cost;
            let here = self.graph.position(current);

            for &n in self.graph.neighbors(current) {
                if self.nodes[n].explored {
                    continue;
                }
                let tentative = current_cost + here.distance(self.graph.position(n));
                let node = &mut self.nodes[n];
                if tentative >= node.cost {
                    continue;
                }
                node.cost = tentative;
                node.came_from = Some(current);
                let to_goal = node.heuristic;
                let priority = Cost(tentative + to_goal);

                if closest.is_none_or(|(_, best)| to_goal < best) {
                    closest = Some((n, to_goal));
                }
                if self.open.contains(&n) {
                    self.open.update_priority(&n, priority)?;
                } else {
                    self.open.enqueue(n, priority)?;
                }
            }
        }

        let path = match closest {
            Some((node, _)) => self.reconstruct(node, false),
            None => PathResult::empty(),
        };
        log::trace!(
            "solve {start} -> {end}: goal unreachable, {} nodes towards {:?}",
            path.len(),
            path.last()
        );
        Ok(path)
    }

    fn reconstruct(&self, target: usize, reached_goal: bool) -> PathResult {
        let mut nodes = vec![target];
        let mut current = target;
        while let Some(prev) = self.nodes[current].came_from {
            nodes.push(prev);
            current = prev;
        }
        nodes.reverse();
        PathResult {
            nodes,
            cost: self.nodes[target].cost,
            reached_goal,
        }
    }
}
