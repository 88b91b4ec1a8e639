use std::fmt;

use navgrid_core::{Region, Vec3};

use crate::queue::QueueError;

/// Errors raised by graph construction, snapping and search.
///
/// Unreachable goals are not errors: [`AstarSolver::solve`] reports them
/// through [`PathResult::reached_goal`].
///
/// [`AstarSolver::solve`]: crate::AstarSolver::solve
/// [`PathResult::reached_goal`]: crate::PathResult::reached_goal
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
    /// A lattice needs at least two points per axis.
    InvalidResolution { points_x: usize, points_z: usize },
    /// The terrain region has zero area or non-finite bounds.
    InvalidRegion(Region),
    /// A desired cell size must be finite and positive.
    InvalidCellSize(f32),
    /// A node index is outside the bound graph.
    IndexOutOfRange { index: usize, len: usize },
    /// A world point does not fall on the lattice.
    PointOutsideGrid(Vec3),
    /// No unoccupied node is reachable from the seed.
    NotFound,
    /// Positions and adjacency describe different node counts.
    GraphMismatch { points: usize, adjacency: usize },
    /// The open set was used against its contract.
    Queue(QueueError),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResolution { points_x, points_z } => write!(
                f,
                "invalid lattice resolution {points_x}x{points_z}: need at least 2 points per axis"
            ),
            Self::InvalidRegion(r) => write!(f, "invalid terrain region {r}"),
            Self::InvalidCellSize(c) => write!(f, "invalid cell size {c}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "node index {index} out of range for graph of {len} nodes")
            }
            Self::PointOutsideGrid(p) => write!(f, "point {p} is outside the grid"),
            Self::NotFound => f.write_str("no unoccupied node reachable"),
            Self::GraphMismatch { points, adjacency } => write!(
                f,
                "graph has {points} positions but {adjacency} adjacency lists"
            ),
            Self::Queue(e) => write!(f, "open set: {e}"),
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Queue(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueueError> for NavError {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}
