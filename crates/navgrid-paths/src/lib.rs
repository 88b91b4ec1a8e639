//! Grid-graph pathfinding for crowds of agents.
//!
//! The crate covers one planning cycle over a regenerable lattice:
//!
//! - **Grid graph** — 8-connected lattice sampled over a terrain
//!   [`Region`](navgrid_core::Region) ([`GridGraph`])
//! - **Occupancy** — per-node blocking mask rebuilt every tick from entity
//!   footprints ([`OccupancyMask`])
//! - **Reduced view** — adjacency with edges into occupied nodes pruned
//!   ([`reduced_adjacency`], [`SearchGraph`])
//! - **Snapping** — BFS to the nearest unoccupied node
//!   ([`nearest_unoccupied`], [`nearest_unoccupied_toward`])
//! - **A\*** — shortest path with a closest-approach fallback
//!   ([`AstarSolver::solve`])
//!
//! [`Planner`] ties these together. The solver owns and reuses its scratch
//! arrays, so repeated queries against the same bound graph do not
//! reallocate.
//!
//! # Trait seam
//!
//! | Implementor | Adjacency |
//! |---|---|
//! | [`GridGraph`] | full lattice, used for snapping |
//! | [`SearchGraph`] | full or reduced, bound to the solver |
//!
//! Both implement [`Graph`].

mod astar;
mod config;
mod distance;
mod error;
mod graph;
mod locate;
mod occupancy;
mod planner;
mod queue;
mod reduced;
mod solver;
mod traits;

pub use astar::PathResult;
pub use config::{ClassPadding, EntityClass, NavConfig, Resolution};
pub use distance::{Cost, euclidean, path_length};
pub use error::NavError;
pub use graph::GridGraph;
pub use locate::{nearest_unoccupied, nearest_unoccupied_toward};
pub use occupancy::{Footprint, OccupancyMask};
pub use planner::{Planner, TrackedEntity};
pub use queue::{IndexedPriorityQueue, QueueError};
pub use reduced::{Adjacency, SearchGraph, reduced_adjacency};
pub use solver::AstarSolver;
pub use traits::Graph;
