//! One planning cycle: occupancy rebuild, solver rebind, snapped queries.
//!
//! A typical tick calls [`Planner::rebuild`] with the current entity
//! footprints, then [`Planner::plan`] once per agent that needs a new path.
//! Different agent classes can be planned against different paddings by
//! rebuilding between them.

use navgrid_core::{Aabb, Vec3};

use crate::astar::PathResult;
use crate::config::{ClassPadding, EntityClass, NavConfig};
use crate::error::NavError;
use crate::graph::GridGraph;
use crate::locate::nearest_unoccupied_toward;
use crate::occupancy::{Footprint, OccupancyMask};
use crate::reduced::SearchGraph;
use crate::solver::AstarSolver;
use crate::traits::Graph;

/// An entity footprint tagged with its padding class.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackedEntity {
    pub footprint: Aabb,
    pub class: EntityClass,
}

impl TrackedEntity {
    pub const fn new(footprint: Aabb, class: EntityClass) -> Self {
        Self { footprint, class }
    }

    pub const fn agent(footprint: Aabb) -> Self {
        Self::new(footprint, EntityClass::Agent)
    }

    pub const fn obstacle(footprint: Aabb) -> Self {
        Self::new(footprint, EntityClass::Obstacle)
    }
}

impl Footprint for TrackedEntity {
    #[inline]
    fn footprint(&self) -> Aabb {
        self.footprint
    }
}

/// Owns the lattice, its occupancy, and a solver bound to the reduced view.
#[derive(Clone, Debug)]
pub struct Planner {
    graph: GridGraph,
    occupied: OccupancyMask,
    pathed: OccupancyMask,
    solver: AstarSolver,
}

impl Planner {
    /// A planner over `graph` with nothing occupied.
    pub fn new(graph: GridGraph) -> Self {
        let solver = AstarSolver::with_graph(SearchGraph::full(&graph));
        Self {
            occupied: OccupancyMask::for_graph(&graph),
            pathed: OccupancyMask::for_graph(&graph),
            graph,
            solver,
        }
    }

    pub fn from_config(config: &NavConfig) -> Result<Self, NavError> {
        Ok(Self::new(config.build_graph()?))
    }

    /// Replace the lattice. Both masks are cleared and the solver is bound
    /// to the new graph's full adjacency; indices from the old graph are
    /// meaningless afterwards.
    pub fn regenerate(&mut self, graph: GridGraph) {
        self.occupied = OccupancyMask::for_graph(&graph);
        self.pathed = OccupancyMask::for_graph(&graph);
        self.solver.set_graph(SearchGraph::full(&graph));
        self.graph = graph;
    }

    #[inline]
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// Occupancy from the last rebuild.
    #[inline]
    pub fn occupied(&self) -> &OccupancyMask {
        &self.occupied
    }

    /// Cells covered by paths recorded with [`mark_pathed`](Self::mark_pathed).
    #[inline]
    pub fn pathed(&self) -> &OccupancyMask {
        &self.pathed
    }

    /// The graph the solver is currently bound to.
    #[inline]
    pub fn search_graph(&self) -> &SearchGraph {
        self.solver.graph()
    }

    /// Clear occupancy, mark every entity padded by its class, and bind the
    /// solver to the resulting reduced graph. Returns the number of
    /// footprints marked.
    pub fn rebuild(&mut self, entities: &[TrackedEntity], padding: &ClassPadding) -> usize {
        self.rebuild_with(entities, |e: &TrackedEntity| padding.for_class(e.class))
    }

    /// [`rebuild`](Self::rebuild) with an arbitrary footprint type and
    /// padding rule.
    pub fn rebuild_with<'a, E, I, F>(&mut self, entities: I, padding_of: F) -> usize
    where
        E: Footprint + 'a,
        I: IntoIterator<Item = &'a E>,
        F: Fn(&E) -> f32,
    {
        let marked = self.occupied.mark_all(&self.graph, entities, padding_of);
        self.bind_reduced();
        log::debug!(
            "rebuilt occupancy: {marked} footprints, {} of {} nodes occupied",
            self.occupied.occupied_count(),
            self.graph.node_count()
        );
        marked
    }

    fn bind_reduced(&mut self) {
        let reduced = SearchGraph::reduced(&self.graph, &self.occupied);
        self.solver.set_graph(reduced);
    }

    /// Nearest unoccupied node to `index`, preferring the side facing
    /// `toward`.
    pub fn snap(&self, index: usize, toward: Vec3) -> Result<usize, NavError> {
        nearest_unoccupied_toward(&self.graph, &self.occupied, index, toward)
    }

    /// Solve between two node indices on the bound graph, without snapping.
    pub fn plan_indices(&mut self, start: usize, end: usize) -> Result<PathResult, NavError> {
        self.solver.solve(start, end)
    }

    /// Plan a route between two world points.
    ///
    /// Both points are mapped to lattice nodes, then the start is snapped
    /// to free space towards `to` and the end towards `from`. When the goal
    /// cannot be reached the waypoints lead to the closest approach and end
    /// with the goal node's position, so the caller still heads the right
    /// way.
    ///
    /// An empty result means no free node was reachable from `from`. Points
    /// off the lattice fail with [`NavError::PointOutsideGrid`].
    pub fn plan(&mut self, from: Vec3, to: Vec3) -> Result<Vec<Vec3>, NavError> {
        let start = self
            .graph
            .index_of_point(from)
            .ok_or(NavError::PointOutsideGrid(from))?;
        let end = self
            .graph
            .index_of_point(to)
            .ok_or(NavError::PointOutsideGrid(to))?;

        let start = match self.snap(start, to) {
            Ok(i) => i,
            Err(NavError::NotFound) => {
                log::debug!("no unoccupied node reachable from {from}");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let end = match self.snap(end, from) {
            Ok(i) => i,
            Err(NavError::NotFound) => end,
            Err(e) => return Err(e),
        };

        let result = self.solver.solve(start, end)?;
        let mut waypoints: Vec<Vec3> = result
            .nodes
            .iter()
            .map(|&n| self.graph.position(n))
            .collect();
        if !result.reached_goal {
            waypoints.push(self.graph.position(end));
        }
        Ok(waypoints)
    }

    /// Record the cells a path passes through. Off-grid points are ignored.
    pub fn mark_pathed(&mut self, path: &[Vec3]) {
        for &p in path {
            if let Some(i) = self.graph.index_of_point(p) {
                // In range by construction.
                let _ = self.pathed.mark(i);
            }
        }
    }

    pub fn clear_pathed(&mut self) {
        self.pathed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgrid_core::Region;

    // 5x5 lattice over [0,5]^2; node (x, z) sits at (x + 0.5, z + 0.5).
    fn planner5() -> Planner {
        Planner::new(GridGraph::build(Region::new(0.0, 0.0, 5.0, 5.0), 5, 5).unwrap())
    }

    fn cell_box(x: f32, z: f32) -> Aabb {
        Aabb::from_center(Vec3::new(x + 0.5, 0.5, z + 0.5), Vec3::new(0.5, 1.0, 0.5))
    }

    #[test]
    fn open_diagonal_plan() {
        let mut p = Planner::from_config(&NavConfig::default()).unwrap();
        let from = Vec3::ground(-4.5, -4.5);
        let to = Vec3::ground(4.5, 4.5);
        let path = p.plan(from, to).unwrap();
        assert_eq!(path.len(), 10);
        assert_eq!(path[0], p.graph().position(0));
        assert_eq!(path[9], p.graph().position(99));
    }

    #[test]
    fn points_off_grid_are_rejected() {
        let mut p = planner5();
        let off = Vec3::ground(7.0, 1.0);
        assert_eq!(
            p.plan(off, Vec3::ground(1.0, 1.0)),
            Err(NavError::PointOutsideGrid(off))
        );
        assert_eq!(
            p.plan(Vec3::ground(1.0, 1.0), off),
            Err(NavError::PointOutsideGrid(off))
        );
    }

    #[test]
    fn paths_route_around_obstacles() {
        let mut p = planner5();
        // A wall along x = 2 with a gap at z = 4.
        let wall: Vec<_> = (0..4)
            .map(|z| TrackedEntity::obstacle(cell_box(2.0, z as f32)))
            .collect();
        assert_eq!(p.rebuild(&wall, &ClassPadding::default()), 4);
        assert_eq!(p.occupied().occupied_count(), 4);

        let path = p.plan(Vec3::ground(0.5, 0.5), Vec3::ground(4.5, 0.5)).unwrap();
        assert_eq!(path.last(), Some(&p.graph().position(4)));
        for w in &path {
            let i = p.graph().index_of_point(*w).unwrap();
            assert!(!p.occupied().is_occupied(i), "path crosses occupied {w}");
        }
        // Must pass through the gap.
        assert!(path.contains(&p.graph().position(p.graph().point_index(2, 4).unwrap())));
    }

    #[test]
    fn occupied_start_is_snapped_towards_goal() {
        let mut p = planner5();
        let entities = [TrackedEntity::agent(cell_box(2.0, 2.0))];
        p.rebuild(&entities, &ClassPadding::default());

        let from = Vec3::ground(2.5, 2.5);
        let path = p.plan(from, Vec3::ground(4.5, 2.5)).unwrap();
        assert_eq!(path[0], p.graph().position(p.graph().point_index(3, 2).unwrap()));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn walled_in_goal_appends_goal_position() {
        let mut p = planner5();
        let ring = [(3.0, 3.0), (4.0, 3.0), (3.0, 4.0)]
            .map(|(x, z)| TrackedEntity::obstacle(cell_box(x, z)));
        p.rebuild(&ring, &ClassPadding::default());

        let goal = p.graph().position(24);
        let path = p.plan(Vec3::ground(0.5, 0.5), goal).unwrap();
        assert_eq!(path.last(), Some(&goal));
        let approach = path[path.len() - 2];
        assert!(
            approach == p.graph().position(14) || approach == p.graph().position(22),
            "closest approach was {approach}"
        );
    }

    #[test]
    fn fully_blocked_start_gives_empty_plan() {
        let mut p = planner5();
        let all = [TrackedEntity::obstacle(Aabb::new(
            Vec3::ground(0.0, 0.0),
            Vec3::ground(5.0, 5.0),
        ))];
        p.rebuild(&all, &ClassPadding::default());
        assert_eq!(p.occupied().occupied_count(), 25);
        let path = p.plan(Vec3::ground(1.0, 1.0), Vec3::ground(4.0, 4.0)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn class_padding_is_applied_per_entity() {
        let mut p = planner5();
        let entities = [
            TrackedEntity::agent(cell_box(1.0, 1.0)),
            TrackedEntity::obstacle(cell_box(3.0, 3.0)),
        ];
        // Agents shrink to nothing, obstacles grow by a cell.
        let padding = ClassPadding::new(-0.5, 1.0);
        assert_eq!(p.rebuild(&entities, &padding), 1);
        assert!(!p.occupied().is_occupied(p.graph().point_index(1, 1).unwrap()));
        assert_eq!(p.occupied().occupied_count(), 9);

        // A second rebuild reflects only its own entities.
        assert_eq!(p.rebuild(&entities[..1], &ClassPadding::default()), 1);
        assert_eq!(p.occupied().occupied_count(), 1);
        assert!(p.search_graph().neighbors(0).iter().all(|&n| n != 6));
    }

    #[test]
    fn pathed_cells_are_recorded_and_cleared() {
        let mut p = planner5();
        let path = p.plan(Vec3::ground(0.5, 0.5), Vec3::ground(0.5, 4.5)).unwrap();
        p.mark_pathed(&path);
        p.mark_pathed(&[Vec3::ground(-3.0, 0.0)]);
        assert_eq!(p.pathed().occupied_count(), 5);
        assert!(p.pathed().is_occupied(20));
        p.clear_pathed();
        assert_eq!(p.pathed().occupied_count(), 0);
    }

    #[test]
    fn regenerate_resizes_everything() {
        let mut p = planner5();
        p.rebuild(&[TrackedEntity::obstacle(cell_box(1.0, 1.0))], &ClassPadding::default());
        p.regenerate(GridGraph::build(Region::new(0.0, 0.0, 3.0, 3.0), 3, 3).unwrap());
        assert_eq!(p.occupied().len(), 9);
        assert_eq!(p.pathed().len(), 9);
        assert_eq!(p.occupied().occupied_count(), 0);
        assert_eq!(p.search_graph().node_count(), 9);
        assert_eq!(p.plan_indices(0, 8).unwrap().nodes, vec![0, 4, 8]);
    }
}
