//! Shared crowd model for the headless simulation binary.
//!
//! Humans walk towards a goal while chairs chase the nearest human. Each
//! tick plans in two passes with different footprint paddings: chairs plan
//! around humans at full size, then humans plan around chairs at full size
//! while ignoring each other almost entirely.

use navgrid_core::{Aabb, Region, Vec3};
use navgrid_paths::{ClassPadding, NavConfig, NavError, Planner, TrackedEntity};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything a run needs besides the seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub nav: NavConfig,
    pub humans: usize,
    pub chairs: usize,
    /// Human speed in world units per second.
    pub human_speed: f32,
    /// Chair speed as a fraction of human speed.
    pub chair_speed_ratio: f32,
    /// Seconds per tick.
    pub dt: f32,
    /// A body replans after a random number of ticks in this inclusive
    /// range.
    pub repath_ticks: (u32, u32),
    /// Chair-pass padding of chairs, as a fraction of body width.
    pub chair_pass_shrink: f32,
    /// Human-pass padding of humans, as a fraction of body width.
    pub human_pass_shrink: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            nav: NavConfig::default(),
            humans: 8,
            chairs: 4,
            human_speed: 2.0,
            chair_speed_ratio: 0.66,
            dt: 0.1,
            repath_ticks: (2, 3),
            chair_pass_shrink: -0.7,
            human_pass_shrink: -0.75,
        }
    }
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// A moving entity following waypoints.
#[derive(Clone, Debug)]
pub struct Body {
    pub position: Vec3,
    pub speed: f32,
    pub path: Vec<Vec3>,
    /// Waypoints closer than this when a path is adopted count as passed.
    reach: f32,
    cursor: usize,
    dirty: bool,
    repath_in: u32,
}

impl Body {
    fn new(position: Vec3, speed: f32, reach: f32) -> Self {
        Self {
            position,
            speed,
            path: Vec::new(),
            reach,
            cursor: 0,
            dirty: true,
            repath_in: 0,
        }
    }

    /// Adopt a new path, starting from the waypoint nearest the body and
    /// skipping any within reach.
    fn set_path(&mut self, path: Vec<Vec3>) {
        let mut cursor = path
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = a.distance_squared(self.position);
                let db = b.distance_squared(self.position);
                da.total_cmp(&db)
            })
            .map_or(0, |(i, _)| i);
        while path
            .get(cursor)
            .is_some_and(|p| p.with_y(self.position.y).distance(self.position) < self.reach)
        {
            cursor += 1;
        }
        self.cursor = cursor;
        self.path = path;
        self.dirty = false;
    }

    /// Move up to `speed * dt` along the path on the ground plane.
    fn advance(&mut self, dt: f32) {
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(&target) = self.path.get(self.cursor) else {
                return;
            };
            let target = target.with_y(self.position.y);
            let dist = self.position.distance(target);
            if dist <= budget {
                self.position = target;
                self.cursor += 1;
                budget -= dist;
            } else {
                self.position = self.position + (target - self.position) * (budget / dist);
                budget = 0.0;
            }
        }
    }

    /// Whether the body has consumed its whole path.
    pub fn is_idle(&self) -> bool {
        self.cursor >= self.path.len()
    }
}

// ---------------------------------------------------------------------------
// Crowd
// ---------------------------------------------------------------------------

/// Per-tick counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick: u64,
    /// Paths planned this tick, both passes.
    pub planned: usize,
    /// Plans that came back empty (no free node near the body).
    pub empty: usize,
    /// Nodes occupied during the human pass.
    pub occupied: usize,
    /// Nodes covered by human paths.
    pub pathed: usize,
    /// Goals reached since the start of the run.
    pub goals_reached: usize,
}

pub struct Crowd {
    config: SimConfig,
    planner: Planner,
    body_width: f32,
    humans: Vec<Body>,
    chairs: Vec<Body>,
    goal: Vec3,
    rng: StdRng,
    tick: u64,
    goals_reached: usize,
}

impl Crowd {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, NavError> {
        let planner = Planner::from_config(&config.nav)?;
        let graph = planner.graph();
        let body_width = graph.step_x().min(graph.step_z());
        let mut rng = StdRng::seed_from_u64(seed);

        let region = graph.region();
        let y = config.nav.ground_height;
        let human_speed = config.human_speed;
        let chair_speed = config.human_speed * config.chair_speed_ratio;
        // Any point in a cell is within half a diagonal of its node.
        let reach = body_width * 0.75;
        let humans = (0..config.humans)
            .map(|_| {
                let p = random_point(&mut rng, region, body_width, y);
                Body::new(p, human_speed, reach)
            })
            .collect();
        let chairs = (0..config.chairs)
            .map(|_| {
                let p = random_point(&mut rng, region, body_width, y);
                Body::new(p, chair_speed, reach)
            })
            .collect();
        let goal = random_point(&mut rng, region, body_width, y);

        log::info!(
            "spawned {} humans and {} chairs on a {}x{} grid, goal at {goal}",
            config.humans,
            config.chairs,
            graph.width(),
            graph.depth()
        );

        Ok(Self {
            config,
            planner,
            body_width,
            humans,
            chairs,
            goal,
            rng,
            tick: 0,
            goals_reached: 0,
        })
    }

    pub fn humans(&self) -> &[Body] {
        &self.humans
    }

    pub fn chairs(&self) -> &[Body] {
        &self.chairs
    }

    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Run one simulation step: plan chairs, plan humans, move everyone,
    /// then check the goal.
    pub fn tick(&mut self) -> Result<TickStats, NavError> {
        self.tick += 1;
        let mut stats = TickStats {
            tick: self.tick,
            ..TickStats::default()
        };
        self.schedule_repaths();

        let entities = self.entities();
        let w = self.body_width;

        // Chairs plan around humans at full size.
        self.planner.rebuild(
            &entities,
            &ClassPadding::new(0.0, self.config.chair_pass_shrink * w),
        );
        for i in 0..self.chairs.len() {
            if !self.chairs[i].dirty {
                continue;
            }
            let from = self.chairs[i].position;
            let path = match self.closest_human(from) {
                Some(to) => self.planner.plan(from, to)?,
                None => Vec::new(),
            };
            stats.planned += 1;
            stats.empty += usize::from(path.is_empty());
            self.chairs[i].set_path(path);
        }

        // Humans plan around chairs and barely see each other.
        self.planner.rebuild(
            &entities,
            &ClassPadding::new(self.config.human_pass_shrink * w, 0.0),
        );
        stats.occupied = self.planner.occupied().occupied_count();
        for human in self.humans.iter_mut().filter(|h| h.dirty) {
            let path = self.planner.plan(human.position, self.goal)?;
            stats.planned += 1;
            stats.empty += usize::from(path.is_empty());
            human.set_path(path);
        }
        self.planner.clear_pathed();
        for human in &self.humans {
            self.planner.mark_pathed(&human.path);
        }
        stats.pathed = self.planner.pathed().occupied_count();

        let dt = self.config.dt;
        for body in self.humans.iter_mut().chain(self.chairs.iter_mut()) {
            body.advance(dt);
        }

        if self.goal_reached() {
            self.goals_reached += 1;
            let region = self.planner.graph().region();
            self.goal = random_point(&mut self.rng, region, w, self.config.nav.ground_height);
            for human in &mut self.humans {
                human.dirty = true;
            }
            log::info!("goal reached at tick {}, moved to {}", self.tick, self.goal);
        }
        stats.goals_reached = self.goals_reached;

        log::debug!(
            "tick {}: {} planned, {} empty, {} occupied",
            stats.tick,
            stats.planned,
            stats.empty,
            stats.occupied
        );
        Ok(stats)
    }

    fn entities(&self) -> Vec<TrackedEntity> {
        let size = Vec3::new(self.body_width, self.body_width, self.body_width);
        let humans = self
            .humans
            .iter()
            .map(|h| TrackedEntity::agent(Aabb::from_center(h.position, size)));
        let chairs = self
            .chairs
            .iter()
            .map(|c| TrackedEntity::obstacle(Aabb::from_center(c.position, size)));
        humans.chain(chairs).collect()
    }

    // Bodies replan on a jittered timer so they don't all replan together.
    fn schedule_repaths(&mut self) {
        let (lo, hi) = self.config.repath_ticks;
        let (lo, hi) = (lo.max(1), hi.max(lo.max(1)));
        for body in self.humans.iter_mut().chain(self.chairs.iter_mut()) {
            if body.repath_in == 0 {
                body.dirty = true;
                body.repath_in = self.rng.random_range(lo..=hi);
            }
            body.repath_in -= 1;
        }
    }

    fn closest_human(&self, from: Vec3) -> Option<Vec3> {
        self.humans
            .iter()
            .map(|h| h.position)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    }

    fn goal_reached(&self) -> bool {
        let goal = self.goal;
        self.humans
            .iter()
            .any(|h| h.position.with_y(goal.y).distance(goal) <= self.body_width)
    }
}

/// A uniformly random point inside `region`, at least one `margin` from
/// its edges.
fn random_point(rng: &mut StdRng, region: Region, margin: f32, y: f32) -> Vec3 {
    let inner = Region::new(
        region.min_x + margin,
        region.min_z + margin,
        region.max_x - margin,
        region.max_z - margin,
    );
    let inner = if inner.is_degenerate() { region } else { inner };
    Vec3::new(
        rng.random_range(inner.min_x..=inner.max_x),
        y,
        rng.random_range(inner.min_z..=inner.max_z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(humans: usize, chairs: usize) -> SimConfig {
        SimConfig {
            humans,
            chairs,
            ..SimConfig::default()
        }
    }

    #[test]
    fn spawns_inside_region() {
        let crowd = Crowd::new(small(20, 20), 7).unwrap();
        let region = crowd.planner().graph().region();
        for b in crowd.humans().iter().chain(crowd.chairs()) {
            assert!(region.contains(b.position));
        }
        assert!(region.contains(crowd.goal()));
    }

    #[test]
    fn first_tick_plans_every_body() {
        let mut crowd = Crowd::new(small(5, 3), 1).unwrap();
        let stats = crowd.tick().unwrap();
        assert_eq!(stats.planned, 8);
        assert_eq!(stats.tick, 1);
        assert!(stats.pathed > 0);
    }

    #[test]
    fn bodies_stay_on_the_grid() {
        let mut crowd = Crowd::new(small(10, 6), 3).unwrap();
        for _ in 0..100 {
            crowd.tick().unwrap();
        }
        let region = crowd.planner().graph().region();
        for b in crowd.humans().iter().chain(crowd.chairs()) {
            assert!(region.contains(b.position), "{} left the grid", b.position);
        }
    }

    #[test]
    fn lone_human_reaches_goal() {
        let mut crowd = Crowd::new(small(1, 0), 11).unwrap();
        let mut reached = 0;
        for _ in 0..300 {
            reached = crowd.tick().unwrap().goals_reached;
            if reached > 0 {
                break;
            }
        }
        assert!(reached > 0);
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = Crowd::new(small(6, 3), 42).unwrap();
        let mut b = Crowd::new(small(6, 3), 42).unwrap();
        for _ in 0..20 {
            assert_eq!(a.tick().unwrap(), b.tick().unwrap());
        }
        for (x, y) in a.humans().iter().zip(b.humans()) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn body_follows_waypoints() {
        let mut body = Body::new(Vec3::ZERO, 1.0, 0.0);
        body.set_path(vec![Vec3::ZERO, Vec3::ground(1.0, 0.0), Vec3::ground(1.0, 1.0)]);
        body.advance(1.5);
        assert!(body.position.distance(Vec3::ground(1.0, 0.5)) < 1e-5);
        body.advance(1.0);
        assert!(body.is_idle());
        assert_eq!(body.position, Vec3::ground(1.0, 1.0));
    }

    #[test]
    fn waypoints_within_reach_are_skipped() {
        let mut body = Body::new(Vec3::ground(0.2, 0.0), 1.0, 0.5);
        body.set_path(vec![Vec3::ZERO, Vec3::ground(2.0, 0.0)]);
        body.advance(0.5);
        assert!(body.position.distance(Vec3::ground(0.7, 0.0)) < 1e-5);
    }

    #[test]
    fn config_from_partial_json() {
        let cfg: SimConfig = serde_json::from_str(r#"{ "humans": 3 }"#).unwrap();
        assert_eq!(cfg.humans, 3);
        assert_eq!(cfg.chairs, SimConfig::default().chairs);
    }
}
