//! Lattice and padding settings.
//!
//! All types are plain data with sensible defaults; with the `serde`
//! feature they can be loaded from any serde format, and missing fields
//! fall back to their defaults.

use navgrid_core::Region;

use crate::error::NavError;
use crate::graph::GridGraph;

/// How finely to sample the terrain region.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Resolution {
    /// A fixed number of lattice points per axis.
    Points { x: usize, z: usize },
    /// As many points as needed to keep the spacing at most this size.
    CellSize(f32),
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Points { x: 10, z: 10 }
    }
}

/// Which padding rule an entity's footprint is marked with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityClass {
    /// A moving, planning entity.
    #[default]
    Agent,
    /// Something agents route around but that may itself move.
    Obstacle,
}

/// Footprint padding per entity class, in world units. Negative values
/// shrink the footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassPadding {
    pub agent: f32,
    pub obstacle: f32,
}

impl ClassPadding {
    pub const fn new(agent: f32, obstacle: f32) -> Self {
        Self { agent, obstacle }
    }

    /// Padding for both classes given as fractions of a reference width
    /// (typically the agent footprint width).
    pub fn relative(width: f32, agent: f32, obstacle: f32) -> Self {
        Self::new(agent * width, obstacle * width)
    }

    #[inline]
    pub fn for_class(&self, class: EntityClass) -> f32 {
        match class {
            EntityClass::Agent => self.agent,
            EntityClass::Obstacle => self.obstacle,
        }
    }
}

/// Settings for building the navigation lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Terrain extent on the ground plane.
    pub region: Region,
    pub resolution: Resolution,
    /// Height assigned to every node.
    pub ground_height: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            region: Region::centered(10.0, 10.0),
            resolution: Resolution::default(),
            ground_height: 0.0,
        }
    }
}

impl NavConfig {
    /// Build the lattice these settings describe.
    pub fn build_graph(&self) -> Result<GridGraph, NavError> {
        let graph = match self.resolution {
            Resolution::Points { x, z } => GridGraph::build(self.region, x, z)?,
            Resolution::CellSize(size) => GridGraph::from_cell_size(self.region, size)?,
        };
        Ok(graph.with_ground_height(self.ground_height))
    }
}
