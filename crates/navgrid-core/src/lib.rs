//! **navgrid-core** — geometry primitives shared by the *navgrid* crates.
//!
//! World positions are [`Vec3`]; the navigation lattice is addressed by
//! [`Coord`] on the XZ plane. Terrain bounds are a [`Region`] and entity
//! footprints an [`Aabb`].

pub mod geom;
pub mod region;

pub use geom::{Coord, Vec3};
pub use region::{Aabb, Region};
