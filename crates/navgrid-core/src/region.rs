//! Axis-aligned rectangles: [`Region`] (terrain bounds on the XZ plane) and
//! [`Aabb`] (entity footprints).

use std::fmt;

use crate::geom::Vec3;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A closed rectangle on the XZ plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Region {
    /// Create a region from two corners and auto-canonicalize so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: f32, z0: f32, x1: f32, z1: f32) -> Self {
        Self {
            min_x: x0.min(x1),
            max_x: x0.max(x1),
            min_z: z0.min(z1),
            max_z: z0.max(z1),
        }
    }

    /// A region of the given size centred on the origin.
    #[inline]
    pub fn centered(width: f32, depth: f32) -> Self {
        Self::new(-width / 2.0, -depth / 2.0, width / 2.0, depth / 2.0)
    }

    /// Extent along X.
    #[inline]
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Extent along Z.
    #[inline]
    pub fn depth(self) -> f32 {
        self.max_z - self.min_z
    }

    /// Whether the region has zero area or non-finite bounds.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        let finite = self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_z.is_finite()
            && self.max_z.is_finite();
        !finite || self.width() <= 0.0 || self.depth() <= 0.0
    }

    /// Whether `p` lies inside the region (bounds inclusive, `y` ignored).
    #[inline]
    pub fn contains(self, p: Vec3) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    /// Centre of the region on the ground plane.
    #[inline]
    pub fn center(self) -> Vec3 {
        Vec3::ground(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Return a region scaled about its centre by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        let c = self.center();
        let hw = self.width() * factor / 2.0;
        let hd = self.depth() * factor / 2.0;
        Self::new(c.x - hw, c.z - hd, c.x + hw, c.z + hd)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]x[{}, {}]",
            self.min_x, self.max_x, self.min_z, self.max_z
        )
    }
}

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// An axis-aligned box, typically the footprint of an entity.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners, canonicalized per axis.
    #[inline]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A box centred on `center` with the given full size.
    #[inline]
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Centre of the box.
    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box.
    #[inline]
    pub fn size(self) -> Vec3 {
        self.max - self.min
    }

    /// Grow (positive) or shrink (negative) the box by `d` on X and Z.
    ///
    /// Shrinking past zero yields an inverted box (`min > max`), which
    /// covers no lattice node.
    #[inline]
    pub fn padded(self, d: f32) -> Self {
        Self {
            min: Vec3::new(self.min.x - d, self.min.y, self.min.z - d),
            max: Vec3::new(self.max.x + d, self.max.y, self.max.z + d),
        }
    }

    /// Return the box translated so its centre sits at `center`.
    #[inline]
    pub fn moved_to(self, center: Vec3) -> Self {
        Self::from_center(center, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_auto_canonicalize() {
        let r = Region::new(2.0, 3.0, -1.0, 0.0);
        assert_eq!(r.min_x, -1.0);
        assert_eq!(r.max_x, 2.0);
        assert_eq!(r.min_z, 0.0);
        assert_eq!(r.max_z, 3.0);
        assert_eq!(r.width(), 3.0);
        assert_eq!(r.depth(), 3.0);
    }

    #[test]
    fn region_degenerate() {
        assert!(Region::new(0.0, 0.0, 0.0, 5.0).is_degenerate());
        assert!(Region::new(0.0, 0.0, f32::INFINITY, 5.0).is_degenerate());
        assert!(!Region::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn region_centered_and_scaled() {
        let r = Region::centered(10.0, 4.0);
        assert_eq!(r, Region::new(-5.0, -2.0, 5.0, 2.0));
        let s = r.scaled(0.5);
        assert_eq!(s, Region::new(-2.5, -1.0, 2.5, 1.0));
        assert!(s.contains(Vec3::ground(2.5, 0.0)));
        assert!(!s.contains(Vec3::ground(2.6, 0.0)));
    }

    #[test]
    fn aabb_padding_grows_and_shrinks_xz_only() {
        let b = Aabb::from_center(Vec3::new(1.0, 0.5, 1.0), Vec3::new(2.0, 1.0, 2.0));
        let grown = b.padded(0.5);
        assert_eq!(grown.size(), Vec3::new(3.0, 1.0, 3.0));
        let shrunk = b.padded(-0.25);
        assert_eq!(shrunk.size(), Vec3::new(1.5, 1.0, 1.5));
        assert_eq!(shrunk.center(), b.center());
    }

    #[test]
    fn aabb_over_shrunk_is_inverted() {
        let b = Aabb::from_center(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let s = b.padded(-1.0);
        assert!(s.min.x > s.max.x);
        assert!(s.min.z > s.max.z);
    }

    #[test]
    fn aabb_moved_to_keeps_size() {
        let b = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let m = b.moved_to(Vec3::new(10.0, 1.0, 10.0));
        assert_eq!(m.size(), b.size());
        assert_eq!(m.center(), Vec3::new(10.0, 1.0, 10.0));
    }
}
