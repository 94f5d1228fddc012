//! Planar geometry, plus the elevation projection that lets a purely 2D
//! distance measurer account for vertical movement.
//!
//! ## Coordinate Space
//!
//! All points live in canvas space: `x` grows to the right, `y` grows
//! downward, and both are measured in [Pixels]. Elevation is not a third
//! coordinate here. Instead it's attached to each leg of a path as a whole
//! number of [Cells](crate::Cells), and gets folded into the plane with
//! [project_elevation] right before a leg is measured.
//!
//! ## Elevation Projection
//!
//! A leg `A → B` that also climbs `h` pixels is one side of a right
//! triangle: the planar leg `A → B` is the base, and the vertical climb is
//! the other side, standing straight up out of the plane at `B`. The true
//! distance travelled is the hypotenuse. Rather than doing any 3D math, we
//! knock the vertical side over so it lies flat in the plane, still at a
//! right angle to `A → B`. Its far end `C` is then exactly one hypotenuse
//! away from `A`, so measuring `A → C` with any planar measurer gives the
//! slant distance.
//!
//! ```text
//!            C
//!          / |
//!        /   | h
//!      /     |
//!    A ----- B
//! ```

use crate::Pixels;
use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, Mul, MulAssign, Neg, Sub,
    SubAssign,
};
use serde::{Deserialize, Serialize};
use std::ops;
#[cfg(feature = "js")]
use wasm_bindgen::prelude::*;

/// A point on the canvas. Points are plain values: two points with the same
/// coordinates are the same point.
#[cfg_attr(feature = "js", wasm_bindgen)]
#[derive(
    Copy, Clone, Debug, Default, Display, PartialEq, Serialize, Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between two points
    pub fn distance_to(self, other: Point2) -> Pixels {
        (other - self).length()
    }
}

#[cfg(feature = "js")]
#[wasm_bindgen]
impl Point2 {
    #[wasm_bindgen(constructor)]
    pub fn new_js(x: f64, y: f64) -> Self {
        Self::new(x, y)
    }
}

/// A displacement in the plane. This is the difference between two points.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "<{}, {}>", x, y)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> Pixels {
        Pixels(self.x.hypot(self.y))
    }

    /// Rotate this vector a quarter turn, from the +x axis towards the +y
    /// axis. The output has the same length, and is orthogonal to the input.
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl ops::Sub<Point2> for Point2 {
    type Output = Vector2;

    fn sub(self, rhs: Point2) -> Self::Output {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl ops::Add<Vector2> for Point2 {
    type Output = Point2;

    fn add(self, rhs: Vector2) -> Self::Output {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// One leg of a measured path, from `origin` to `destination`. Order
/// matters: projection always happens around the destination.
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "{} -> {}", origin, destination)]
pub struct Segment {
    pub origin: Point2,
    pub destination: Point2,
}

impl Segment {
    pub const fn new(origin: Point2, destination: Point2) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// The displacement from origin to destination
    pub fn delta(&self) -> Vector2 {
        self.destination - self.origin
    }

    pub fn length(&self) -> Pixels {
        self.delta().length()
    }

    /// Get a copy of this segment with the destination moved so that the
    /// segment's planar length equals the slant distance of this segment plus
    /// the given vertical climb. See [project_elevation].
    pub fn project_elevation(&self, height: Pixels) -> Segment {
        Self::new(
            self.origin,
            project_elevation(self.origin, self.destination, height),
        )
    }
}

/// Fold a vertical displacement into the plane. Given a leg `a → b` that also
/// climbs (or descends) `height`, find the point `c` such that the planar
/// distance `a → c` equals the 3D slant distance of the leg, i.e.
/// `sqrt(|ab|² + height²)`. See the module-level docs for the geometry.
///
/// `c` is always `height` away from `b`, at a right angle to `a → b`.
/// Flipping the sign of `height` mirrors `c` across the line through `a`
/// and `b`.
///
/// Two inputs have no projection of their own:
/// - `height == 0` returns `b` exactly, so flat legs measure identically to
///   how they would without any elevation handling
/// - `a == b` returns `b`, because a zero-length leg has no direction to
///   rotate around
pub fn project_elevation(a: Point2, b: Point2, height: Pixels) -> Point2 {
    if height.0 == 0.0 {
        return b;
    }

    let delta = b - a;
    let Pixels(distance) = delta.length();
    if distance == 0.0 {
        return b;
    }

    // Unit vector orthogonal to the leg, scaled up to the height
    b + delta.perpendicular() * (height.0 / distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_point_vector_math() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);
        assert_eq!(b - a, Vector2::new(3.0, 4.0));
        assert_eq!(a + (b - a), b);
        assert_approx_eq!(a.distance_to(b).0, 5.0);
    }

    #[test]
    fn test_perpendicular() {
        let v = Vector2::new(3.0, 4.0);
        let perp = v.perpendicular();
        assert_eq!(perp, Vector2::new(-4.0, 3.0));
        assert_eq!(v.x * perp.x + v.y * perp.y, 0.0);
        assert_approx_eq!(perp.length().0, v.length().0);
    }

    #[test]
    fn test_project_flat() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(100.0, 0.0);
        let c = project_elevation(a, b, Pixels(0.0));
        assert_eq!(c, b);
        assert_approx_eq!(a.distance_to(c).0, 100.0);
    }

    #[test]
    fn test_project_horizontal() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(100.0, 0.0);
        let c = project_elevation(a, b, Pixels(75.0));
        assert_eq!(c, Point2::new(100.0, 75.0));
        assert_approx_eq!(a.distance_to(c).0, 125.0);
    }

    #[test]
    fn test_project_diagonal() {
        // The rotation has to be a true right angle for diagonal legs too,
        // not just axis-aligned ones
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(100.0, 100.0);
        let c = project_elevation(a, b, Pixels(50.0));
        let expected = (100.0f64.hypot(100.0)).hypot(50.0);
        assert_approx_eq!(a.distance_to(c).0, expected, 1e-9);
    }

    #[test]
    fn test_project_coincident() {
        let a = Point2::new(0.0, 0.0);
        let c = project_elevation(a, a, Pixels(50.0));
        assert_eq!(c, a);
        assert!(!c.x.is_nan() && !c.y.is_nan());
    }

    #[test]
    fn test_project_descending_mirrors() {
        let a = Point2::new(10.0, 20.0);
        let b = Point2::new(60.0, 20.0);
        let up = project_elevation(a, b, Pixels(30.0));
        let down = project_elevation(a, b, Pixels(-30.0));
        // The leg runs along y=20, so mirroring flips around that line
        assert_eq!(up, Point2::new(60.0, 50.0));
        assert_eq!(down, Point2::new(60.0, -10.0));
    }

    #[test]
    fn test_segment_projection() {
        let segment =
            Segment::new(Point2::new(0.0, 0.0), Point2::new(0.0, 300.0));
        let projected = segment.project_elevation(Pixels(400.0));
        assert_eq!(projected.origin, segment.origin);
        assert_approx_eq!(projected.length().0, 500.0);
        assert_eq!(segment.delta(), Vector2::new(0.0, 300.0));
    }
}
