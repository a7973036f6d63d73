//! Point algebra: affine R2 (via `euclid`), homogeneous R3/RP2, and the RP1
//! projective radius pair used to carry a radius of curvature through
//! inflection points without overflowing to infinity.

use crate::numeric::{is_almost_zero, is_relatively_zero};

/// Alias for `euclid::default::Point2D<f64>` — affine R2.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>` — a direction or displacement.
pub type Vector = euclid::default::Vector2D<f64>;

#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// `(x, y) -> (-y, x)`, a quarter turn counterclockwise.
#[inline]
pub fn perp(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// The scalar (2D) cross product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: Vector, b: Vector) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
pub fn dot(a: Vector, b: Vector) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Reinterprets a `Point` as a `Vector` with the same coordinates. Useful
/// where the Bezier kernel's `Blend` impl yields a `Point`-typed result
/// (e.g. a derivative curve evaluation) that is semantically a direction.
#[inline]
pub fn as_vector(p: Point) -> Vector {
    vector(p.x, p.y)
}

/// `true` when `a` and `b` are equal up to `ulp` units of relative error in
/// each component.
pub fn point_almost_eq(a: Point, b: Point, ulp: i32) -> bool {
    crate::numeric::is_almost_equal(a.x, b.x, ulp) && crate::numeric::is_almost_equal(a.y, b.y, ulp)
}

/// Homogeneous point in R3 / RP2: `(x, y, w)`. An affine point is `w == 1`;
/// a direction (point at infinity) has `w == 0`.
///
/// Addition and subtraction require equal `w` (the spec's "addition must
/// equalize w" invariant) — callers needing to combine points of different
/// weight must rescale first, which is exactly what [`HPoint::project`] and
/// the rational-quadratic canonicalization step do.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HPoint {
    pub x: f64,
    pub y: f64,
    pub w: f64,
}

impl HPoint {
    pub fn new(x: f64, y: f64, w: f64) -> Self {
        HPoint { x, y, w }
    }

    pub fn from_point(p: Point) -> Self {
        HPoint::new(p.x, p.y, 1.0)
    }

    pub fn from_vector(v: Vector) -> Self {
        HPoint::new(v.x, v.y, 0.0)
    }

    /// Affine projection `(x/w, y/w)`. Callers must check
    /// [`HPoint::is_almost_ideal`] first; projecting an ideal point produces
    /// a meaningless (huge or NaN) result.
    pub fn project(&self) -> Point {
        point(self.x / self.w, self.y / self.w)
    }

    /// `true` when `w` is relatively zero compared to the smaller of `|x|`
    /// and `|y|` — the point is "at infinity" to within tolerance.
    pub fn is_almost_ideal(&self, ulp: i32) -> bool {
        let scale = self.x.abs().min(self.y.abs());
        is_relatively_zero(self.w, scale, ulp) || is_almost_zero(self.w)
    }

    /// Scales all three coordinates, leaving the represented affine point
    /// unchanged (for `w != 0`).
    pub fn rescale(&self, k: f64) -> Self {
        HPoint::new(self.x * k, self.y * k, self.w * k)
    }
}

impl core::ops::Add for HPoint {
    type Output = HPoint;
    fn add(self, rhs: HPoint) -> HPoint {
        debug_assert!(is_almost_zero(self.w - rhs.w), "HPoint::add requires equal w");
        HPoint::new(self.x + rhs.x, self.y + rhs.y, self.w)
    }
}

impl core::ops::Sub for HPoint {
    type Output = HPoint;
    fn sub(self, rhs: HPoint) -> HPoint {
        debug_assert!(is_almost_zero(self.w - rhs.w), "HPoint::sub requires equal w");
        HPoint::new(self.x - rhs.x, self.y - rhs.y, self.w)
    }
}

impl core::ops::Mul<f64> for HPoint {
    type Output = HPoint;
    fn mul(self, k: f64) -> HPoint {
        HPoint::new(self.x * k, self.y * k, self.w * k)
    }
}

/// RP2 equality: two homogeneous points represent the same projective point
/// iff their cross products vanish pairwise, `x0*y1 - x1*y0 == 0` etc.
pub fn hpoint_projective_eq(a: HPoint, b: HPoint, ulp: i32) -> bool {
    let cxy = a.x * b.y - a.y * b.x;
    let cxw = a.x * b.w - a.w * b.x;
    let cyw = a.y * b.w - a.w * b.y;
    let scale = (a.x * b.x + a.y * b.y + a.w * b.w).abs();
    is_relatively_zero(cxy, scale, ulp) && is_relatively_zero(cxw, scale, ulp) && is_relatively_zero(cyw, scale, ulp)
}

/// A radius of curvature carried as a projective pair `(numerator,
/// denominator)` rather than a float, so that a true radius of infinity (at
/// an inflection point, where curvature is zero) is representable exactly
/// as `denominator == 0` instead of as a float overflow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RP1 {
    pub num: f64,
    pub den: f64,
}

impl RP1 {
    pub fn new(num: f64, den: f64) -> Self {
        RP1 { num, den }
    }

    /// `true` when the denominator is (almost) zero, i.e. the radius is at
    /// infinity.
    pub fn is_infinite(&self) -> bool {
        is_almost_zero(self.den)
    }

    /// Projects to a signed float radius, or `None` when at infinity.
    pub fn value(&self) -> Option<f64> {
        if self.is_infinite() {
            None
        } else {
            Some(self.num / self.den)
        }
    }

    /// Clamps the projective radius to `±max_r`, signed by the denominator's
    /// sign, when the unbounded value would exceed `max_r` in magnitude (or
    /// be infinite). This is `bounded_radius_of_curvature` (§4.2.2).
    pub fn bounded(&self, max_r: f64) -> f64 {
        if self.is_infinite() {
            let sign = if self.den != 0.0 {
                self.den.signum()
            } else if self.num != 0.0 {
                self.num.signum()
            } else {
                1.0
            };
            return max_r.abs().copysign(sign);
        }
        let r = self.num / self.den;
        if r.abs() > max_r.abs() {
            max_r.abs().copysign(r)
        } else {
            r
        }
    }
}
