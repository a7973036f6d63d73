//! Radius of curvature, tangent direction and evolute center (§4.2.2).

use crate::numeric::is_almost_zero;
use crate::point::{dot, perp, HPoint, Point, Vector, RP1};

/// `radius_of_curvature(s, ds, dds)`: the projective pair `(|ds|^3,
/// dot(perp(ds), dds))`. Carrying the radius this way (rather than as a
/// plain float) keeps inflection points — where curvature is zero and the
/// true radius is infinite — representable exactly as `denominator == 0`
/// instead of as a float overflow.
pub fn radius_of_curvature(_s: Point, ds: Vector, dds: Vector) -> RP1 {
    let speed = (ds.x * ds.x + ds.y * ds.y).sqrt();
    RP1::new(speed * speed * speed, dot(perp(ds), dds))
}

/// Projects a [`RP1`] radius to a signed float, clamped to `±max_r`.
pub fn bounded_radius_of_curvature(radius: &RP1, max_r: f64) -> f64 {
    radius.bounded(max_r)
}

/// `tangent_direction(s, ds, dds)`: `ds` when it is non-degenerate,
/// otherwise `dds` — a direction, not a unit vector.
pub fn tangent_direction(ds: Vector, dds: Vector) -> Vector {
    if ds.x * ds.x + ds.y * ds.y > f64::MIN_POSITIVE {
        ds
    } else {
        dds
    }
}

/// The rational-quadratic analogue of [`tangent_direction`]: `nrd(a,a') =
/// (w*u' - u*w', w*v' - v*w')`, with a fallback to the same construction one
/// derivative order up when that vanishes too.
pub fn nrd(a: HPoint, da: HPoint) -> Vector {
    crate::point::vector(a.w * da.x - a.x * da.w, a.w * da.y - a.y * da.w)
}

pub fn rational_tangent_direction(a: HPoint, da: HPoint, dda: HPoint) -> Vector {
    let d1 = nrd(a, da);
    if d1.x * d1.x + d1.y * d1.y > f64::MIN_POSITIVE {
        d1
    } else {
        nrd(a, dda)
    }
}

/// `center_of_curvature(max_r, s, ds, dds) = p + (r/|t|)*perp(t)`.
pub fn center_of_curvature(s: Point, ds: Vector, dds: Vector, max_r: f64) -> Point {
    let radius = radius_of_curvature(s, ds, dds);
    let r = bounded_radius_of_curvature(&radius, max_r);
    let t = tangent_direction(ds, dds);
    let len = (t.x * t.x + t.y * t.y).sqrt();
    if is_almost_zero(len) {
        return s;
    }
    let n = perp(t) * (r / len);
    crate::point::point(s.x + n.x, s.y + n.y)
}

/// `true` when `cross(ds, dds)` and `ds` jointly indicate the curve bends
/// the "wrong way" relative to an offset of signed distance `s` — i.e. the
/// bounded radius of curvature is, in magnitude, less than `|s|` (the
/// offset/evolute mode switch of §4.7).
pub fn is_evolute_mode(s_pos: Point, ds: Vector, dds: Vector, offset: f64) -> bool {
    let radius = radius_of_curvature(s_pos, ds, dds);
    match radius.value() {
        None => false,
        Some(r) => r.abs() < offset.abs(),
    }
}
