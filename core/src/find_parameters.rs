//! Parameter finders (§4.2.3): given a segment, compute the parameters
//! where it is monotone, has an inflection or double point, or has an
//! offset/evolute cusp at a given offset distance.
//!
//! The three `find-*-parameters` filters of the source are plain query
//! functions here rather than separate stream stages: in a single-threaded
//! pipeline, routing "compute a handful of parameters for this segment"
//! through three additional trait-object stages only to have the very next
//! stage (`regularize`) merge their output back together bought nothing, so
//! `regularize` calls these directly.

use arrayvec::ArrayVec;

use vecstroke_geom::bezier::Bezier;
use vecstroke_geom::point::{as_vector, cross, dot, Point, Vector};
use vecstroke_geom::roots::{bisect, roots as find_roots};

/// Upper bound on parameters returned by any one finder for a single
/// segment (cubic degree bounds keep this small).
pub const MAX_PARAMS: usize = 9;

/// Sample density used to bracket sign changes before bisecting, for the
/// offsetting-parameter search where no closed-form polynomial is built.
const BRACKET_SAMPLES: usize = 48;

fn scalar_component(b: &Bezier<Point>, f: impl Fn(Point) -> f64) -> Bezier<f64> {
    Bezier::new(b.points.iter().map(|p| f(*p)).collect())
}

/// `find-monotonic-parameters`: interior roots of `x'(t) = 0` and `y'(t) =
/// 0`, merged and sorted.
pub fn monotonic_parameters(b: &Bezier<Point>, tol: f64) -> ArrayVec<f64, MAX_PARAMS> {
    let mut out = ArrayVec::new();
    if b.degree() < 1 {
        return out;
    }
    let deriv = b.derivative();
    let dx = scalar_component(&deriv, |p| p.x);
    let dy = scalar_component(&deriv, |p| p.y);
    for coeffs in [&dx, &dy] {
        if coeffs.degree() == 0 {
            continue;
        }
        for t in find_roots(coeffs, 0.0, 1.0, 0.0, tol) {
            push_interior_sorted(&mut out, t, tol);
        }
    }
    out
}

/// `find-cubic-parameters`: the inflection or double-point parameters of a
/// cubic, computed from the serpentine/double-point discriminant (§4.2.3).
/// Returns nothing for non-cubic segments.
pub fn cubic_parameters(b: &Bezier<Point>, tol: f64) -> ArrayVec<f64, MAX_PARAMS> {
    let mut out = ArrayVec::new();
    if b.degree() != 3 {
        return out;
    }
    let p0 = b.points[0];
    let u1 = vecstroke_geom::point::vector(b.points[1].x - p0.x, b.points[1].y - p0.y);
    let u2 = vecstroke_geom::point::vector(b.points[2].x - p0.x, b.points[2].y - p0.y);
    let u3 = vecstroke_geom::point::vector(b.points[3].x - p0.x, b.points[3].y - p0.y);

    let b1 = 3.0 * cross(u1, u2);
    let b2 = 3.0 * cross(u1, u3);
    let b3 = 3.0 * cross(u2, u3);

    // Minors of the 3x4 b-coefficient matrix (Loop-Blinn style), degree-1 in
    // t: d1 = b1 - 2*b2 + b3, d2 = -b2 + b3, d3 = b3 (after normalizing b0=0).
    let d1 = b1 - 2.0 * b2 + b3;
    let d2 = -b2 + b3;
    let d3 = b3;

    // Serpentine (d1*d3 - d2^2 > 0) has up to two inflections; loop (< 0) has
    // a double point; the cusp boundary (== 0) has a single inflection. All
    // three cases are interior roots of the same quadratic in t.
    for t in quadratic_interior_roots(d1, d2, d3, tol) {
        push_interior_sorted(&mut out, t, tol);
    }
    out
}

/// Interior roots in `(0,1)` of the quadratic Bezier with Bernstein
/// coefficients `(d1, d2, d3)`.
fn quadratic_interior_roots(d1: f64, d2: f64, d3: f64, tol: f64) -> ArrayVec<f64, 2> {
    let mut out = ArrayVec::new();
    let coeffs = Bezier::quadratic(d1, d2, d3);
    for t in find_roots(&coeffs, 0.0, 1.0, 0.0, tol) {
        if t > tol && t < 1.0 - tol {
            let _ = out.try_push(t);
        }
    }
    out
}

/// `find-offsetting-parameters`: evolute-cusp parameters (where `3*q*p' -
/// 2*q'*p = 0`, with `p = |c'|^2` and `q = cross(c',c'')`) and offset-cusp
/// parameters (where `p^(3/2) = offset*|q|`), for quadratics and cubics.
///
/// Evaluated by direct sampling rather than by building `p`/`q` as explicit
/// Bernstein polynomials: a cubic's `p` has degree 4, already past this
/// crate's degree-3 `Bezier` capacity, so the search instead samples the
/// defining functions pointwise (cheap: each sample is one or two De
/// Casteljau evaluations) and brackets sign changes before bisecting.
pub fn offsetting_parameters(b: &Bezier<Point>, offset: f64, tol: f64) -> (ArrayVec<f64, MAX_PARAMS>, ArrayVec<f64, MAX_PARAMS>) {
    let mut evolute_cusps = ArrayVec::new();
    let mut offset_cusps = ArrayVec::new();
    if b.degree() < 2 {
        return (evolute_cusps, offset_cusps);
    }
    let c1 = to_vector_curve(&b.derivative());
    let c2 = c1.derivative();
    let c3 = if c2.degree() >= 1 { Some(c2.derivative()) } else { None };

    let eval_c = |curve: &Bezier<Vector>, t: f64| curve.evaluate_decasteljau(t);

    let p = |t: f64| {
        let v = eval_c(&c1, t);
        dot(v, v)
    };
    let dp = |t: f64| {
        let v1 = eval_c(&c1, t);
        let v2 = eval_c(&c2, t);
        2.0 * dot(v1, v2)
    };
    let q = |t: f64| {
        let v1 = eval_c(&c1, t);
        let v2 = eval_c(&c2, t);
        cross(v1, v2)
    };
    // q'(t) = cross(c1', c2) + cross(c1, c2') = cross(c2,c2) + cross(c1,c3) = cross(c1,c3).
    let dq = |t: f64| match &c3 {
        Some(curve) => cross(eval_c(&c1, t), eval_c(curve, t)),
        None => 0.0,
    };

    let evolute_fn = |t: f64| 3.0 * q(t) * dp(t) - 2.0 * dq(t) * p(t);
    bracket_and_bisect(evolute_fn, tol, &mut evolute_cusps);

    let offset_fn = |t: f64| p(t).max(0.0).powf(1.5) - offset.abs() * q(t).abs();
    bracket_and_bisect(offset_fn, tol, &mut offset_cusps);

    (evolute_cusps, offset_cusps)
}

fn to_vector_curve(b: &Bezier<Point>) -> Bezier<Vector> {
    Bezier::new(b.points.iter().map(|p| as_vector(*p)).collect())
}

fn bracket_and_bisect(f: impl Fn(f64) -> f64, tol: f64, out: &mut ArrayVec<f64, MAX_PARAMS>) {
    let n = BRACKET_SAMPLES;
    let mut prev_t = 0.0;
    let mut prev_v = f(0.0);
    for i in 1..=n {
        let t = i as f64 / n as f64;
        let v = f(t);
        if v.is_finite() && prev_v.is_finite() && v.signum() != prev_v.signum() {
            let root = bisect(prev_t, t, &f, tol, 64);
            push_interior_sorted(out, root, tol);
        }
        prev_t = t;
        prev_v = v;
    }
}

fn push_interior_sorted(out: &mut ArrayVec<f64, MAX_PARAMS>, t: f64, tol: f64) {
    if t <= tol || t >= 1.0 - tol {
        return;
    }
    let pos = out.iter().position(|&v| v > t).unwrap_or(out.len());
    if pos > 0 && (out[pos - 1] - t).abs() < tol {
        return;
    }
    if pos < out.len() && (out[pos] - t).abs() < tol {
        return;
    }
    let _ = out.try_insert(pos, t);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecstroke_geom::point::point;

    #[test]
    fn monotonic_parameters_of_symmetric_cubic() {
        let b = Bezier::cubic(point(0.0, 0.0), point(1.0, 2.0), point(3.0, 2.0), point(4.0, 0.0));
        let params = monotonic_parameters(&b, 1e-9);
        // y'(t) = 0 has exactly one interior root for this symmetric hump.
        assert!(!params.is_empty());
        for &t in &params {
            assert!(t > 0.0 && t < 1.0);
        }
    }

    #[test]
    fn cubic_parameters_empty_for_quadratic() {
        let b = Bezier::quadratic(point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0));
        assert!(cubic_parameters(&b, 1e-9).is_empty());
    }

    #[test]
    fn serpentine_cubic_reports_at_most_two_inflections() {
        let b = Bezier::cubic(point(0.0, 0.0), point(10.0, 0.0), point(0.0, 10.0), point(10.0, 10.0));
        let params = cubic_parameters(&b, 1e-6);
        assert!(params.len() <= 2);
    }

    #[test]
    fn quarter_circle_offset_has_no_cusps_within_its_radius() {
        // A quarter-circle-ish cubic has roughly constant curvature, so
        // offsetting by a small distance should not introduce any cusp.
        let b = Bezier::cubic(point(1.0, 0.0), point(1.0, 0.55), point(0.55, 1.0), point(0.0, 1.0));
        let (evolute, offset_cusps) = offsetting_parameters(&b, 0.05, 1e-6);
        assert!(evolute.is_empty());
        assert!(offset_cusps.is_empty());
    }

    #[test]
    fn large_offset_past_radius_introduces_a_cusp() {
        let b = Bezier::cubic(point(1.0, 0.0), point(1.0, 0.55), point(0.55, 1.0), point(0.0, 1.0));
        let (_, offset_cusps) = offsetting_parameters(&b, 5.0, 1e-6);
        assert!(!offset_cusps.is_empty());
    }
}
