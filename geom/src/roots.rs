//! Polynomial root refinement (§4.1's `roots`/`hull_marching_roots`): find
//! the roots of a scalar Bezier `B(t) = z` on `[a,b]`, returning them sorted
//! with `a` and `b` as sentinels at the ends.
//!
//! The approach mirrors the source: recurse on the derivative to partition
//! `[a,b]` into intervals where `B` is monotone, then refine one root per
//! monotone interval by bisection or a bracketed ("safe") Newton step.

use arrayvec::ArrayVec;

use crate::bezier::{Bezier, CAP};
use crate::numeric::is_almost_zero;

/// Bracketed bisection: `f(a)` and `f(b)` must have opposite signs (or one
/// be ~zero). Returns the root to within `tol`.
pub fn bisect(mut a: f64, mut b: f64, f: impl Fn(f64) -> f64, tol: f64, max_iter: u32) -> f64 {
    let mut fa = f(a);
    let fb0 = f(b);
    if is_almost_zero(fa) {
        return a;
    }
    if is_almost_zero(fb0) {
        return b;
    }
    debug_assert!(fa.signum() != fb0.signum(), "bisect requires a sign change on [a,b]");
    for _ in 0..max_iter {
        let m = 0.5 * (a + b);
        let fm = f(m);
        if is_almost_zero(fm) || (b - a).abs() < tol {
            return m;
        }
        if fm.signum() == fa.signum() {
            a = m;
            fa = fm;
        } else {
            b = m;
        }
    }
    0.5 * (a + b)
}

/// A bracketed ("safe") Newton step: take a Newton step from the midpoint of
/// the bracket, but fall back to bisection whenever the step would leave
/// the bracket. Converges at least as fast as bisection and quadratically
/// once close to the root.
pub fn safe_newton(
    mut a: f64,
    mut b: f64,
    f: impl Fn(f64) -> f64,
    df: impl Fn(f64) -> f64,
    tol: f64,
    max_iter: u32,
) -> f64 {
    let mut fa = f(a);
    let fb0 = f(b);
    if is_almost_zero(fa) {
        return a;
    }
    if is_almost_zero(fb0) {
        return b;
    }
    let mut x = 0.5 * (a + b);
    for _ in 0..max_iter {
        let fx = f(x);
        if is_almost_zero(fx) || (b - a).abs() < tol {
            return x;
        }
        if fx.signum() == fa.signum() {
            a = x;
            fa = fx;
        } else {
            b = x;
        }
        let dfx = df(x);
        let newton_x = if is_almost_zero(dfx) { f64::INFINITY } else { x - fx / dfx };
        x = if newton_x > a && newton_x < b { newton_x } else { 0.5 * (a + b) };
    }
    x
}

/// Recursively finds the roots of `B(t) = z` on `[a,b]`, returning `a`,
/// every interior root in increasing order, then `b`.
///
/// Degree 1 is solved directly; degree 2 in closed form after reduction;
/// higher degrees recurse on the derivative to build a monotone partition,
/// then refine one root per monotone subinterval.
pub fn roots(b: &Bezier<f64>, a: f64, bnd: f64, z: f64, tol: f64) -> ArrayVec<f64, CAP> {
    let mut out = ArrayVec::new();
    out.push(a);
    match b.degree() {
        0 => {}
        1 => {
            let f0 = b.evaluate_decasteljau(a) - z;
            let f1 = b.evaluate_decasteljau(bnd) - z;
            if is_almost_zero(f0) {
                push_interior(&mut out, a, a, bnd, tol);
            } else if is_almost_zero(f1) {
                push_interior(&mut out, bnd, a, bnd, tol);
            } else if f0.signum() != f1.signum() {
                let t = f0 / (f0 - f1);
                push_interior(&mut out, a + (bnd - a) * t, a, bnd, tol);
            }
        }
        _ => {
            let f = |t: f64| b.evaluate_decasteljau(t) - z;
            let df = |t: f64| b.derivative().evaluate_decasteljau(t);
            let deriv = b.derivative();
            // Roots of the derivative within [a,bnd] partition this range
            // into monotone pieces; `extrema` already starts at `a` and
            // ends at `bnd`.
            let extrema = roots(&deriv, a, bnd, 0.0, tol);
            for w in extrema.windows(2) {
                let (s0, s1) = (w[0], w[1]);
                if (s1 - s0).abs() < tol {
                    continue;
                }
                let f0 = f(s0);
                let f1 = f(s1);
                if is_almost_zero(f0) {
                    push_interior(&mut out, s0, a, bnd, tol);
                    continue;
                }
                if f0.signum() != f1.signum() {
                    let r = safe_newton(s0, s1, f, df, tol, 64);
                    push_interior(&mut out, r, a, bnd, tol);
                }
            }
            let f1 = f(bnd);
            if is_almost_zero(f1) {
                push_interior(&mut out, bnd, a, bnd, tol);
            }
        }
    }
    out.push(bnd);
    out
}

fn push_interior(out: &mut ArrayVec<f64, CAP>, t: f64, a: f64, bnd: f64, tol: f64) {
    if t > a + tol && t < bnd - tol && out.last().map(|last| (t - last).abs() > tol).unwrap_or(true) {
        let _ = out.try_push(t);
    }
}

/// Sederberg's hull-marching root finder: iteratively narrows `[a,b]` by
/// intersecting the chord connecting the Bernstein hull's end ordinates
/// with the horizontal line `y = z`, declaring convergence when the
/// remaining interval is within `tol`. Same contract as [`roots`], offered
/// as the alternative the source uses for the rational-curve offsetting
/// searches where a closed-form derivative isn't convenient.
pub fn hull_marching_roots(b: &Bezier<f64>, a: f64, bnd: f64, z: f64, tol: f64) -> ArrayVec<f64, CAP> {
    let mut out = ArrayVec::new();
    out.push(a);
    if let Some(t) = hull_march_single(&b.cut(a, bnd).sub_const(z), tol) {
        let s = a + (bnd - a) * t;
        if s > a + tol && s < bnd - tol {
            out.push(s);
        }
    }
    out.push(bnd);
    out
}

impl Bezier<f64> {
    fn sub_const(&self, z: f64) -> Bezier<f64> {
        let mut out: ArrayVec<f64, CAP> = ArrayVec::new();
        for p in &self.points {
            out.push(*p - z);
        }
        Bezier::new(out)
    }
}

/// Marches the control polygon's convex hull toward a single root of
/// `b(t) = 0` on `[0,1]`, assuming the hull crosses zero (i.e. `b` has a
/// sign change on its endpoints, or touches zero at an endpoint). Returns
/// `None` when no sign change is present.
fn hull_march_single(b: &Bezier<f64>, tol: f64) -> Option<f64> {
    let n = b.degree();
    let y0 = b.points[0];
    let yn = b.points[n];
    if is_almost_zero(y0) {
        return Some(0.0);
    }
    if is_almost_zero(yn) {
        return Some(1.0);
    }
    if y0.signum() == yn.signum() {
        return None;
    }
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    let mut cur = b.clone();
    for _ in 0..64 {
        // Chord from (0, cur[0]) to (1, cur[n]) crossing y = 0.
        let n = cur.degree();
        let y0 = cur.points[0];
        let yn = cur.points[n];
        if (yn - y0).abs() < f64::EPSILON {
            break;
        }
        let t = -y0 / (yn - y0);
        let t = t.clamp(0.0, 1.0);
        let width = hi - lo;
        let mid = lo + width * t;
        if width < tol {
            return Some(mid);
        }
        let (left, right) = cur.split(t);
        // Keep whichever half still straddles the hull's sign change,
        // preferring to march forward (toward the smaller remaining
        // interval on the side the chord pointed at).
        let left_cross = left.points[0].signum() != left.points[left.degree()].signum();
        if left_cross {
            cur = left;
            hi = mid;
        } else {
            cur = right;
            lo = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn roots_of_linear_segment() {
        let b = Bezier::line(-1.0, 1.0);
        let r = roots(&b, 0.0, 1.0, 0.0, 1e-9);
        assert_eq!(r.len(), 3);
        assert_abs_diff_eq!(r[1], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn roots_satisfy_evaluation_bound() {
        let b = Bezier::cubic(-1.0, 2.0, -3.0, 1.0);
        let r = roots(&b, 0.0, 1.0, 0.0, 1e-9);
        for &t in r.iter().skip(1).take(r.len() - 2) {
            let v = b.evaluate_decasteljau(t);
            assert!(v.abs() < 1e-6, "root {} has residual {}", t, v);
        }
        for w in r.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn hull_marching_finds_same_root_as_bisection() {
        let b = Bezier::cubic(-2.0, -1.0, 1.0, 3.0);
        let bisected = roots(&b, 0.0, 1.0, 0.0, 1e-10);
        let marched = hull_marching_roots(&b, 0.0, 1.0, 0.0, 1e-10);
        assert_eq!(bisected.len(), marched.len());
        for (a, c) in bisected.iter().zip(marched.iter()) {
            assert_abs_diff_eq!(a, c, epsilon = 1e-6);
        }
    }
}
